//! Command-line interface for pdollar
//! Registers gesture templates and recognizes the gestures drawn in event stream files.
//!
//! Usage:
//!   pdollar                              - Print the list of commands
//!   pdollar -t `<gesturefile>`           - Add a gesture file to the template list
//!   pdollar -r                           - Reset all templates
//!   pdollar `<eventstream>` [--format `<format>`] - Print the gestures recognized in a stream
//!
//! `--config <file>` layers a settings file and `--verbose` turns on debug logs.
//!
//! Every diagnostic, including a bad command line, is printed to standard
//! output and the exit status stays 0, so scripts read the outcome from the
//! output.

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command};
use pdollar::pdollar::config::{self, CliOverrides, PdollarConfig};
use pdollar::pdollar::formats::RecognitionRecord;
use pdollar::pdollar::parser::{recognize_stream, TemplateParser, TemplateSet};
use pdollar::pdollar::recognizer::PointCloudRecognizer;
use pdollar::pdollar::store::TemplateStore;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn build_cli() -> Command {
    Command::new("pdollar")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Recognizes pen gestures against a set of registered templates")
        .arg(
            Arg::new("eventstream")
                .help("Event stream file to read, printing any recognized gestures")
                .index(1),
        )
        .arg(
            Arg::new("template")
                .short('t')
                .long("template")
                .value_name("gesturefile")
                .help("Add a gesture file to the list of gesture templates")
                .conflicts_with_all(["reset", "eventstream"]),
        )
        .arg(
            Arg::new("reset")
                .short('r')
                .long("reset")
                .help("Reset all templates")
                .action(ArgAction::SetTrue)
                .conflicts_with("eventstream"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format for recognitions")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("file")
                .help("Read settings from this TOML file, on top of ./pdollar.toml"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log parser and recognizer activity to stderr")
                .action(ArgAction::SetTrue),
        )
}

fn main() {
    let mut cli = build_cli();
    let matches = match cli.try_get_matches_from_mut(std::env::args_os()) {
        Ok(matches) => matches,
        Err(e) => {
            report_usage(&e);
            return;
        }
    };

    let overrides = CliOverrides {
        config_file: matches.get_one::<String>("config").map(PathBuf::from),
        verbose: matches.get_flag("verbose"),
    };
    let config = match config::load(&overrides) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return;
        }
    };
    init_tracing(&config);

    let store = TemplateStore::new(&config.store.path);

    if let Some(path) = matches.get_one::<String>("template") {
        handle_add_template(&store, path);
    } else if matches.get_flag("reset") {
        handle_reset(&store);
    } else if let Some(path) = matches.get_one::<String>("eventstream") {
        handle_event_stream(&config, &store, path, &matches);
    } else {
        // Help goes to stdout, like every other message
        if let Err(e) = cli.print_help() {
            println!("Error printing help: {}", e);
        }
        println!();
    }
}

/// Print a clap error (or the help and version it asks for) to stdout
fn report_usage(e: &clap::Error) {
    print!("{}", e.render());
    if !matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        println!("Invalid number or set of arguments. Use \"pdollar\" for help.");
    }
}

/// Install the log subscriber. RUST_LOG wins over the configured level.
fn init_tracing(config: &PdollarConfig) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();
}

/// Handle `-t`: register a template file by its absolute path
fn handle_add_template(store: &TemplateStore, path: &str) {
    let absolute = match std::fs::canonicalize(path) {
        Ok(absolute) => absolute,
        Err(e) => {
            println!("Cannot add template {}: {}", path, e);
            return;
        }
    };
    let entry = absolute.to_string_lossy();

    match store.add(&entry) {
        Ok(paths) => println!(
            "Added template {} ({} registered)",
            entry,
            paths.len()
        ),
        Err(e) => println!("Error: {}", e),
    }
}

/// Handle `-r`: forget every registered template
fn handle_reset(store: &TemplateStore) {
    match store.reset() {
        Ok(_) => println!("All templates removed"),
        Err(e) => println!("Error: {}", e),
    }
}

/// Handle `<eventstream>`: load the templates and recognize every query in the stream
fn handle_event_stream(
    config: &PdollarConfig,
    store: &TemplateStore,
    path: &str,
    matches: &ArgMatches,
) {
    let json = matches
        .get_one::<String>("format")
        .is_some_and(|format| format == "json");

    let paths = match store.list() {
        Ok(paths) => paths,
        Err(e) => {
            println!("Error: {}", e);
            return;
        }
    };

    let parser = TemplateParser::from_config(&config.parser);
    let templates = TemplateSet::load(&parser, &paths);
    for skipped in templates.skipped() {
        println!(
            "Skipping template {}: {}",
            skipped.path.display(),
            skipped.error
        );
    }
    if templates.is_empty() {
        println!("No templates registered. Use \"pdollar -t <gesturefile>\" to add one.");
    }

    let file = match File::open(Path::new(path)) {
        Ok(file) => file,
        Err(e) => {
            println!("Cannot open event stream {}: {}", path, e);
            return;
        }
    };

    let recognizer = PointCloudRecognizer::new(config.recognizer.sampling_resolution);
    let outcome = recognize_stream(
        BufReader::new(file),
        &recognizer,
        templates.templates(),
        |query, result| {
            if json {
                match RecognitionRecord::new(query, &result).to_json() {
                    Ok(line) => println!("{}", line),
                    Err(e) => println!("Error: {}", e),
                }
            } else {
                println!("Recognized: {}", result);
            }
        },
    );

    if let Err(e) = outcome {
        println!("Error in event stream {}: {}", path, e);
    }
}
