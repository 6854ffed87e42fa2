//! Template Parser
//!
//! A template file names one gesture and lists its strokes:
//!
//!     Circle
//!     BEGIN
//!     0,0
//!     1,1
//!     END
//!
//! The first line is the name, taken verbatim after trimming. The rest is run
//! through the stroke state machine with the `BEGIN` / `END` keywords. Any
//! error aborts the file; [`TemplateSet`] skips such files and keeps going.

use super::lines::NumberedLines;
use super::state::StrokeAssembler;
use super::ParseError;
use crate::pdollar::config::ParserConfig;
use crate::pdollar::geometry::Gesture;
use crate::pdollar::lexer::TokenSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Parse a template with the default (strict) settings
pub fn parse_template<R: BufRead>(reader: R) -> Result<Gesture, ParseError> {
    TemplateParser::new().parse(reader)
}

/// Parse template text held in memory
pub fn parse_template_str(source: &str) -> Result<Gesture, ParseError> {
    TemplateParser::new().parse(source.as_bytes())
}

/// Reads gesture templates.
///
/// By default a stroke left open at end of input is an error. Set
/// `allow_unterminated_strokes` to keep the points of such a stroke instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateParser {
    allow_unterminated_strokes: bool,
}

impl TemplateParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ParserConfig) -> Self {
        TemplateParser {
            allow_unterminated_strokes: config.allow_unterminated_strokes,
        }
    }

    pub fn allow_unterminated_strokes(mut self, allow: bool) -> Self {
        self.allow_unterminated_strokes = allow;
        self
    }

    pub fn parse<R: BufRead>(&self, reader: R) -> Result<Gesture, ParseError> {
        let mut lines = NumberedLines::new(reader);

        let name = match lines.next() {
            None => return Err(ParseError::EmptyTemplate),
            Some(first) => first?.1.trim().to_string(),
        };
        if name.is_empty() {
            return Err(ParseError::MissingName);
        }

        // no completion keyword in this grammar, so every step is Continue
        let mut machine = StrokeAssembler::new(TokenSet::TEMPLATE);
        for item in lines.by_ref() {
            let (line, text) = item?;
            machine.feed(&text, line)?;
        }

        if let Some(opened_at) = machine.open_stroke() {
            if !self.allow_unterminated_strokes {
                return Err(ParseError::UnterminatedStroke { line: opened_at });
            }
            warn!(
                template = %name,
                opened_at,
                "stroke left open at end of template, keeping its points"
            );
        }

        let gesture = Gesture::named(name, machine.into_points());
        debug!(%gesture, lines = lines.line(), "template parsed");
        Ok(gesture)
    }

    pub fn parse_path<P: AsRef<Path>>(&self, path: P) -> Result<Gesture, ParseError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ParseError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse(BufReader::new(file))
    }
}

/// A template file that could not be loaded
#[derive(Debug)]
pub struct SkippedTemplate {
    pub path: PathBuf,
    pub error: ParseError,
}

/// The reference gestures recognition runs against.
#[derive(Debug, Default)]
pub struct TemplateSet {
    templates: Vec<Gesture>,
    skipped: Vec<SkippedTemplate>,
}

impl TemplateSet {
    /// Parse every path in order. A failing file is recorded in
    /// [`skipped`](Self::skipped) and never stops the rest from loading.
    pub fn load<I, P>(parser: &TemplateParser, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut set = TemplateSet::default();
        for path in paths {
            let path = path.as_ref();
            match parser.parse_path(path) {
                Ok(gesture) => set.templates.push(gesture),
                Err(error) => {
                    warn!(path = %path.display(), %error, "skipping template");
                    set.skipped.push(SkippedTemplate {
                        path: path.to_path_buf(),
                        error,
                    });
                }
            }
        }
        debug!(
            loaded = set.templates.len(),
            skipped = set.skipped.len(),
            "template set loaded"
        );
        set
    }

    pub fn templates(&self) -> &[Gesture] {
        &self.templates
    }

    pub fn skipped(&self) -> &[SkippedTemplate] {
        &self.skipped
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
