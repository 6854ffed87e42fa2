//! Configuration loading
//!
//! Sources are layered lowest precedence first:
//!
//! 1. `defaults/pdollar.default.toml`, compiled into the binary
//! 2. `./pdollar.toml` when present
//! 3. the file given with `--config`
//! 4. `PDOLLAR_<SECTION>__<KEY>` environment variables
//! 5. command-line overrides such as `--verbose`
//!
//! The merged tree is deserialized into [`PdollarConfig`] and checked before
//! anything else runs.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../../defaults/pdollar.default.toml");

pub const LOCAL_CONFIG_FILE: &str = "pdollar.toml";

pub const ENV_PREFIX: &str = "PDOLLAR";

#[derive(Debug, Clone, Deserialize)]
pub struct PdollarConfig {
    pub store: StoreConfig,
    pub parser: ParserConfig,
    pub recognizer: RecognizerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Flat file listing registered template paths
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    pub allow_unterminated_strokes: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecognizerConfig {
    pub sampling_resolution: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
}

impl PdollarConfig {
    fn validate(self) -> Result<Self, ConfigError> {
        if self.recognizer.sampling_resolution == 0 {
            return Err(ConfigError::Message(
                "recognizer.sampling_resolution must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }
}

/// What the command line contributes on top of files and environment
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_file: Option<PathBuf>,
    pub verbose: bool,
}

/// Stacks configuration sources over the compiled-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        Loader {
            builder: Config::builder()
                .add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml)),
        }
    }

    /// Add a TOML file. When `required` is false a missing file is skipped.
    pub fn file(mut self, path: impl AsRef<Path>, required: bool) -> Self {
        self.builder = self.builder.add_source(
            File::from(path.as_ref())
                .format(FileFormat::Toml)
                .required(required),
        );
        self
    }

    pub fn env(mut self) -> Self {
        self.builder = self.builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );
        self
    }

    pub fn set<V: Into<ValueKind>>(mut self, key: &str, value: V) -> Result<Self, ConfigError> {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<PdollarConfig, ConfigError> {
        self.builder
            .build()?
            .try_deserialize::<PdollarConfig>()?
            .validate()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the configuration the binary runs with.
pub fn load(cli: &CliOverrides) -> Result<PdollarConfig, ConfigError> {
    let mut loader = Loader::new().file(LOCAL_CONFIG_FILE, false);
    if let Some(path) = &cli.config_file {
        loader = loader.file(path, true);
    }
    let mut loader = loader.env();
    if cli.verbose {
        loader = loader.set("logging.level", "debug")?;
    }
    loader.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn toml_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Loader::new().build().unwrap();
        assert_eq!(config.store.path, PathBuf::from("pdollar-templates.txt"));
        assert!(!config.parser.allow_unterminated_strokes);
        assert_eq!(config.recognizer.sampling_resolution, 32);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_set_overrides_defaults() {
        let config = Loader::new()
            .set("parser.allow_unterminated_strokes", true)
            .unwrap()
            .set("recognizer.sampling_resolution", 64)
            .unwrap()
            .build()
            .unwrap();
        assert!(config.parser.allow_unterminated_strokes);
        assert_eq!(config.recognizer.sampling_resolution, 64);
    }

    #[test]
    fn test_file_layer_keeps_other_sections() {
        let file = toml_file("[store]\npath = \"/tmp/elsewhere.txt\"\n");
        let config = Loader::new().file(file.path(), true).build().unwrap();
        assert_eq!(config.store.path, PathBuf::from("/tmp/elsewhere.txt"));
        assert_eq!(config.recognizer.sampling_resolution, 32);
    }

    #[test]
    fn test_missing_files() {
        assert!(Loader::new()
            .file("/definitely/not/here.toml", true)
            .build()
            .is_err());
        assert!(Loader::new()
            .file("/definitely/not/here.toml", false)
            .build()
            .is_ok());
    }

    #[test]
    fn test_zero_sampling_resolution_is_rejected() {
        let err = Loader::new()
            .set("recognizer.sampling_resolution", 0)
            .unwrap()
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("sampling_resolution"));
    }

    #[test]
    fn test_load_applies_cli_overrides() {
        let file = toml_file("[logging]\nlevel = \"error\"\n[recognizer]\nsampling_resolution = 16\n");
        let config = load(&CliOverrides {
            config_file: Some(file.path().to_path_buf()),
            verbose: true,
        })
        .unwrap();
        // --verbose beats the file
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.recognizer.sampling_resolution, 16);
    }

    #[test]
    fn test_load_without_verbose_keeps_file_level() {
        let file = toml_file("[logging]\nlevel = \"error\"\n");
        let config = load(&CliOverrides {
            config_file: Some(file.path().to_path_buf()),
            verbose: false,
        })
        .unwrap();
        assert_eq!(config.logging.level, "error");
    }

    #[test]
    fn test_load_missing_config_file_fails() {
        let result = load(&CliOverrides {
            config_file: Some(PathBuf::from("/definitely/not/here.toml")),
            verbose: false,
        });
        assert!(result.is_err());
    }
}
