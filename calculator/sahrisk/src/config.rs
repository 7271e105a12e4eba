//! Calculator configuration, read from `sahrisk.toml`.
//!
//! ```toml
//! [output]
//! format = "json"
//! precision = 3
//!
//! [export]
//! directory = "exports"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "sahrisk.toml";
pub const DEFAULT_PRECISION: u8 = 2;
pub const MAX_PRECISION: u8 = 6;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("precision {0} exceeds the maximum of {max}", max = MAX_PRECISION)]
    Precision(u8),
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Decimal places for scores and probabilities.
    pub precision: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            precision: DEFAULT_PRECISION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Directory receiving CSV exports when no explicit path is given.
    pub directory: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalculatorConfig {
    pub output: OutputConfig,
    pub export: ExportConfig,
}

impl CalculatorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: CalculatorConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!("loading configuration from {}", path.display());
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Loads `explicit` if given, else `sahrisk.toml` in `dir` if present,
    /// else the defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if let Some(path) = explicit {
            if candidate.is_file() && !same_file(&candidate, path) {
                warn!(
                    "ignoring {} in favour of {}",
                    candidate.display(),
                    path.display()
                );
            }
            return Self::load(path);
        }
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            debug!("no {CONFIG_FILE_NAME} found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.precision > MAX_PRECISION {
            return Err(ConfigError::Precision(self.output.precision));
        }
        Ok(())
    }

    /// Configured settings that the given command-line values replace, as
    /// `section.key` names. Settings left at their defaults are not listed.
    pub fn shadowed_settings(
        &self,
        format: Option<OutputFormat>,
        precision: Option<u8>,
        export_file: Option<&Path>,
    ) -> Vec<&'static str> {
        let defaults = Self::default();
        let mut shadowed = Vec::new();
        if self.output.format != defaults.output.format
            && format.is_some_and(|f| f != self.output.format)
        {
            shadowed.push("output.format");
        }
        if self.output.precision != defaults.output.precision
            && precision.is_some_and(|p| p != self.output.precision)
        {
            shadowed.push("output.precision");
        }
        if self.export.directory != defaults.export.directory && export_file.is_some() {
            shadowed.push("export.directory");
        }
        shadowed
    }

    pub fn precision(&self) -> usize {
        usize::from(self.output.precision)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
