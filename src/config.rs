use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::app::state::View;
use crate::constants::{CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};
use crate::error::ConfigError;
use crate::pipeline::processing::parser::SheetFormat;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ingest: IngestConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Worksheet name; first sheet when unset
    pub sheet: Option<String>,
    pub format: SheetFormat,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Single view to print; every view when unset
    pub view: Option<View>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub file_name: String,
    pub file_logging: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            file_name: "armp.log".to_string(),
            file_logging: true,
        }
    }
}

impl Config {
    /// Load from `path`, else `$ARMP_CONFIG`, else `armp.toml` in the working
    /// directory. Only the implicit default file may be absent.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var(CONFIG_ENV_VAR).ok();
        let (path, required) = resolve_path(path, env_path.as_deref());

        if !required && !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config = Self::from_toml(&content)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(content)?;
        config.ingest.sheet = config
            .ingest
            .sheet
            .take()
            .filter(|s| !s.trim().is_empty());
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.logging.file_logging && self.logging.file_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "logging.file_name must not be empty when file_logging is on".to_string(),
            ));
        }
        Ok(())
    }
}

/// Config path and whether it has to exist
fn resolve_path(explicit: Option<&Path>, env: Option<&str>) -> (PathBuf, bool) {
    match (explicit, env.filter(|v| !v.trim().is_empty())) {
        (Some(p), _) => (p.to_path_buf(), true),
        (None, Some(v)) => (PathBuf::from(v), true),
        (None, None) => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    }
}
