use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the settings directory.
    ///
    /// An explicit `-settingsDir=` wins. Otherwise
    /// `~/.config/padlaunch` on Unix/macOS, or the equivalent via
    /// `dirs::config_dir()`; falls back to the current directory.
    pub fn settings_dir(explicit: Option<&Path>) -> PathBuf {
        if let Some(dir) = explicit {
            return dir.to_path_buf();
        }
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("padlaunch")
    }

    /// Returns the path to the configuration file inside `settings_dir`.
    pub fn config_path(settings_dir: &Path) -> PathBuf {
        settings_dir.join(CONFIG_FILE_NAME)
    }

    /// Loads configuration from `settings_dir`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load(settings_dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::config_path(settings_dir);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        Self::load_from(&path)
    }

    /// Loads and validates a specific config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Lock and endpoint names become file names, so they must be
    /// non-empty and free of path separators.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("instance.mutex_name", &self.instance.mutex_name),
            ("instance.window_class", &self.instance.window_class),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    message: format!("{} must not be empty", field),
                });
            }
            if value.contains(['/', '\\']) || value == "." || value == ".." {
                return Err(ConfigError::ValidationError {
                    message: format!("{} '{}' must be a plain name", field, value),
                });
            }
        }

        Ok(())
    }
}
