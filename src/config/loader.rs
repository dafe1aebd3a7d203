//! Configuration File Loading
//!
//! Loads the TOML configuration from the platform config directory and
//! applies environment-variable overrides, so credentials can stay out of
//! the file entirely.

use std::path::{Path, PathBuf};

use super::Config;
use crate::error::{Error, Result};

/// Environment variables recognized as overrides
const ENV_BASE_URL: &str = "SHELLPILOT_BASE_URL";
const ENV_API_KEY: &str = "SHELLPILOT_API_KEY";
const ENV_MODEL: &str = "SHELLPILOT_MODEL";
const ENV_SHELL: &str = "SHELLPILOT_SHELL";
const ENV_DEBUG: &str = "SHELLPILOT_DEBUG";

/// Loads configuration from disk and the environment
#[derive(Debug)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Default configuration file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("shellpilot").join("config.toml"))
    }

    /// Load from the default location, falling back to defaults when no
    /// file exists. Environment overrides always apply.
    pub fn load() -> Result<Config> {
        let config = match Self::default_path() {
            Some(path) if path.exists() => {
                debug!("loading configuration from {}", path.display());
                Self::read_file(&path)?
            }
            _ => {
                debug!("no configuration file found, using defaults");
                Config::default()
            }
        };

        Ok(Self::apply_env_overrides(config))
    }

    /// Load from an explicit path. The file must exist and parse.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config = Self::read_file(path)?;
        Ok(Self::apply_env_overrides(config))
    }

    fn read_file(path: &Path) -> Result<Config> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::ConfigLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&text).map_err(|e| Error::ConfigLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn apply_env_overrides(mut config: Config) -> Config {
        if let Ok(value) = std::env::var(ENV_BASE_URL) {
            config.model.base_url = value;
        }
        if let Ok(value) = std::env::var(ENV_API_KEY) {
            config.model.api_key = value;
        }
        if let Ok(value) = std::env::var(ENV_MODEL) {
            config.model.model = value;
        }
        if let Ok(value) = std::env::var(ENV_SHELL) {
            config.shell.program = value;
        }
        if let Ok(value) = std::env::var(ENV_DEBUG) {
            config.debug = matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        config
    }
}
