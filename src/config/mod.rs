//! Configuration management for ShellPilot
//!
//! TOML-backed configuration with environment overrides and startup
//! validation. Missing values fall back to per-OS defaults where one exists;
//! model credentials have no default and fail validation when absent.

pub mod loader;

pub use loader::ConfigLoader;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default conversational window sent with each model request
const DEFAULT_HISTORY_WINDOW: usize = 10;

/// Language-model service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Base URL of an OpenAI-compatible service
    pub base_url: String,
    /// API key sent as a bearer token
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// How many user/assistant entries accompany each request
    pub history_window: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            model: String::new(),
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }
}

/// Shell session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Shell program to drive (e.g. `bash`, `cmd.exe`, `pwsh`)
    pub program: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            program: default_shell_program().to_string(),
        }
    }
}

/// The shell used when configuration does not name one
pub fn default_shell_program() -> &'static str {
    if cfg!(windows) {
        "cmd.exe"
    } else {
        "bash"
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model service settings
    pub model: ModelConfig,
    /// Shell settings
    pub shell: ShellConfig,
    /// Start with debug output enabled
    pub debug: bool,
}

impl Config {
    /// Validate the values a session cannot start without
    pub fn validate(&self) -> Result<()> {
        if self.model.base_url.trim().is_empty() {
            return Err(Error::ConfigValidationFailed {
                field: "model.base_url".to_string(),
                reason: "a model service URL is required".to_string(),
            });
        }
        if self.model.api_key.trim().is_empty() {
            return Err(Error::ConfigValidationFailed {
                field: "model.api_key".to_string(),
                reason: "an API key is required".to_string(),
            });
        }
        if self.model.model.trim().is_empty() {
            return Err(Error::ConfigValidationFailed {
                field: "model.model".to_string(),
                reason: "a model name is required".to_string(),
            });
        }
        if self.shell.program.trim().is_empty() {
            return Err(Error::ConfigValidationFailed {
                field: "shell.program".to_string(),
                reason: "a shell program is required".to_string(),
            });
        }
        Ok(())
    }
}
