//! Error types and Result aliases for ShellPilot

use std::fmt;
use std::path::PathBuf;

/// Result type alias for ShellPilot operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ShellPilot
#[derive(Debug)]
pub enum Error {
    // === Shell session errors ===
    /// The configured shell program does not map to a known dialect
    UnknownDialect {
        name: String,
    },

    /// The OS could not spawn the shell process
    ProcessStartFailed {
        program: String,
        reason: String,
    },

    /// Writing to the shell's input stream failed (usually a dead child)
    ProcessWriteFailed {
        reason: String,
    },

    /// Reading from one of the shell's output streams failed
    ProcessReadFailed {
        reason: String,
    },

    /// The session has no live shell process
    SessionNotStarted,

    /// A command is already executing on this session
    CommandInFlight,

    // === Model errors ===
    /// The request to the language-model service failed
    ModelRequest {
        reason: String,
    },

    /// The language-model service returned a response we could not use
    ModelResponse {
        reason: String,
    },

    // === Configuration errors ===
    /// Failed to load configuration file
    ConfigLoadFailed {
        path: PathBuf,
        reason: String,
    },

    /// Configuration validation failed
    ConfigValidationFailed {
        field: String,
        reason: String,
    },

    // === File generation errors ===
    /// Failed to persist a generated file
    FileSaveFailed {
        path: PathBuf,
        reason: String,
    },

    // === I/O and serialization errors (kept for compatibility) ===
    /// I/O errors
    Io(std::io::Error),

    /// Serialization errors
    Serde(serde_json::Error),

    /// TOML parsing errors
    Toml(toml::de::Error),

    // === Generic fallback (use sparingly) ===
    /// Generic errors (for cases not yet categorized)
    Other(String),
}

impl Error {
    /// Whether this error indicates a broken shell process.
    ///
    /// Callers are expected to attempt one session reset before giving up
    /// when this returns true.
    pub fn is_process_error(&self) -> bool {
        matches!(
            self,
            Error::ProcessStartFailed { .. }
                | Error::ProcessWriteFailed { .. }
                | Error::ProcessReadFailed { .. }
                | Error::SessionNotStarted
        )
    }

    /// Whether this error came from the model round-trip and may succeed on retry
    pub fn is_model_error(&self) -> bool {
        matches!(
            self,
            Error::ModelRequest { .. } | Error::ModelResponse { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Shell session errors
            Error::UnknownDialect { name } => {
                write!(f, "Unknown shell dialect for program '{}'", name)
            }
            Error::ProcessStartFailed { program, reason } => {
                write!(f, "Failed to start shell process '{}': {}", program, reason)
            }
            Error::ProcessWriteFailed { reason } => {
                write!(f, "Failed to write to the shell process: {}", reason)
            }
            Error::ProcessReadFailed { reason } => {
                write!(f, "Failed to read from the shell process: {}", reason)
            }
            Error::SessionNotStarted => {
                write!(f, "The shell session has no running process")
            }
            Error::CommandInFlight => {
                write!(
                    f,
                    "Cannot execute a command while another command is executing"
                )
            }

            // Model errors
            Error::ModelRequest { reason } => {
                write!(f, "Language-model request failed: {}", reason)
            }
            Error::ModelResponse { reason } => {
                write!(f, "Unusable language-model response: {}", reason)
            }

            // Configuration errors
            Error::ConfigLoadFailed { path, reason } => {
                write!(
                    f,
                    "Failed to load config from '{}': {}",
                    path.display(),
                    reason
                )
            }
            Error::ConfigValidationFailed { field, reason } => {
                write!(
                    f,
                    "Configuration validation failed for '{}': {}",
                    field, reason
                )
            }

            // File generation errors
            Error::FileSaveFailed { path, reason } => {
                write!(f, "Could not save file '{}': {}", path.display(), reason)
            }

            // I/O and serialization errors
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Serde(err) => write!(f, "Serialization error: {}", err),
            Error::Toml(err) => write!(f, "TOML parsing error: {}", err),

            // Generic fallback
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serde(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Toml(err)
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::Other(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::Other(err.to_string())
    }
}
