//! ShellPilot - An interactive command-line assistant
//!
//! ShellPilot turns natural-language requests into shell commands, generated
//! files, or explanations, executes commands on the user's behalf, and asks
//! the language model to diagnose command failures.
//!
//! ## Module Organization
//!
//! ### Core Functionality
//!
//! - [`shell`] - Persistent shell sessions and the sentinel framing protocol
//! - [`dispatch`] - Dispatch of model-produced actions with confirmation and
//!   automatic failure diagnosis
//! - [`recovery`] - Retry-or-abort wrapper around model round-trips
//! - [`action`] - The closed set of actions the model can request
//! - [`mod@error`] - Error types and Result aliases
//!
//! ### Collaborators
//!
//! - [`model`] - Language-model client trait and OpenAI-compatible
//!   implementation
//! - [`ui`] - Categorized console presentation
//! - [`files`] - Generated-file persistence
//! - [`history`] - Bounded role-tagged conversation context
//! - [`config`] - TOML configuration with environment overrides
//! - [`app`] - The interactive session loop
//!
//! ## How Command Execution Works
//!
//! A child shell with plain pipes has no message boundaries, so ShellPilot
//! imposes them: each session reconfigures the shell's prompt (or suffixes
//! each command) to emit a unique sentinel token, reads standard output
//! until the sentinel appears, then drains standard error until it goes
//! quiet. A command that never prints a fresh prompt blocks the session; the
//! `/reset` command is the escape hatch, at the cost of shell-local state.

#[macro_use]
extern crate tracing;

pub mod action;
pub mod app;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod files;
pub mod history;
pub mod model;
pub mod recovery;
pub mod shell;
pub mod ui;

// Re-exports for core functionality
pub use action::{Action, DebugMode};
pub use app::Assistant;
pub use config::{Config, ConfigLoader};
pub use dispatch::{ActionDispatcher, DispatchOutcome};
pub use error::{Error, Result};
pub use shell::{CommandResult, CommandRunner, ShellDialect, ShellSession};

// Version information
/// The current version of ShellPilot from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The application name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");
