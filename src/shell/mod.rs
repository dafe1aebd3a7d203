//! Shell Subsystem
//!
//! Persistent shell sessions, per-dialect profiles, and the sentinel-based
//! command framing protocol.

pub mod executor;
pub mod profile;
pub mod session;

pub use executor::CommandResult;
pub use profile::{ShellDialect, ShellProfile};
pub use session::ShellSession;

use async_trait::async_trait;

use crate::error::Result;

/// Seam between the action dispatcher and the shell session.
///
/// [`ShellSession`] is the production implementation; tests substitute
/// scripted runners.
#[async_trait]
pub trait CommandRunner {
    /// Execute one command and return its framed result
    async fn run(&mut self, command: &str) -> Result<CommandResult>;

    /// Tear down and recreate the underlying shell process
    async fn reset(&mut self) -> Result<()>;
}

#[async_trait]
impl CommandRunner for ShellSession {
    async fn run(&mut self, command: &str) -> Result<CommandResult> {
        self.execute(command).await
    }

    async fn reset(&mut self) -> Result<()> {
        ShellSession::reset(self).await
    }
}
