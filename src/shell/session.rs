//! Shell Session Management
//!
//! Owns one persistent child shell process and its three piped streams, and
//! runs the sentinel framing protocol over them. The process and stream
//! handles form a single ownership cluster ([`ShellProcess`]) so that reset
//! reliably releases the old handles before acquiring new ones.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};
use uuid::Uuid;

use super::executor::{
    drain_with_idle_timeout, read_until_sentinel, CommandResult, STDERR_IDLE_TIMEOUT,
};
use super::profile::{ShellDialect, ShellProfile};
use crate::error::{Error, Result};

/// The child shell process and its three redirected streams.
///
/// Held as one unit so teardown is all-or-nothing: `shutdown` consumes the
/// cluster, and a new cluster is only built by `spawn`.
struct ShellProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: ChildStdout,
    stderr: ChildStderr,
}

impl ShellProcess {
    /// Spawn the shell with all three streams piped, cwd = the caller's
    /// current directory, and no visible window.
    fn spawn(program: &str) -> Result<Self> {
        let mut command = Command::new(program);
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Ok(cwd) = std::env::current_dir() {
            command.current_dir(cwd);
        }

        #[cfg(windows)]
        {
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        let mut child = command.spawn().map_err(|e| Error::ProcessStartFailed {
            program: program.to_string(),
            reason: e.to_string(),
        })?;

        let stdin = child.stdin.take().ok_or_else(|| Error::ProcessStartFailed {
            program: program.to_string(),
            reason: "child has no input stream".to_string(),
        })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::ProcessStartFailed {
                program: program.to_string(),
                reason: "child has no output stream".to_string(),
            })?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::ProcessStartFailed {
                program: program.to_string(),
                reason: "child has no error stream".to_string(),
            })?;

        debug!("spawned shell process '{}'", program);

        Ok(Self {
            child,
            stdin,
            stdout,
            stderr,
        })
    }

    /// Best-effort teardown. The process is being discarded, so kill and
    /// wait errors are swallowed.
    async fn shutdown(mut self) {
        let _ = self.child.start_kill();
        let _ = self.child.wait().await;
    }
}

/// A persistent shell session with sentinel-framed command execution
pub struct ShellSession {
    program: String,
    profile: ShellProfile,
    sentinel: String,
    process: Option<ShellProcess>,
    in_flight: bool,
}

impl ShellSession {
    /// Create a session for the given shell program.
    ///
    /// Spawns the child process and immediately runs the profile's prompt
    /// reconfiguration command (if the dialect has one) so every subsequent
    /// prompt carries the sentinel.
    pub async fn create(program: &str) -> Result<Self> {
        let dialect = ShellDialect::from_program(program)?;
        let profile = ShellProfile::for_dialect(dialect);

        // Unique per session so command output echoing an old token can
        // never be mistaken for a frame boundary.
        let sentinel = format!("SHELLPILOT-MARK-{}", Uuid::new_v4().simple());

        let mut session = Self {
            program: program.to_string(),
            profile,
            sentinel,
            process: None,
            in_flight: false,
        };
        session.start().await?;

        Ok(session)
    }

    /// The dialect this session is driving
    pub fn dialect(&self) -> ShellDialect {
        self.profile.dialect
    }

    /// Whether a command is currently executing
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    async fn start(&mut self) -> Result<()> {
        self.process = Some(ShellProcess::spawn(&self.program)?);
        self.in_flight = false;

        if let Some(setup) = self.profile.prompt_setup_command(&self.sentinel) {
            debug!("configuring shell prompt for {}", self.profile.dialect.as_str());
            self.execute(&setup).await?;
        }

        Ok(())
    }

    /// Execute one command and return its framed result.
    ///
    /// At most one command may be in flight; a second call while one is
    /// executing fails with [`Error::CommandInFlight`] without touching the
    /// streams. The guard is only cleared on success: if execution fails or
    /// the future is dropped mid-read, the session stays marked in-flight
    /// (its streams are desynchronized) until [`ShellSession::reset`]
    /// restores it.
    pub async fn execute(&mut self, command: &str) -> Result<CommandResult> {
        if self.in_flight {
            return Err(Error::CommandInFlight);
        }
        self.in_flight = true;

        let result = self.execute_inner(command).await;
        if result.is_ok() {
            self.in_flight = false;
        }

        result
    }

    async fn execute_inner(&mut self, command: &str) -> Result<CommandResult> {
        let process = self.process.as_mut().ok_or(Error::SessionNotStarted)?;

        let mut line = String::with_capacity(command.len() + self.sentinel.len() + 16);
        line.push_str(command);
        if let Some(suffix) = self.profile.command_suffix(&self.sentinel) {
            line.push_str(&suffix);
        }
        line.push('\n');

        process
            .stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|e| Error::ProcessWriteFailed {
                reason: e.to_string(),
            })?;
        process
            .stdin
            .flush()
            .await
            .map_err(|e| Error::ProcessWriteFailed {
                reason: e.to_string(),
            })?;

        // Standard output is fully consumed before the error drain begins,
        // so the error text always belongs to this command.
        let output = read_until_sentinel(&mut process.stdout, &self.sentinel).await?;
        let error = drain_with_idle_timeout(&mut process.stderr, STDERR_IDLE_TIMEOUT).await?;

        Ok(CommandResult { output, error })
    }

    /// Tear down the current shell process and spawn a fresh one with the
    /// same dialect.
    ///
    /// Used when the session is believed corrupted (e.g. a read
    /// desynchronized from the sentinel protocol). Any state embedded in the
    /// live shell — directory changes, exported variables — is lost; that is
    /// the documented cost of a reset, not a defect.
    pub async fn reset(&mut self) -> Result<()> {
        info!("resetting shell session for '{}'", self.program);

        if let Some(process) = self.process.take() {
            process.shutdown().await;
        }
        self.in_flight = false;

        self.start().await
    }

    /// Release the process and streams; idempotent.
    pub async fn terminate(&mut self) {
        if let Some(process) = self.process.take() {
            process.shutdown().await;
        }
        self.in_flight = false;
    }
}

impl std::fmt::Debug for ShellSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShellSession")
            .field("program", &self.program)
            .field("dialect", &self.profile.dialect)
            .field("in_flight", &self.in_flight)
            .field("running", &self.process.is_some())
            .finish()
    }
}
