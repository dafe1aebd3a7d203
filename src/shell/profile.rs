//! Shell Dialect Profiles
//!
//! Canonical definition of the shell dialects ShellPilot can drive and the
//! per-dialect knowledge needed by the sentinel framing protocol: how to
//! reconfigure the shell's prompt so it emits the sentinel, and whether a
//! command needs a synthetic suffix to force sentinel output.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Kind of shell being driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShellDialect {
    /// Bourne-style shells (bash, zsh, sh, dash)
    Bash,
    /// Windows Command Prompt
    Cmd,
    /// PowerShell / pwsh
    PowerShell,
}

impl ShellDialect {
    /// Get a string representation of the dialect
    pub fn as_str(&self) -> &'static str {
        match self {
            ShellDialect::Bash => "bash",
            ShellDialect::Cmd => "cmd",
            ShellDialect::PowerShell => "powershell",
        }
    }

    /// Resolve the dialect from a shell program name (case-insensitive).
    ///
    /// Matching is by substring so paths like `/bin/bash` or `pwsh.exe`
    /// resolve as expected. An unrecognized program name is a configuration
    /// error; the caller must supply a recognized shell.
    pub fn from_program(program: &str) -> Result<Self> {
        let name = program.to_lowercase();

        // PowerShell must be checked before the Bourne-family matches below.
        if name.contains("powershell") || name.contains("pwsh") {
            Ok(ShellDialect::PowerShell)
        } else if name.contains("cmd") {
            Ok(ShellDialect::Cmd)
        } else if name.contains("bash")
            || name.contains("zsh")
            || name.contains("dash")
            || name == "sh"
            || name.ends_with("/sh")
        {
            Ok(ShellDialect::Bash)
        } else {
            Err(Error::UnknownDialect {
                name: program.to_string(),
            })
        }
    }
}

/// Immutable per-dialect record consumed by the command executor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellProfile {
    /// The dialect this profile describes
    pub dialect: ShellDialect,
    /// Whether submitted commands need a trailing `; echo <sentinel>` because
    /// the dialect does not echo its prompt to standard output
    pub needs_sentinel_suffix: bool,
}

impl ShellProfile {
    /// Build the profile for a dialect
    pub fn for_dialect(dialect: ShellDialect) -> Self {
        match dialect {
            // Bash does not flush its prompt to stdout without a terminal,
            // so the sentinel is echoed explicitly after every command.
            ShellDialect::Bash => Self {
                dialect,
                needs_sentinel_suffix: true,
            },
            ShellDialect::Cmd | ShellDialect::PowerShell => Self {
                dialect,
                needs_sentinel_suffix: false,
            },
        }
    }

    /// The command that reconfigures the shell's displayed prompt to begin
    /// with the sentinel, or `None` when the dialect uses the suffix approach
    /// instead.
    pub fn prompt_setup_command(&self, sentinel: &str) -> Option<String> {
        match self.dialect {
            ShellDialect::Bash => None,
            ShellDialect::Cmd => Some(format!("prompt {}$_$P$G", sentinel)),
            ShellDialect::PowerShell => Some(format!(
                "function prompt {{ \"{}`n$($executionContext.SessionState.Path.CurrentLocation)$('>' * ($nestedPromptLevel + 1)) \" }}",
                sentinel
            )),
        }
    }

    /// The synthetic suffix appended to every submitted command, if any
    pub fn command_suffix(&self, sentinel: &str) -> Option<String> {
        if self.needs_sentinel_suffix {
            Some(format!(" ; echo {}", sentinel))
        } else {
            None
        }
    }
}
