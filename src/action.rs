//! Assistant Actions
//!
//! The closed set of operations the model-interaction layer can request.
//! Modeled as a sum type with exhaustive matching at the dispatch site, so
//! adding a variant is a compile-time-checked change everywhere it must be
//! handled.

/// Requested state of the diagnostic-output flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugMode {
    /// Turn debug output on
    On,
    /// Turn debug output off
    Off,
    /// Flip the current state
    Toggle,
}

/// One operation requested by the model-interaction layer.
///
/// Produced by the model client, consumed exactly once by the dispatcher.
/// Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Propose a shell command for the user to confirm and execute
    RunCommand {
        /// The command text
        command: String,
    },
    /// Offer a generated file for the user to review and save
    GenerateFile {
        /// Target file name; may be empty, in which case the user is asked
        file_name: String,
        /// The file content
        content: String,
        /// Plain-language explanation of the file
        description: String,
    },
    /// Change the diagnostic-output flag
    SetDebug {
        /// How to change it
        mode: DebugMode,
    },
    /// End the interactive session after the current turn
    Quit,
    /// Show a chat response with no further effect
    DisplayMessage {
        /// The response text
        text: String,
    },
}

impl Action {
    /// Short label used in debug logging
    pub fn kind(&self) -> &'static str {
        match self {
            Action::RunCommand { .. } => "run-command",
            Action::GenerateFile { .. } => "generate-file",
            Action::SetDebug { .. } => "set-debug",
            Action::Quit => "quit",
            Action::DisplayMessage { .. } => "display-message",
        }
    }
}
