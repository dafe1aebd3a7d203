//! Action Dispatch
//!
//! Interprets one model-produced [`Action`] and performs its side effects:
//! user confirmation before any command execution, automatic failure
//! diagnosis, file persistence, and mode changes. Transitions are one-shot
//! per action instance; no action is replayed.
//!
//! Errors escaping an action handler are caught at the dispatch boundary and
//! reported as internal faults; a single malformed action never terminates
//! the session.

use crate::action::{Action, DebugMode};
use crate::files::FileWriter;
use crate::model::ModelClient;
use crate::recovery;
use crate::shell::CommandRunner;
use crate::ui::UserInterface;
use crate::error::Result;

/// What the session loop should do after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Keep prompting the user
    Continue,
    /// Stop after the current turn
    Quit,
}

/// Dispatches actions against the execution-side collaborators it owns
/// (shell runner and file writer); presentation and model collaborators are
/// borrowed per call.
#[derive(Debug)]
pub struct ActionDispatcher<R, W> {
    runner: R,
    writer: W,
}

impl<R, W> ActionDispatcher<R, W>
where
    R: CommandRunner,
    W: FileWriter,
{
    /// Create a dispatcher around a command runner and file writer
    pub fn new(runner: R, writer: W) -> Self {
        Self { runner, writer }
    }

    /// Access the command runner (for session-level operations like reset)
    pub fn runner_mut(&mut self) -> &mut R {
        &mut self.runner
    }

    /// Perform one action.
    ///
    /// This is the fault boundary: any error an action handler did not deal
    /// with itself is reported as an internal problem and the session
    /// continues.
    pub async fn dispatch<U, M>(&mut self, action: Action, ui: &mut U, model: &mut M) -> DispatchOutcome
    where
        U: UserInterface,
        M: ModelClient,
    {
        debug!(kind = action.kind(), "dispatching action");

        match self.dispatch_inner(action, ui, model).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!("action handler failed: {}", err);
                ui.write_error(&format!(
                    "Something went wrong inside the assistant while handling that: {}",
                    err
                ));
                DispatchOutcome::Continue
            }
        }
    }

    async fn dispatch_inner<U, M>(
        &mut self,
        action: Action,
        ui: &mut U,
        model: &mut M,
    ) -> Result<DispatchOutcome>
    where
        U: UserInterface,
        M: ModelClient,
    {
        match action {
            Action::DisplayMessage { text } => {
                ui.write_chat(&text);
                Ok(DispatchOutcome::Continue)
            }
            Action::Quit => Ok(DispatchOutcome::Quit),
            Action::SetDebug { mode } => {
                let enabled = match mode {
                    DebugMode::On => true,
                    DebugMode::Off => false,
                    DebugMode::Toggle => !ui.debug_enabled(),
                };
                ui.set_debug(enabled);
                ui.write_system(&format!(
                    "Debug output is now {}",
                    if enabled { "on" } else { "off" }
                ));
                Ok(DispatchOutcome::Continue)
            }
            Action::RunCommand { command } => self.run_command(&command, ui, model).await,
            Action::GenerateFile {
                file_name,
                content,
                description,
            } => self.generate_file(file_name, &content, &description, ui, model),
        }
    }

    /// Propose, confirm, execute, and (on failure) diagnose one command
    async fn run_command<U, M>(
        &mut self,
        command: &str,
        ui: &mut U,
        model: &mut M,
    ) -> Result<DispatchOutcome>
    where
        U: UserInterface,
        M: ModelClient,
    {
        ui.write_system("I believe the command you are looking for is:");
        ui.write_command(command);

        if !ui.confirm("Shall I execute it for you?") {
            // Declining is a normal outcome, not an error.
            return Ok(DispatchOutcome::Continue);
        }

        model.record_outcome(&format!("Executed the command `{}`.", command));
        ui.write_debug(&format!("command: {}", command));

        let result = match self.runner.run(command).await {
            Ok(result) => result,
            Err(err) if err.is_process_error() => {
                // The shell itself broke (dead child, closed pipe). One
                // reset attempt, then back to the prompt.
                ui.write_error(&format!("The shell session failed: {}", err));
                ui.write_system(
                    "Restarting the shell. Directory changes and exported variables are lost.",
                );
                self.runner.reset().await?;
                return Ok(DispatchOutcome::Continue);
            }
            Err(err) => return Err(err),
        };

        ui.write_debug(&format!("stdout: {}", result.output));
        ui.write_debug(&format!("stderr: {}", result.error));

        ui.write_command_output(&result.output);

        if result.has_error() {
            ui.write_command_error(&result.error);
            ui.write_system("It looks like the command encountered a problem. Investigating...");

            let prompt = format!(
                "Explain why the command `{}` encountered the following error:\n{}",
                command, result.error
            );

            // Explanations are plain text; tools stay disabled so the model
            // cannot chain another command off its own diagnosis.
            let Some(explanation) =
                recovery::run_model_round_trip(ui, model, &prompt, false).await
            else {
                return Ok(DispatchOutcome::Quit);
            };

            match explanation {
                Action::DisplayMessage { text } => ui.write_chat(&text),
                other => {
                    ui.write_debug(&format!(
                        "unexpected {} action in explanation response",
                        other.kind()
                    ));
                }
            }
        }

        Ok(DispatchOutcome::Continue)
    }

    /// Show generated content and persist it if the user wants it kept
    fn generate_file<U, M>(
        &mut self,
        file_name: String,
        content: &str,
        description: &str,
        ui: &mut U,
        model: &mut M,
    ) -> Result<DispatchOutcome>
    where
        U: UserInterface,
        M: ModelClient,
    {
        ui.write_debug(&format!("generating file: {}", file_name));
        ui.write_system("I've generated the following:");
        ui.write_chat(content);

        model.record_outcome(&format!(
            "Generated the file `{}` with this content:\n{}",
            file_name, content
        ));

        if ui.confirm(&format!("Would you like to save the file '{}'?", file_name)) {
            let mut name = file_name;
            if name.is_empty() {
                name = ui.prompt("Please enter a filename:");
                if name.is_empty() {
                    ui.write_system("No file name provided. The file will not be saved.");
                    if !description.is_empty() {
                        ui.write_chat(description);
                    }
                    return Ok(DispatchOutcome::Continue);
                }
            }

            match self.writer.write(&name, content) {
                Ok(()) => ui.write_system(&format!("File {} saved.", name)),
                Err(err) => ui.write_command_error(&format!("{}", err)),
            }
        }

        if !description.is_empty() {
            ui.write_chat(description);
        }

        Ok(DispatchOutcome::Continue)
    }
}
