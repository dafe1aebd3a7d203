//! Interactive Session Loop
//!
//! The outer loop of the assistant: read what the user wants, handle local
//! slash commands, otherwise run a model round-trip (with recovery) and
//! dispatch the resulting action.

use crate::dispatch::{ActionDispatcher, DispatchOutcome};
use crate::error::Result;
use crate::files::FileWriter;
use crate::model::ModelClient;
use crate::recovery;
use crate::shell::CommandRunner;
use crate::ui::UserInterface;

/// Local commands handled without a model round-trip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlashCommand {
    Help,
    Debug,
    Reset,
    Exit,
}

impl SlashCommand {
    const ALL: [SlashCommand; 4] = [
        SlashCommand::Help,
        SlashCommand::Debug,
        SlashCommand::Reset,
        SlashCommand::Exit,
    ];

    fn parse(name: &str) -> Option<Self> {
        match name {
            "help" => Some(SlashCommand::Help),
            "debug" => Some(SlashCommand::Debug),
            "reset" => Some(SlashCommand::Reset),
            "exit" => Some(SlashCommand::Exit),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            SlashCommand::Help => "help",
            SlashCommand::Debug => "debug",
            SlashCommand::Reset => "reset",
            SlashCommand::Exit => "exit",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            SlashCommand::Help => "Display a list of commands",
            SlashCommand::Debug => "Enable/disable debug output",
            SlashCommand::Reset => "Restart the shell session",
            SlashCommand::Exit => "Exit ShellPilot",
        }
    }
}

/// The interactive assistant session
pub struct Assistant<U, M, R, W> {
    ui: U,
    model: M,
    dispatcher: ActionDispatcher<R, W>,
    active: bool,
}

impl<U, M, R, W> Assistant<U, M, R, W>
where
    U: UserInterface,
    M: ModelClient,
    R: CommandRunner,
    W: FileWriter,
{
    /// Assemble a session from its collaborators
    pub fn new(ui: U, model: M, runner: R, writer: W) -> Self {
        Self {
            ui,
            model,
            dispatcher: ActionDispatcher::new(runner, writer),
            active: false,
        }
    }

    /// Run the session until the user quits (or declines a model retry)
    pub async fn run(&mut self) -> Result<()> {
        self.ui
            .write_system("Welcome to ShellPilot. Where would you like to go today?");

        self.active = true;
        while self.active {
            self.prompt_user().await;
        }

        Ok(())
    }

    async fn prompt_user(&mut self) {
        let input = self.read_user_prompt();

        if let Some(name) = input.strip_prefix('/') {
            self.run_slash_command(name).await;
            return;
        }

        self.ui
            .write_system("Let me think about that for a moment...");
        self.ui
            .write_debug(&format!("executing prompt: {}", input));

        let Some(action) =
            recovery::run_model_round_trip(&mut self.ui, &mut self.model, &input, true).await
        else {
            // The user declined a retry; that stops the session.
            self.active = false;
            return;
        };

        self.ui
            .write_debug(&format!("response action: {}", action.kind()));

        match self
            .dispatcher
            .dispatch(action, &mut self.ui, &mut self.model)
            .await
        {
            DispatchOutcome::Continue => {}
            DispatchOutcome::Quit => self.active = false,
        }
    }

    fn read_user_prompt(&mut self) -> String {
        loop {
            let input = self
                .ui
                .prompt("Please tell me what you would like to do?");

            if input.trim().is_empty() {
                self.ui
                    .write_system("Use `/help` to see a list of commands.");
            } else {
                return input;
            }
        }
    }

    async fn run_slash_command(&mut self, name: &str) {
        let Some(command) = SlashCommand::parse(name) else {
            self.ui.write_system(&format!("Unknown command: {}", name));
            self.ui
                .write_system("Use `/help` to see a list of commands.");
            return;
        };

        match command {
            SlashCommand::Help => {
                self.ui.write_system("Available commands:");
                for command in SlashCommand::ALL {
                    self.ui.write_system(&format!(
                        "  /{} - {}",
                        command.name(),
                        command.description()
                    ));
                }
            }
            SlashCommand::Debug => {
                let enabled = !self.ui.debug_enabled();
                self.ui.set_debug(enabled);
                self.ui.write_system(&format!(
                    "Debug output is now {}",
                    if enabled { "on" } else { "off" }
                ));
            }
            SlashCommand::Reset => match self.dispatcher.runner_mut().reset().await {
                Ok(()) => self.ui.write_system(
                    "Shell session restarted. Directory changes and exported variables are lost.",
                ),
                Err(err) => self
                    .ui
                    .write_error(&format!("Could not restart the shell: {}", err)),
            },
            SlashCommand::Exit => self.active = false,
        }
    }
}
