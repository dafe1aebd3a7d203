//! Integration Tests for Action Dispatch and Recovery
//!
//! Drive the dispatcher and the recovery loop with scripted collaborators:
//! a UI that replays canned confirmations, a model that replays canned
//! responses, and a command runner that replays canned results. Mirrors the
//! test doubles the original session flows are specified against.

use std::collections::VecDeque;

use async_trait::async_trait;

use shellpilot::action::{Action, DebugMode};
use shellpilot::dispatch::{ActionDispatcher, DispatchOutcome};
use shellpilot::error::{Error, Result};
use shellpilot::files::FileWriter;
use shellpilot::model::ModelClient;
use shellpilot::recovery;
use shellpilot::shell::{CommandResult, CommandRunner};
use shellpilot::ui::UserInterface;

/// UI double that replays scripted answers and records everything written
#[derive(Default)]
struct ScriptedUi {
    confirms: VecDeque<bool>,
    prompts: VecDeque<String>,
    debug: bool,
    system: Vec<String>,
    chat: Vec<String>,
    commands: Vec<String>,
    command_output: Vec<String>,
    command_errors: Vec<String>,
    errors: Vec<String>,
}

impl ScriptedUi {
    fn confirming(answers: &[bool]) -> Self {
        Self {
            confirms: answers.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl UserInterface for ScriptedUi {
    fn debug_enabled(&self) -> bool {
        self.debug
    }

    fn set_debug(&mut self, enabled: bool) {
        self.debug = enabled;
    }

    fn prompt(&mut self, _message: &str) -> String {
        self.prompts.pop_front().unwrap_or_default()
    }

    fn confirm(&mut self, _message: &str) -> bool {
        self.confirms.pop_front().unwrap_or(false)
    }

    fn write_system(&mut self, message: &str) {
        self.system.push(message.to_string());
    }

    fn write_chat(&mut self, message: &str) {
        self.chat.push(message.to_string());
    }

    fn write_command(&mut self, message: &str) {
        self.commands.push(message.to_string());
    }

    fn write_command_output(&mut self, message: &str) {
        self.command_output.push(message.to_string());
    }

    fn write_command_error(&mut self, message: &str) {
        self.command_errors.push(message.to_string());
    }

    fn write_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn write_debug(&mut self, _message: &str) {}
}

/// Model double that replays scripted responses and records every request
#[derive(Default)]
struct ScriptedModel {
    responses: VecDeque<Result<Action>>,
    requests: Vec<(String, bool)>,
    outcomes: Vec<String>,
}

#[async_trait]
impl ModelClient for ScriptedModel {
    async fn respond(&mut self, prompt: &str, use_tools: bool) -> Result<Action> {
        self.requests.push((prompt.to_string(), use_tools));
        self.responses.pop_front().unwrap_or_else(|| {
            Err(Error::ModelRequest {
                reason: "no scripted response".to_string(),
            })
        })
    }

    fn record_outcome(&mut self, text: &str) {
        self.outcomes.push(text.to_string());
    }
}

/// Runner double that replays scripted results and records every call
#[derive(Default)]
struct ScriptedRunner {
    results: VecDeque<Result<CommandResult>>,
    calls: Vec<String>,
    resets: usize,
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&mut self, command: &str) -> Result<CommandResult> {
        self.calls.push(command.to_string());
        self.results.pop_front().unwrap_or_else(|| {
            Ok(CommandResult {
                output: String::new(),
                error: String::new(),
            })
        })
    }

    async fn reset(&mut self) -> Result<()> {
        self.resets += 1;
        Ok(())
    }
}

/// Writer double recording saves, optionally failing
#[derive(Default)]
struct MemoryWriter {
    files: Vec<(String, String)>,
    fail: bool,
}

impl FileWriter for MemoryWriter {
    fn write(&mut self, name: &str, content: &str) -> Result<()> {
        if self.fail {
            return Err(Error::FileSaveFailed {
                path: name.into(),
                reason: "disk full".to_string(),
            });
        }
        self.files.push((name.to_string(), content.to_string()));
        Ok(())
    }
}

fn ok_result(output: &str, error: &str) -> Result<CommandResult> {
    Ok(CommandResult {
        output: output.to_string(),
        error: error.to_string(),
    })
}

#[tokio::test]
async fn test_display_message_writes_chat() {
    let mut ui = ScriptedUi::default();
    let mut model = ScriptedModel::default();
    let mut dispatcher = ActionDispatcher::new(ScriptedRunner::default(), MemoryWriter::default());

    let outcome = dispatcher
        .dispatch(
            Action::DisplayMessage {
                text: "hello there".to_string(),
            },
            &mut ui,
            &mut model,
        )
        .await;

    assert_eq!(outcome, DispatchOutcome::Continue);
    assert_eq!(ui.chat, vec!["hello there"]);
}

#[tokio::test]
async fn test_quit_stops_the_loop() {
    let mut ui = ScriptedUi::default();
    let mut model = ScriptedModel::default();
    let mut dispatcher = ActionDispatcher::new(ScriptedRunner::default(), MemoryWriter::default());

    let outcome = dispatcher.dispatch(Action::Quit, &mut ui, &mut model).await;
    assert_eq!(outcome, DispatchOutcome::Quit);
}

#[tokio::test]
async fn test_set_debug_toggles_ui_flag() {
    let mut ui = ScriptedUi::default();
    let mut model = ScriptedModel::default();
    let mut dispatcher = ActionDispatcher::new(ScriptedRunner::default(), MemoryWriter::default());

    dispatcher
        .dispatch(
            Action::SetDebug {
                mode: DebugMode::Toggle,
            },
            &mut ui,
            &mut model,
        )
        .await;
    assert!(ui.debug_enabled());

    dispatcher
        .dispatch(
            Action::SetDebug {
                mode: DebugMode::Off,
            },
            &mut ui,
            &mut model,
        )
        .await;
    assert!(!ui.debug_enabled());
}

#[tokio::test]
async fn test_declined_command_is_never_executed() {
    let mut ui = ScriptedUi::confirming(&[false]);
    let mut model = ScriptedModel::default();
    let mut dispatcher = ActionDispatcher::new(ScriptedRunner::default(), MemoryWriter::default());

    let outcome = dispatcher
        .dispatch(
            Action::RunCommand {
                command: "rm -rf /".to_string(),
            },
            &mut ui,
            &mut model,
        )
        .await;

    assert_eq!(outcome, DispatchOutcome::Continue);
    assert!(dispatcher.runner_mut().calls.is_empty());
    assert!(ui.command_output.is_empty());
    // The proposal itself is still shown.
    assert_eq!(ui.commands, vec!["rm -rf /"]);
}

#[tokio::test]
async fn test_confirmed_successful_command_shows_output_without_diagnosis() {
    let mut ui = ScriptedUi::confirming(&[true]);
    let mut model = ScriptedModel::default();
    let mut runner = ScriptedRunner::default();
    runner.results.push_back(ok_result("file-a\nfile-b\n", ""));
    let mut dispatcher = ActionDispatcher::new(runner, MemoryWriter::default());

    dispatcher
        .dispatch(
            Action::RunCommand {
                command: "ls".to_string(),
            },
            &mut ui,
            &mut model,
        )
        .await;

    assert_eq!(dispatcher.runner_mut().calls, vec!["ls"]);
    assert!(ui.command_output[0].contains("file-a"));
    assert!(ui.command_errors.is_empty());
    // No error means no explanation round-trip.
    assert!(model.requests.is_empty());
}

#[tokio::test]
async fn test_failing_command_triggers_exactly_one_explanation() {
    let mut ui = ScriptedUi::confirming(&[true]);
    let mut model = ScriptedModel::default();
    model.responses.push_back(Ok(Action::DisplayMessage {
        text: "The file does not exist.".to_string(),
    }));
    let mut runner = ScriptedRunner::default();
    runner
        .results
        .push_back(ok_result("", "cat: nope.txt: No such file or directory\n"));
    let mut dispatcher = ActionDispatcher::new(runner, MemoryWriter::default());

    let outcome = dispatcher
        .dispatch(
            Action::RunCommand {
                command: "cat nope.txt".to_string(),
            },
            &mut ui,
            &mut model,
        )
        .await;

    assert_eq!(outcome, DispatchOutcome::Continue);

    // The raw error is shown, then the diagnosis.
    assert!(ui.command_errors[0].contains("No such file"));
    assert_eq!(ui.chat, vec!["The file does not exist."]);

    // Exactly one explanation request, with tools disabled.
    assert_eq!(model.requests.len(), 1);
    let (prompt, use_tools) = &model.requests[0];
    assert!(prompt.contains("cat nope.txt"));
    assert!(prompt.contains("No such file"));
    assert!(!use_tools);
}

#[tokio::test]
async fn test_process_error_triggers_one_reset() {
    let mut ui = ScriptedUi::confirming(&[true]);
    let mut model = ScriptedModel::default();
    let mut runner = ScriptedRunner::default();
    runner.results.push_back(Err(Error::ProcessWriteFailed {
        reason: "broken pipe".to_string(),
    }));
    let mut dispatcher = ActionDispatcher::new(runner, MemoryWriter::default());

    let outcome = dispatcher
        .dispatch(
            Action::RunCommand {
                command: "echo hi".to_string(),
            },
            &mut ui,
            &mut model,
        )
        .await;

    assert_eq!(outcome, DispatchOutcome::Continue);
    assert_eq!(dispatcher.runner_mut().resets, 1);
    assert!(ui.errors[0].contains("broken pipe"));
}

#[tokio::test]
async fn test_internal_fault_is_contained() {
    let mut ui = ScriptedUi::confirming(&[true]);
    let mut model = ScriptedModel::default();
    let mut runner = ScriptedRunner::default();
    runner
        .results
        .push_back(Err(Error::Other("unexpected".to_string())));
    let mut dispatcher = ActionDispatcher::new(runner, MemoryWriter::default());

    let outcome = dispatcher
        .dispatch(
            Action::RunCommand {
                command: "echo hi".to_string(),
            },
            &mut ui,
            &mut model,
        )
        .await;

    // The fault is reported as an internal problem and the session goes on.
    assert_eq!(outcome, DispatchOutcome::Continue);
    assert!(ui.errors[0].contains("Something went wrong"));
    assert_eq!(dispatcher.runner_mut().resets, 0);
}

#[tokio::test]
async fn test_generate_file_saves_on_confirmation() {
    let mut ui = ScriptedUi::confirming(&[true]);
    let mut model = ScriptedModel::default();
    let mut dispatcher = ActionDispatcher::new(ScriptedRunner::default(), MemoryWriter::default());

    dispatcher
        .dispatch(
            Action::GenerateFile {
                file_name: "hello.sh".to_string(),
                content: "#!/bin/sh\necho hi\n".to_string(),
                description: "A greeting script.".to_string(),
            },
            &mut ui,
            &mut model,
        )
        .await;

    // Can't reach the writer directly; the saved notice and recorded
    // outcome cover it.
    assert!(ui.system.iter().any(|m| m.contains("hello.sh saved")));
    assert!(ui.chat.iter().any(|m| m == "A greeting script."));
    assert!(model.outcomes[0].contains("hello.sh"));
}

#[tokio::test]
async fn test_generate_file_prompts_for_missing_name() {
    let mut ui = ScriptedUi::confirming(&[true]);
    ui.prompts.push_back("named-later.sh".to_string());
    let mut model = ScriptedModel::default();
    let mut dispatcher = ActionDispatcher::new(ScriptedRunner::default(), MemoryWriter::default());

    dispatcher
        .dispatch(
            Action::GenerateFile {
                file_name: String::new(),
                content: "content".to_string(),
                description: String::new(),
            },
            &mut ui,
            &mut model,
        )
        .await;

    assert!(ui.system.iter().any(|m| m.contains("named-later.sh saved")));
}

#[tokio::test]
async fn test_generate_file_abandons_save_without_a_name() {
    let mut ui = ScriptedUi::confirming(&[true]);
    let mut model = ScriptedModel::default();
    let mut dispatcher = ActionDispatcher::new(ScriptedRunner::default(), MemoryWriter::default());

    let outcome = dispatcher
        .dispatch(
            Action::GenerateFile {
                file_name: String::new(),
                content: "content".to_string(),
                description: String::new(),
            },
            &mut ui,
            &mut model,
        )
        .await;

    assert_eq!(outcome, DispatchOutcome::Continue);
    assert!(ui
        .system
        .iter()
        .any(|m| m.contains("will not be saved")));
}

#[tokio::test]
async fn test_generate_file_write_failure_is_reported_not_fatal() {
    let mut ui = ScriptedUi::confirming(&[true]);
    let mut model = ScriptedModel::default();
    let writer = MemoryWriter {
        fail: true,
        ..MemoryWriter::default()
    };
    let mut dispatcher = ActionDispatcher::new(ScriptedRunner::default(), writer);

    let outcome = dispatcher
        .dispatch(
            Action::GenerateFile {
                file_name: "doomed.txt".to_string(),
                content: "content".to_string(),
                description: String::new(),
            },
            &mut ui,
            &mut model,
        )
        .await;

    assert_eq!(outcome, DispatchOutcome::Continue);
    assert!(ui.command_errors[0].contains("doomed.txt"));
    assert!(ui.command_errors[0].contains("disk full"));
}

#[tokio::test]
async fn test_recovery_loop_retry_once_then_stop() {
    // Transient failure, user retries once, then declines: exactly two
    // attempts, then the caller is told to stop the session.
    let mut ui = ScriptedUi::confirming(&[true, false]);
    let mut model = ScriptedModel::default();
    model.responses.push_back(Err(Error::ModelRequest {
        reason: "429 too many requests".to_string(),
    }));
    model.responses.push_back(Err(Error::ModelRequest {
        reason: "429 too many requests".to_string(),
    }));

    let action = recovery::run_model_round_trip(&mut ui, &mut model, "list my files", true).await;

    assert!(action.is_none());
    assert_eq!(model.requests.len(), 2);
    assert_eq!(ui.errors.len(), 2);
}

#[tokio::test]
async fn test_recovery_loop_returns_action_after_retry() {
    let mut ui = ScriptedUi::confirming(&[true]);
    let mut model = ScriptedModel::default();
    model.responses.push_back(Err(Error::ModelRequest {
        reason: "connection reset".to_string(),
    }));
    model.responses.push_back(Ok(Action::DisplayMessage {
        text: "second time lucky".to_string(),
    }));

    let action = recovery::run_model_round_trip(&mut ui, &mut model, "hello", true).await;

    assert_eq!(
        action,
        Some(Action::DisplayMessage {
            text: "second time lucky".to_string()
        })
    );
    assert_eq!(model.requests.len(), 2);
}

#[tokio::test]
async fn test_explanation_recovery_declined_stops_session() {
    // A failing command whose explanation round-trip also fails, with the
    // user declining the retry: the dispatcher reports Quit.
    let mut ui = ScriptedUi::confirming(&[true, false]);
    let mut model = ScriptedModel::default();
    model.responses.push_back(Err(Error::ModelRequest {
        reason: "service unavailable".to_string(),
    }));
    let mut runner = ScriptedRunner::default();
    runner.results.push_back(ok_result("", "exploded\n"));
    let mut dispatcher = ActionDispatcher::new(runner, MemoryWriter::default());

    let outcome = dispatcher
        .dispatch(
            Action::RunCommand {
                command: "boom".to_string(),
            },
            &mut ui,
            &mut model,
        )
        .await;

    assert_eq!(outcome, DispatchOutcome::Quit);
}
