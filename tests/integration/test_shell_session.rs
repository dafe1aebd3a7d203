//! Integration Tests for the Shell Session
//!
//! These run against a real `bash` child process and exercise the sentinel
//! framing protocol end to end: command output framing, stderr capture,
//! reset semantics, and the in-flight guard after a cancelled execution.

#![cfg(unix)]

use std::time::Duration;

use shellpilot::error::Error;
use shellpilot::shell::{ShellDialect, ShellSession};

#[tokio::test]
async fn test_first_execute_returns_output() {
    let mut session = ShellSession::create("bash").await.expect("bash should start");
    assert_eq!(session.dialect(), ShellDialect::Bash);

    let result = session.execute("echo shellpilot-integration").await.unwrap();

    assert!(result.output.contains("shellpilot-integration"));
    assert!(result.error.is_empty());
    assert!(!result.has_error());

    session.terminate().await;
}

#[tokio::test]
async fn test_output_never_contains_sentinel() {
    let mut session = ShellSession::create("bash").await.unwrap();

    let result = session.execute("echo visible").await.unwrap();
    assert!(!result.output.contains("SHELLPILOT-MARK"));

    session.terminate().await;
}

#[tokio::test]
async fn test_stderr_only_command() {
    let mut session = ShellSession::create("bash").await.unwrap();

    let result = session
        .execute("cat /definitely/not/a/real/file/shellpilot")
        .await
        .unwrap();

    assert!(result.output.trim().is_empty());
    assert!(result.has_error());
    assert!(result.error.contains("No such file"));

    session.terminate().await;
}

#[tokio::test]
async fn test_sequential_commands_stay_framed() {
    let mut session = ShellSession::create("bash").await.unwrap();

    let first = session.execute("echo first-marker").await.unwrap();
    let second = session.execute("echo second-marker").await.unwrap();

    assert!(first.output.contains("first-marker"));
    assert!(!first.output.contains("second-marker"));
    assert!(second.output.contains("second-marker"));
    assert!(!second.output.contains("first-marker"));

    session.terminate().await;
}

#[tokio::test]
async fn test_reset_discards_shell_state_and_restores_service() {
    let mut session = ShellSession::create("bash").await.unwrap();

    session.execute("cd /").await.unwrap();
    let before = session.execute("pwd").await.unwrap();
    assert_eq!(before.output.trim(), "/");

    session.reset().await.unwrap();

    // The session works again, and the directory change is gone: the new
    // shell starts in the test process's working directory.
    let after = session.execute("pwd").await.unwrap();
    let cwd = std::env::current_dir().unwrap();
    assert_eq!(after.output.trim(), cwd.to_string_lossy());

    let echo = session.execute("echo after-reset").await.unwrap();
    assert!(echo.output.contains("after-reset"));

    session.terminate().await;
}

#[tokio::test]
async fn test_cancelled_execute_leaves_guard_set_until_reset() {
    let mut session = ShellSession::create("bash").await.unwrap();

    // Abandon an execution mid-read; the sentinel wait has no timeout of its
    // own, so the future is dropped from outside.
    let abandoned = tokio::time::timeout(
        Duration::from_millis(100),
        session.execute("sleep 5"),
    )
    .await;
    assert!(abandoned.is_err());
    assert!(session.is_in_flight());

    // The session refuses further work instead of reading desynchronized
    // streams.
    let err = session.execute("echo too-soon").await.unwrap_err();
    assert!(matches!(err, Error::CommandInFlight));

    // Reset is the escape hatch.
    session.reset().await.unwrap();
    assert!(!session.is_in_flight());

    let result = session.execute("echo recovered").await.unwrap();
    assert!(result.output.contains("recovered"));

    session.terminate().await;
}

#[tokio::test]
async fn test_terminate_is_idempotent() {
    let mut session = ShellSession::create("bash").await.unwrap();

    session.terminate().await;
    session.terminate().await;

    let err = session.execute("echo nope").await.unwrap_err();
    assert!(matches!(err, Error::SessionNotStarted));
}

#[tokio::test]
async fn test_unknown_shell_program_fails_at_creation() {
    let err = ShellSession::create("fortranrepl").await.unwrap_err();
    assert!(matches!(err, Error::UnknownDialect { .. }));
}

#[tokio::test]
async fn test_unspawnable_shell_fails_at_creation() {
    // Recognized dialect name, nonexistent binary.
    let err = ShellSession::create("/no/such/dir/bash").await.unwrap_err();
    assert!(matches!(err, Error::ProcessStartFailed { .. }));
}
