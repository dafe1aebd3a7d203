//! Sentinel Framing Protocol
//!
//! A raw interactive shell stream has no message boundaries. This module
//! imposes them: standard output is read until the per-session sentinel
//! appears (no timeout; shell commands are assumed to terminate and print a
//! fresh prompt), then standard error is drained until it goes quiet for a
//! bounded idle interval. Standard error has no sentinel, so absence of new
//! data is the only termination signal, and a child that writes slowly can
//! have trailing error output truncated.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{Error, Result};

/// Read buffer size for both output streams
pub(crate) const READ_CHUNK: usize = 4096;

/// Idle window after which the standard-error drain gives up waiting
pub(crate) const STDERR_IDLE_TIMEOUT: Duration = Duration::from_millis(500);

/// Structured result of one executed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Text the command wrote to standard output, with framing removed
    pub output: String,
    /// Text the command wrote to standard error
    pub error: String,
}

impl CommandResult {
    /// Whether the command reported failure via its error stream
    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }
}

/// Read standard output until the accumulator contains the sentinel followed
/// by a line break, then strip the framing.
///
/// There is deliberately no timeout here: a command that never terminates or
/// never emits the sentinel blocks until the caller abandons the session
/// (dropping this future leaves the session's in-flight guard set, and a
/// reset restores service).
pub(crate) async fn read_until_sentinel<R>(reader: &mut R, sentinel: &str) -> Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut raw: Vec<u8> = Vec::with_capacity(READ_CHUNK);
    let mut buf = [0u8; READ_CHUNK];

    loop {
        let n = reader
            .read(&mut buf)
            .await
            .map_err(|e| Error::ProcessReadFailed {
                reason: e.to_string(),
            })?;

        if n == 0 {
            return Err(Error::ProcessReadFailed {
                reason: "shell output stream closed before the prompt marker appeared".to_string(),
            });
        }

        raw.extend_from_slice(&buf[..n]);

        let text = String::from_utf8_lossy(&raw);
        if contains_sentinel_line(&text, sentinel) {
            return Ok(strip_sentinel_frame(&text, sentinel));
        }
    }
}

/// Drain standard error until the stream is exhausted or no new bytes arrive
/// within `idle`.
pub(crate) async fn drain_with_idle_timeout<R>(reader: &mut R, idle: Duration) -> Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut raw: Vec<u8> = Vec::new();
    let mut buf = [0u8; READ_CHUNK];

    loop {
        match tokio::time::timeout(idle, reader.read(&mut buf)).await {
            // Idle window elapsed with nothing new: the command is done
            // talking, or is writing too slowly to wait for.
            Err(_) => break,
            // Stream exhausted.
            Ok(Ok(0)) => break,
            Ok(Ok(n)) => raw.extend_from_slice(&buf[..n]),
            Ok(Err(e)) => {
                return Err(Error::ProcessReadFailed {
                    reason: e.to_string(),
                })
            }
        }
    }

    Ok(String::from_utf8_lossy(&raw).into_owned())
}

/// Whether `text` contains the sentinel immediately followed by a line break
fn contains_sentinel_line(text: &str, sentinel: &str) -> bool {
    last_sentinel_position(text, sentinel).is_some()
}

/// Byte offset of the last sentinel occurrence that is followed by a line
/// break (`\n` or `\r\n`)
fn last_sentinel_position(text: &str, sentinel: &str) -> Option<usize> {
    let mut last = None;
    let mut from = 0;

    while let Some(rel) = text[from..].find(sentinel) {
        let idx = from + rel;
        let rest = &text[idx + sentinel.len()..];
        if rest.starts_with('\n') || rest.starts_with("\r\n") {
            last = Some(idx);
        }
        from = idx + sentinel.len();
    }

    last
}

/// Remove the sentinel framing from accumulated standard output.
///
/// Truncates at the final sentinel-plus-newline occurrence (dropping the
/// sentinel and anything read after it), then drops the final unterminated
/// line: on dialects that embed the sentinel in the prompt itself, that
/// fragment is the bare remnant of the previous prompt; on bash-like
/// dialects the stripped text already ends with a newline and nothing is
/// dropped.
pub(crate) fn strip_sentinel_frame(text: &str, sentinel: &str) -> String {
    let Some(idx) = last_sentinel_position(text, sentinel) else {
        return text.to_string();
    };

    let head = &text[..idx];
    match head.rfind('\n') {
        Some(nl) => head[..nl + 1].to_string(),
        None => String::new(),
    }
}
