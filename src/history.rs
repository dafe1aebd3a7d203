//! Conversation History
//!
//! Role-tagged context for model round-trips. The history is owned by the
//! model client; the dispatcher only appends outcomes (command text,
//! generated content) through the client. System entries are always kept;
//! user and assistant entries are windowed so the request payload stays
//! bounded.

use chrono::{DateTime, Utc};

/// Who produced an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Instructions seeded at session start
    System,
    /// Text typed by the user
    User,
    /// Model responses and recorded outcomes
    Assistant,
}

impl Role {
    /// Wire name used in model request payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One history entry
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Who produced it
    pub role: Role,
    /// The text
    pub text: String,
    /// When it was recorded
    pub timestamp: DateTime<Utc>,
}

/// Bounded conversation history
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    window: usize,
}

impl History {
    /// Create a history whose non-system window holds at most `window`
    /// entries
    pub fn new(window: usize) -> Self {
        Self {
            entries: Vec::new(),
            window,
        }
    }

    /// Append an entry
    pub fn push(&mut self, role: Role, text: impl Into<String>) {
        self.entries.push(HistoryEntry {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        });
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries to send with the next request: every system entry, in
    /// order, followed by the last `window` user/assistant entries.
    pub fn windowed(&self) -> Vec<&HistoryEntry> {
        let mut selected: Vec<&HistoryEntry> = self
            .entries
            .iter()
            .filter(|e| e.role == Role::System)
            .collect();

        let conversational: Vec<&HistoryEntry> = self
            .entries
            .iter()
            .filter(|e| e.role != Role::System)
            .collect();

        let skip = conversational.len().saturating_sub(self.window);
        selected.extend(conversational.into_iter().skip(skip));

        selected
    }
}
