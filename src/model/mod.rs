//! Language-Model Client
//!
//! The trait the core consumes for model round-trips, and the
//! OpenAI-compatible implementation behind it. Any failure from `respond` is
//! treated as transient by the caller and routed through the recovery loop.

pub mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;

use crate::action::Action;
use crate::error::Result;

/// A collaborator that turns user text into an [`Action`].
#[async_trait]
pub trait ModelClient {
    /// One request/response cycle.
    ///
    /// With `use_tools` set, the model may answer with any action variant;
    /// without it (used for error explanations) the response is plain text
    /// surfaced as [`Action::DisplayMessage`].
    async fn respond(&mut self, prompt: &str, use_tools: bool) -> Result<Action>;

    /// Append an outcome (executed command text, generated content) to the
    /// conversational context owned by the client.
    fn record_outcome(&mut self, text: &str);
}
