//! Model Round-Trip Recovery
//!
//! Wraps one request/response cycle with retry-or-abort semantics. The loop
//! is unbounded: a failure is reported, the user decides whether to retry,
//! and answering "no" is the only way out other than success. This is also
//! the only place a user decision can stop the whole session without going
//! through the quit action.

use crate::action::Action;
use crate::model::ModelClient;
use crate::ui::UserInterface;

/// Run one model round-trip, retrying on failure for as long as the user
/// asks to.
///
/// Returns `None` when the user declines a retry, which callers must treat
/// as "stop the session".
pub async fn run_model_round_trip<U, M>(
    ui: &mut U,
    model: &mut M,
    prompt: &str,
    use_tools: bool,
) -> Option<Action>
where
    U: UserInterface,
    M: ModelClient,
{
    loop {
        match model.respond(prompt, use_tools).await {
            Ok(action) => return Some(action),
            Err(err) => {
                warn!("model round-trip failed: {}", err);
                ui.write_error(&format!("The assistant service failed: {}", err));
                if !ui.confirm("Do you want to retry?") {
                    return None;
                }
            }
        }
    }
}
