//! Model selection.

use tracing::debug;

use crate::domain::{ModelChoice, ModelSettings};

/// Pick the model for a review.
///
/// `request_tokens` is the estimate of the largest single request: the whole
/// diff when unchunked, the biggest chunk otherwise. A greedy chunk can exceed
/// the safe budget (the budget itself may, and an oversized file sits alone),
/// so chunked runs go through the same threshold.
///
/// | choice     | largest request vs safe budget | model               |
/// |------------|--------------------------------|---------------------|
/// | pinned     | any                            | the pinned model    |
/// | auto       | above                          | large-context model |
/// | auto       | at or below                    | default model       |
pub fn select_model(
    request_tokens: usize,
    chunked: bool,
    choice: &ModelChoice,
    models: &ModelSettings,
) -> String {
    let model = match choice {
        ModelChoice::Pinned(name) => name.clone(),
        ModelChoice::Auto if request_tokens > models.default_model_safe_tokens => {
            models.large_context_model.clone()
        }
        ModelChoice::Auto => models.default_model.clone(),
    };
    debug!(request_tokens, chunked, %model, "selected model");
    model
}
