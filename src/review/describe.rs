//! PR description generation.

use tracing::info;

use super::prompt::{build_description_prompt, DESCRIPTION_SYSTEM_PROMPT};
use crate::domain::{ModelSettings, PullRequestInfo};
use crate::error::ReviewError;
use crate::llm::{ChatModel, ChatRequest};

/// Ask the model for a concise description of `pr`. Blank replies are parse errors.
pub fn generate_description<M: ChatModel>(
    model: &M,
    settings: &ModelSettings,
    pr: &PullRequestInfo,
    files_changed: &[String],
) -> Result<String, ReviewError> {
    info!(pr = pr.number, model = %settings.description_model, "generating description");
    let request = ChatRequest::new(
        settings.description_model.as_str(),
        DESCRIPTION_SYSTEM_PROMPT,
        build_description_prompt(pr, files_changed),
    )
    .temperature(settings.description_temperature)
    .max_tokens(settings.description_max_tokens);

    let text = model.complete(&request)?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ReviewError::parse("model returned an empty description"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::testing::ScriptedModel;

    #[test]
    fn returns_trimmed_description() {
        let model =
            ScriptedModel::new(vec![Ok("\n  Adds retry logic to the client.  \n".to_string())]);
        let pr = PullRequestInfo { title: "Retry".to_string(), ..PullRequestInfo::default() };
        let files = ["src/client.rs".to_string()];
        let text = generate_description(&model, &ModelSettings::default(), &pr, &files)
            .expect("description");
        assert_eq!(text, "Adds retry logic to the client.");

        let requests = model.requests.borrow();
        assert_eq!(requests[0].max_tokens, 300);
        assert!((requests[0].temperature - 0.3).abs() < f64::EPSILON);
        assert!(requests[0].messages[1].content.contains("src/client.rs"));
    }

    #[test]
    fn blank_reply_is_an_error() {
        let model = ScriptedModel::new(vec![Ok("   ".to_string())]);
        let pr = PullRequestInfo::default();
        let err = generate_description(&model, &ModelSettings::default(), &pr, &[])
            .expect_err("must fail");
        assert_eq!(err.kind(), "ResponseParseError");
    }
}
