//! Chat-completions client for the language-model API.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::domain::Config;
use crate::error::{classify_status, ReviewError, Service};

/// One prompt sent to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, system: &str, user: String) -> Self {
        Self {
            model: model.into(),
            messages: vec![Message::system(system), Message::user(user)],
            temperature: 0.0,
            max_tokens: 0,
        }
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Anything that can answer a chat prompt with text.
pub trait ChatModel {
    fn complete(&self, request: &ChatRequest) -> Result<String, ReviewError>;
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// OpenAI-compatible `/chat/completions` client.
pub struct OpenAiClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Result<Self, ReviewError> {
        let api_key = config.openai_api_key.clone().ok_or_else(|| {
            ReviewError::missing_credential(Service::OpenAi, "set OPENAI_API_KEY")
        })?;
        let client = Client::builder()
            .user_agent(concat!("pr-review/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|source| ReviewError::Network { service: Service::OpenAi, source })?;
        let api_url = config.openai_api_url.trim_end_matches('/').to_string();
        Ok(Self { client, api_url, api_key })
    }
}

impl ChatModel for OpenAiClient {
    fn complete(&self, request: &ChatRequest) -> Result<String, ReviewError> {
        let url = format!("{}/chat/completions", self.api_url);
        debug!(model = %request.model, max_tokens = request.max_tokens, "POST {url}");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .map_err(|source| ReviewError::Network { service: Service::OpenAi, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let what = format!("model {}", request.model);
            return Err(classify_status(Service::OpenAi, status.as_u16(), false, &body, &what));
        }

        let body = response
            .text()
            .map_err(|source| ReviewError::Network { service: Service::OpenAi, source })?;
        extract_content(&body)
    }
}

/// First choice's message text from a chat-completions response body.
fn extract_content(body: &str) -> Result<String, ReviewError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ReviewError::parse(format!("unexpected completion payload: {e}")))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| ReviewError::parse("model returned an empty response"))
}
