//! Error taxonomy shared by the fetcher, the model client and the review driver.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// External service an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    GitHub,
    OpenAi,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::GitHub => f.write_str("GitHub"),
            Service::OpenAi => f.write_str("OpenAI"),
        }
    }
}

/// Every failure is fatal for the current invocation; nothing is retried.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("{service} authentication failed: {message}")]
    Authentication { service: Service, message: String },

    #[error("{0}")]
    NotFound(String),

    #[error("{service} rate limit exceeded: {message}")]
    RateLimit { service: Service, message: String },

    #[error("could not parse model response: {message}")]
    ResponseParse { message: String },

    #[error("request to {service} failed: {source}")]
    Network {
        service: Service,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned HTTP {status}: {message}")]
    Api { service: Service, status: u16, message: String },

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReviewError {
    /// Stable name of the error kind, printed before the message on exit.
    pub fn kind(&self) -> &'static str {
        match self {
            ReviewError::Authentication { .. } => "AuthenticationError",
            ReviewError::NotFound(_) => "NotFoundError",
            ReviewError::RateLimit { .. } => "RateLimitError",
            ReviewError::ResponseParse { .. } => "ResponseParseError",
            ReviewError::Network { .. } => "NetworkError",
            ReviewError::Api { .. } => "ApiError",
            ReviewError::Io { .. } => "IoError",
        }
    }

    pub fn missing_credential(service: Service, hint: &str) -> Self {
        ReviewError::Authentication { service, message: format!("no credentials found; {hint}") }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        ReviewError::ResponseParse { message: message.into() }
    }
}

/// Map a non-success HTTP status to the error taxonomy.
///
/// `rate_limit_exhausted` reflects an `x-ratelimit-remaining: 0` header, which
/// GitHub pairs with a 403 instead of a 429.
pub fn classify_status(
    service: Service,
    status: u16,
    rate_limit_exhausted: bool,
    body: &str,
    what: &str,
) -> ReviewError {
    let message = api_message(body);
    match status {
        401 => ReviewError::Authentication { service, message },
        403 if rate_limit_exhausted => ReviewError::RateLimit { service, message },
        403 => ReviewError::Authentication { service, message },
        404 => ReviewError::NotFound(format!("{what} not found ({service}: {message})")),
        429 => ReviewError::RateLimit { service, message },
        _ => ReviewError::Api { service, status, message },
    }
}

/// Pull the human-readable message out of a JSON error body, if there is one.
fn api_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let from_json = parsed.as_ref().and_then(|value| {
        value
            .get("message")
            .and_then(|m| m.as_str())
            .or_else(|| value.pointer("/error/message").and_then(|m| m.as_str()))
            .map(str::to_string)
    });
    match from_json {
        Some(message) => message,
        None => {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "no details".to_string()
            } else {
                trimmed.chars().take(200).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_auth_and_not_found() {
        let body = r#"{"message":"Bad credentials"}"#;
        let err = classify_status(Service::GitHub, 401, false, body, "x");
        assert_eq!(err.kind(), "AuthenticationError");
        assert!(err.to_string().contains("Bad credentials"));

        let err = classify_status(Service::GitHub, 404, false, "", "pull request owner/repo#7");
        assert_eq!(err.kind(), "NotFoundError");
        assert!(err.to_string().contains("owner/repo#7"));
    }

    #[test]
    fn github_403_depends_on_rate_limit_header() {
        let limited = classify_status(Service::GitHub, 403, true, "", "x");
        assert_eq!(limited.kind(), "RateLimitError");
        let forbidden = classify_status(Service::GitHub, 403, false, "", "x");
        assert_eq!(forbidden.kind(), "AuthenticationError");
    }

    #[test]
    fn openai_error_body_and_other_statuses() {
        let body = r#"{"error":{"message":"Rate limit reached","type":"requests"}}"#;
        let err = classify_status(Service::OpenAi, 429, false, body, "model");
        assert_eq!(err.kind(), "RateLimitError");
        assert!(err.to_string().contains("Rate limit reached"));

        let err = classify_status(Service::OpenAi, 500, false, "upstream exploded", "model");
        assert_eq!(err.kind(), "ApiError");
        assert!(err.to_string().contains("HTTP 500"));
    }
}
