//! Parsing of structured review replies.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::domain::{ReviewIssue, ReviewResult};
use crate::error::ReviewError;

/// Outermost `{ ... }` span of the reply; models often wrap JSON in prose or fences.
static JSON_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

#[derive(Deserialize)]
struct RawReview {
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    overall_score: Option<f64>,
    #[serde(default)]
    issues: Vec<ReviewIssue>,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    recommendations: Vec<String>,
}

/// Parse a model reply into a `ReviewResult`.
///
/// A reply without a JSON object, with invalid JSON, or without a score is a
/// `ResponseParse` error; it is never turned into a zero-score result.
pub fn parse_review_response(text: &str) -> Result<ReviewResult, ReviewError> {
    let Some(found) = JSON_OBJECT.find(text) else {
        return Err(ReviewError::parse(format!("no JSON object in reply: {}", excerpt(text))));
    };

    let raw: RawReview = serde_json::from_str(found.as_str())
        .map_err(|e| ReviewError::parse(format!("{e} in reply: {}", excerpt(text))))?;

    let score = raw
        .score
        .or(raw.overall_score)
        .ok_or_else(|| ReviewError::parse("reply has no score"))?;
    if !score.is_finite() {
        return Err(ReviewError::parse("reply score is not a number"));
    }

    Ok(ReviewResult {
        score: score.round().clamp(0.0, 100.0) as u8,
        issues: raw.issues,
        summary: raw.summary.trim().to_string(),
        recommendations: raw.recommendations,
    })
}

fn excerpt(text: &str) -> String {
    let trimmed = text.trim();
    let mut out: String = trimmed.chars().take(120).collect();
    if trimmed.chars().count() > 120 {
        out.push('…');
    }
    out
}
