//! Core domain types and models
//!
//! Defines the diff records, chunks, review results and the runtime `Config`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Change status of a file in a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Removed,
    Renamed,
    /// Also covers statuses such as `copied`, `changed` and `unchanged`
    #[default]
    #[serde(other)]
    Modified,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Added => "added",
            FileStatus::Modified => "modified",
            FileStatus::Removed => "removed",
            FileStatus::Renamed => "renamed",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One changed file as reported by the code-hosting API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffFile {
    /// Path relative to the repository root
    #[serde(alias = "filename")]
    pub path: String,

    pub status: FileStatus,

    #[serde(default)]
    pub additions: usize,

    #[serde(default)]
    pub deletions: usize,

    /// Unified diff text; absent for binary or oversized files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<String>,

    /// Old path for renamed files
    #[serde(default, alias = "previous_filename", skip_serializing_if = "Option::is_none")]
    pub previous_path: Option<String>,
}

impl DiffFile {
    /// Total changed lines as reported by the API.
    pub fn changes(&self) -> usize {
        self.additions + self.deletions
    }

    /// Patch text, treating an absent patch as empty.
    pub fn patch_text(&self) -> &str {
        self.patch.as_deref().unwrap_or("")
    }
}

/// A bounded group of files sent to the model in one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffChunk {
    /// 0-based position in the chunk sequence
    pub index: usize,

    pub files: Vec<DiffFile>,

    /// Sum of the per-file token estimates
    pub estimated_tokens: usize,
}

/// Severity of a review finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[default]
    #[serde(alias = "low", alias = "Low", alias = "info", alias = "INFO", alias = "Info")]
    Low,
    #[serde(alias = "medium", alias = "Medium")]
    Medium,
    #[serde(alias = "high", alias = "High")]
    High,
    #[serde(alias = "critical", alias = "Critical")]
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Area a review finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[serde(alias = "Security", alias = "SECURITY")]
    Security,
    #[serde(alias = "Performance", alias = "PERFORMANCE")]
    Performance,
    #[serde(alias = "Readability", alias = "READABILITY")]
    Readability,
    #[serde(alias = "Maintainability", alias = "MAINTAINABILITY")]
    Maintainability,
    #[default]
    #[serde(
        alias = "Style",
        alias = "STYLE",
        alias = "best_practice",
        alias = "best-practice",
        alias = "code_smell"
    )]
    Style,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Security => "security",
            Category::Performance => "performance",
            Category::Readability => "readability",
            Category::Maintainability => "maintainability",
            Category::Style => "style",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single issue reported by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewIssue {
    #[serde(default)]
    pub severity: Severity,

    #[serde(default)]
    pub category: Category,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, alias = "file_path")]
    pub file: Option<String>,

    /// First line of the finding; ranges such as `"42-45"` keep their start
    #[serde(default, alias = "line_number", deserialize_with = "deserialize_line")]
    pub line: Option<u32>,

    #[serde(default)]
    pub suggestion: Option<String>,
}

/// Outcome of reviewing one chunk, or the merged outcome of all chunks.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReviewResult {
    /// Overall quality score, 0 to 100
    pub score: u8,

    #[serde(default)]
    pub issues: Vec<ReviewIssue>,

    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Pull-request metadata used for prompts and terminal output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PullRequestInfo {
    pub number: u64,
    pub title: String,
    pub body: String,
    pub head_branch: String,
    pub base_branch: String,
    pub url: String,
    pub additions: usize,
    pub deletions: usize,
    pub commits: Vec<String>,
}

/// JSON document written by `review --output`.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewReport {
    pub repo: String,
    pub pr_number: u64,
    pub model: String,
    pub chunks: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    #[serde(flatten)]
    pub result: ReviewResult,
}

/// Which model to use: a pinned name, or automatic selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModelChoice {
    #[default]
    Auto,
    Pinned(String),
}

impl FromStr for ModelChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("Model name must not be empty".to_string());
        }
        if trimmed.eq_ignore_ascii_case("auto") {
            Ok(ModelChoice::Auto)
        } else {
            Ok(ModelChoice::Pinned(trimmed.to_string()))
        }
    }
}

impl fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelChoice::Auto => f.write_str("auto"),
            ModelChoice::Pinned(name) => f.write_str(name),
        }
    }
}

/// Limits applied to diffs before they reach the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLimits {
    /// Paths ending in one of these are dropped (dot-prefixed, lowercase)
    #[serde(
        default = "default_binary_extensions",
        deserialize_with = "deserialize_extensions"
    )]
    pub binary_extensions: BTreeSet<String>,

    /// Files with more changed lines than this get truncated
    #[serde(default = "default_max_changes_per_file")]
    pub max_changes_per_file: usize,

    /// Maximum lines of a truncated patch, marker included
    #[serde(default = "default_truncate_lines")]
    pub truncate_lines: usize,
}

impl Default for DiffLimits {
    fn default() -> Self {
        Self {
            binary_extensions: default_binary_extensions(),
            max_changes_per_file: default_max_changes_per_file(),
            truncate_lines: default_truncate_lines(),
        }
    }
}

/// Model identifiers and request budgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    #[serde(default = "default_model")]
    pub default_model: String,

    #[serde(default = "default_large_context_model")]
    pub large_context_model: String,

    /// Above this estimate an unchunked review switches to the large-context model
    #[serde(default = "default_model_safe_tokens")]
    pub default_model_safe_tokens: usize,

    /// Per-request diff budget; larger diffs are chunked
    #[serde(default = "default_budget_tokens")]
    pub budget_tokens: usize,

    #[serde(default = "default_description_model")]
    pub description_model: String,

    #[serde(default = "default_review_temperature")]
    pub review_temperature: f64,

    #[serde(default = "default_review_max_tokens")]
    pub review_max_tokens: u32,

    #[serde(default = "default_chunk_max_tokens")]
    pub chunk_max_tokens: u32,

    #[serde(default = "default_description_temperature")]
    pub description_temperature: f64,

    #[serde(default = "default_description_max_tokens")]
    pub description_max_tokens: u32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            default_model: default_model(),
            large_context_model: default_large_context_model(),
            default_model_safe_tokens: default_model_safe_tokens(),
            budget_tokens: default_budget_tokens(),
            description_model: default_description_model(),
            review_temperature: default_review_temperature(),
            review_max_tokens: default_review_max_tokens(),
            chunk_max_tokens: default_chunk_max_tokens(),
            description_temperature: default_description_temperature(),
            description_max_tokens: default_description_max_tokens(),
        }
    }
}

/// Main configuration for pr-review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    // Credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,

    // Endpoints
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,

    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub limits: DiffLimits,

    #[serde(default)]
    pub models: ModelSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            openai_api_key: None,
            github_api_url: default_github_api_url(),
            openai_api_url: default_openai_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
            limits: DiffLimits::default(),
            models: ModelSettings::default(),
        }
    }
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}
fn default_openai_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_request_timeout_secs() -> u64 {
    120
}
fn default_max_changes_per_file() -> usize {
    1000
}
fn default_truncate_lines() -> usize {
    500
}
fn default_model() -> String {
    "gpt-4".to_string()
}
fn default_large_context_model() -> String {
    "gpt-3.5-turbo-16k".to_string()
}
fn default_model_safe_tokens() -> usize {
    4000
}
fn default_budget_tokens() -> usize {
    6000
}
fn default_description_model() -> String {
    "gpt-4".to_string()
}
fn default_review_temperature() -> f64 {
    0.1
}
fn default_review_max_tokens() -> u32 {
    2000
}
fn default_chunk_max_tokens() -> u32 {
    1500
}
fn default_description_temperature() -> f64 {
    0.3
}
fn default_description_max_tokens() -> u32 {
    300
}

/// Extensions treated as binary: images, documents, archives, fonts and compiled objects.
pub fn default_binary_extensions() -> BTreeSet<String> {
    [
        // Images
        ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".ico", ".webp", ".tiff", ".psd",
        // Documents
        ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx",
        // Archives
        ".zip", ".tar", ".gz", ".tar.gz", ".tgz", ".bz2", ".xz", ".7z", ".rar", ".jar",
        // Fonts
        ".ttf", ".otf", ".woff", ".woff2", ".eot",
        // Compiled objects
        ".exe", ".dll", ".so", ".dylib", ".o", ".a", ".lib", ".class", ".pyc", ".wasm", ".bin",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Normalize one extension entry: trimmed, lowercase, dot-prefixed.
pub fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim().to_ascii_lowercase();
    if trimmed.is_empty() || trimmed == "." {
        return None;
    }
    if trimmed.starts_with('.') {
        Some(trimmed)
    } else {
        Some(format!(".{trimmed}"))
    }
}

/// Lenient line number: integers, numeric strings and ranges are accepted;
/// anything without a leading number reads as `None`.
fn deserialize_line<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct LineVisitor;

    impl<'de> Visitor<'de> for LineVisitor {
        type Value = Option<u32>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a line number")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(u32::try_from(value).ok())
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(u32::try_from(value).ok())
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            if (0.0..=f64::from(u32::MAX)).contains(&value) {
                Ok(Some(value as u32))
            } else {
                Ok(None)
            }
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            let digits: String =
                value.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
            Ok(digits.parse().ok())
        }

        fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
        where
            D2: serde::Deserializer<'de>,
        {
            deserializer.deserialize_any(LineVisitor)
        }
    }

    deserializer.deserialize_any(LineVisitor)
}

/// Custom deserializer for extensions: accepts a comma-separated string or an array.
fn deserialize_extensions<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct ExtensionsVisitor;

    impl<'de> Visitor<'de> for ExtensionsVisitor {
        type Value = BTreeSet<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or array of extensions")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.split(',').filter_map(normalize_extension).collect())
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut result = BTreeSet::new();
            while let Some(ext) = seq.next_element::<String>()? {
                if let Some(normalized) = normalize_extension(&ext) {
                    result.insert(normalized);
                }
            }
            Ok(result)
        }
    }

    deserializer.deserialize_any(ExtensionsVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_github_status_reads_as_modified() {
        let file: DiffFile = serde_json::from_str(
            r#"{"filename": "src/lib.rs", "status": "copied", "additions": 1, "deletions": 0}"#,
        )
        .expect("parse file");
        assert_eq!(file.status, FileStatus::Modified);
        assert_eq!(file.path, "src/lib.rs");
        assert!(file.patch.is_none());
        assert_eq!(file.patch_text(), "");
    }

    #[test]
    fn file_status_round_trips_known_values() {
        for (raw, status) in [
            ("added", FileStatus::Added),
            ("removed", FileStatus::Removed),
            ("renamed", FileStatus::Renamed),
            ("modified", FileStatus::Modified),
            ("changed", FileStatus::Modified),
            ("unchanged", FileStatus::Modified),
        ] {
            let parsed: FileStatus = serde_json::from_str(&format!("\"{raw}\"")).expect("status");
            assert_eq!(parsed, status, "{raw}");
        }
        assert_eq!(serde_json::to_string(&FileStatus::Modified).expect("json"), "\"modified\"");
        assert_eq!(FileStatus::Renamed.to_string(), "renamed");
    }

    #[test]
    fn issue_accepts_legacy_field_names_and_casing() {
        let issue: ReviewIssue = serde_json::from_str(
            r#"{
                "severity": "high",
                "category": "best_practice",
                "title": "Magic number",
                "description": "Use a constant",
                "line_number": 42,
                "file_path": "src/db.py",
                "suggestion": "Extract it"
            }"#,
        )
        .expect("parse issue");
        assert_eq!(issue.severity, Severity::High);
        assert_eq!(issue.category, Category::Style);
        assert_eq!(issue.line, Some(42));
        assert_eq!(issue.file.as_deref(), Some("src/db.py"));
    }

    #[test]
    fn issue_line_tolerates_ranges_and_junk() {
        let line = |raw: &str| {
            let issue: ReviewIssue =
                serde_json::from_str(&format!(r#"{{"title": "t", "line": {raw}}}"#))
                    .expect("parse issue");
            issue.line
        };
        assert_eq!(line("42"), Some(42));
        assert_eq!(line(r#""17""#), Some(17));
        assert_eq!(line(r#""42-45""#), Some(42));
        assert_eq!(line(r#""n/a""#), None);
        assert_eq!(line("null"), None);
        assert_eq!(line("-3"), None);
        assert_eq!(line("12.0"), Some(12));
    }

    #[test]
    fn info_severity_maps_to_low() {
        let issue: ReviewIssue =
            serde_json::from_str(r#"{"severity": "info", "title": "nit"}"#).expect("parse");
        assert_eq!(issue.severity, Severity::Low);
        assert_eq!(issue.category, Category::Style);
    }

    #[test]
    fn model_choice_parses_auto_case_insensitively() {
        assert_eq!("AUTO".parse::<ModelChoice>(), Ok(ModelChoice::Auto));
        assert_eq!("gpt-4o".parse::<ModelChoice>(), Ok(ModelChoice::Pinned("gpt-4o".to_string())));
        assert!("  ".parse::<ModelChoice>().is_err());
    }

    #[test]
    fn binary_extensions_deserialize_from_csv_string() {
        let limits: DiffLimits =
            toml::from_str("binary_extensions = \"PNG, .svg,tar.gz\"").expect("parse limits");
        let expected: BTreeSet<String> =
            [".png", ".svg", ".tar.gz"].into_iter().map(String::from).collect();
        assert_eq!(limits.binary_extensions, expected);
        assert_eq!(limits.max_changes_per_file, 1000);
        assert_eq!(limits.truncate_lines, 500);
    }
}
