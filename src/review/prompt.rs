//! Prompt templates for review and description requests.

use crate::domain::{DiffChunk, PullRequestInfo};

pub const REVIEW_SYSTEM_PROMPT: &str = "You are an expert code reviewer and security analyst. \
Analyze the provided code diff and identify issues in the following categories: security \
vulnerabilities, code smells, performance issues, readability problems, and maintainability \
concerns. Provide specific, actionable feedback.";

pub const CHUNK_SYSTEM_PROMPT: &str = "You are an expert code reviewer. Analyze this code chunk \
and identify issues. Focus on the most critical problems.";

pub const DESCRIPTION_SYSTEM_PROMPT: &str = "You are a senior software engineer who writes \
clear, concise, and professional pull request descriptions. Focus on the technical changes and \
their impact.";

const RESPONSE_FORMAT: &str = r#"Format your response as JSON with the following structure:
{
    "issues": [
        {
            "severity": "HIGH",
            "category": "security",
            "title": "Potential SQL Injection",
            "description": "User input is directly concatenated into SQL query",
            "file": "src/database.py",
            "line": 42,
            "suggestion": "Use parameterized queries or ORM"
        }
    ],
    "summary": "Overall assessment of the code quality",
    "score": 75,
    "recommendations": [
        "Implement input validation",
        "Add error handling"
    ]
}"#;

const ISSUE_FIELDS: &str = "For each issue found, provide:
- Severity (LOW/MEDIUM/HIGH/CRITICAL)
- Category (security/performance/readability/maintainability/style)
- Title (brief description)
- Description (detailed explanation)
- File path and line number (if applicable)
- Suggestion (how to fix)";

/// Prompt for reviewing the whole diff in one request.
pub fn build_review_prompt(pr: &PullRequestInfo, diff: &str) -> String {
    let description =
        if pr.body.trim().is_empty() { "No description provided" } else { pr.body.as_str() };
    format!(
        "Please analyze the following pull request diff and provide a comprehensive code review.

Pull Request Title: {title}
Pull Request Description: {description}

Code Diff:
{diff}

Please analyze this code for:

1. **Security Vulnerabilities**: SQL injection, XSS, authentication issues, data exposure, etc.
2. **Code Smells**: Code duplication, long methods, complex conditionals, magic numbers, etc.
3. **Performance Issues**: Inefficient algorithms, memory leaks, unnecessary computations, etc.
4. **Readability Issues**: Poor naming, unclear logic, missing comments, etc.
5. **Maintainability Concerns**: Tight coupling, lack of abstraction, hardcoded values, etc.

{ISSUE_FIELDS}

Also provide:
- An overall summary
- A score from 0-100 (100 being perfect)
- Top 3 recommendations for improvement

{RESPONSE_FORMAT}
",
        title = pr.title,
    )
}

/// Prompt for reviewing one chunk of a larger diff.
pub fn build_chunk_prompt(
    pr: &PullRequestInfo,
    chunk: &DiffChunk,
    total_chunks: usize,
    diff: &str,
) -> String {
    let files = chunk.files.iter().map(|f| f.path.as_str()).collect::<Vec<_>>().join(", ");
    format!(
        "Please analyze chunk {index} of {total_chunks} from this pull request.

Pull Request Title: {title}
Files in this chunk: {files}

Code Chunk:
{diff}

Please identify the most critical issues in this code chunk. Focus on:
1. Security vulnerabilities (high priority)
2. Critical code smells
3. Major performance issues
4. Significant readability problems

{ISSUE_FIELDS}

Also provide:
- A brief summary
- A score from 0-100
- 2-3 key recommendations

{RESPONSE_FORMAT}
",
        index = chunk.index + 1,
        title = pr.title,
    )
}

/// Prompt asking for a concise PR description.
pub fn build_description_prompt(pr: &PullRequestInfo, files_changed: &[String]) -> String {
    let recent = &pr.commits[pr.commits.len().saturating_sub(5)..];
    let body = if pr.body.trim().is_empty() { "No description provided" } else { pr.body.as_str() };
    format!(
        "You are a senior software engineer tasked with creating a concise, \
professional pull request description.

Please analyze the following PR information and create a clear, concise description that:
1. Summarizes the main changes in 1-2 sentences
2. Highlights key technical changes
3. Mentions any breaking changes or important notes
4. Uses professional, clear language
5. Is under 200 words

PR Information:
- Title: {title}
- Files changed: {files}
- Additions: {additions} lines
- Deletions: {deletions} lines
- Branch: {head} → {base}
- Commits: {commit_count} commits

Recent commit messages:
{recent}

Current PR description:
{body}

Please provide a concise, professional PR description:
",
        title = pr.title,
        files = files_changed.join(", "),
        additions = pr.additions,
        deletions = pr.deletions,
        head = pr.head_branch,
        base = pr.base_branch,
        commit_count = pr.commits.len(),
        recent = recent.join("\n"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DiffFile, FileStatus};

    fn pr() -> PullRequestInfo {
        PullRequestInfo {
            number: 7,
            title: "Add retry logic".to_string(),
            body: String::new(),
            head_branch: "feature/retry".to_string(),
            base_branch: "main".to_string(),
            additions: 12,
            deletions: 4,
            commits: (1..=7).map(|i| format!("commit {i}")).collect(),
            ..PullRequestInfo::default()
        }
    }

    #[test]
    fn review_prompt_embeds_diff_and_json_shape() {
        let prompt = build_review_prompt(&pr(), "File: a.rs\n+x");
        assert!(prompt.contains("Pull Request Title: Add retry logic"));
        assert!(prompt.contains("Pull Request Description: No description provided"));
        assert!(prompt.contains("File: a.rs\n+x"));
        assert!(prompt.contains("\"score\": 75"));
    }

    #[test]
    fn chunk_prompt_numbers_chunks_from_one() {
        let chunk = DiffChunk {
            index: 1,
            files: vec![DiffFile {
                path: "src/b.rs".to_string(),
                status: FileStatus::Added,
                additions: 1,
                deletions: 0,
                patch: Some("+b".to_string()),
                previous_path: None,
            }],
            estimated_tokens: 10,
        };
        let prompt = build_chunk_prompt(&pr(), &chunk, 3, "File: src/b.rs");
        assert!(prompt.contains("chunk 2 of 3"));
        assert!(prompt.contains("Files in this chunk: src/b.rs"));
    }

    #[test]
    fn description_prompt_keeps_last_five_commits_in_order() {
        let prompt = build_description_prompt(&pr(), &["src/retry.rs".to_string()]);
        assert!(prompt.contains("- Commits: 7 commits"));
        assert!(prompt.contains("commit 3\ncommit 4\ncommit 5\ncommit 6\ncommit 7"));
        assert!(!prompt.contains("commit 2\n"));
        assert!(prompt.contains("- Branch: feature/retry → main"));
    }
}
