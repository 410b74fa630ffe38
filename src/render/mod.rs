//! Terminal presentation and JSON report output.

use console::{style, Color, Style};
use std::fs;
use std::path::Path;
use unicode_width::UnicodeWidthStr;

use crate::domain::{PullRequestInfo, ReviewIssue, ReviewReport, ReviewResult, Severity};
use crate::error::ReviewError;
use crate::utils::format_with_commas;

const MAX_CELL_WIDTH: usize = 48;

/// Colour used for a score: green from 80, yellow from 60, red below.
pub fn score_color(score: u8) -> Color {
    if score >= 80 {
        Color::Green
    } else if score >= 60 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Critical | Severity::High => Color::Red,
        Severity::Medium => Color::Yellow,
        Severity::Low => Color::Blue,
    }
}

/// A titled block with a rule above and below, like a panel.
pub fn panel(title: &str, body: &str, color: Color) -> String {
    let body_width = body.lines().map(UnicodeWidthStr::width).max().unwrap_or(0);
    let width = body_width.max(title.width() + 4).min(100);
    let border = Style::new().fg(color);

    let mut out = String::new();
    let top_fill = width.saturating_sub(title.width() + 3);
    out.push_str(&format!(
        "{} {} {}\n",
        border.apply_to("──"),
        style(title).bold(),
        border.apply_to("─".repeat(top_fill))
    ));
    for line in body.lines() {
        out.push_str(&format!("  {line}\n"));
    }
    out.push_str(&format!("{}\n", border.apply_to("─".repeat(width + 2))));
    out
}

/// Render the full review to a string.
pub fn format_review(result: &ReviewResult, pr: &PullRequestInfo, repo: &str) -> String {
    let mut out = String::new();

    out.push_str(&panel(
        "PR Code Review",
        &format!(
            "Code Review Results for PR #{}\n{}\nRepository: {repo}",
            pr.number, pr.title
        ),
        Color::Blue,
    ));

    let color = score_color(result.score);
    out.push_str(&panel(
        "Score",
        &format!(
            "Overall Code Quality Score: {}",
            style(format!("{}/100", result.score)).fg(color).bold()
        ),
        color,
    ));

    if !result.summary.trim().is_empty() {
        out.push_str(&panel("Summary", &result.summary, Color::Cyan));
    }

    if result.issues.is_empty() {
        out.push_str(&panel("Clean Code", "No issues found! The code looks good.", Color::Green));
    } else {
        out.push_str(&format!("{}\n", style("Issues Found").bold()));
        out.push_str(&issues_table(&result.issues));
        out.push('\n');
        for (i, issue) in result.issues.iter().enumerate() {
            out.push_str(&issue_detail(i + 1, issue));
        }
    }

    if !result.recommendations.is_empty() {
        let body = result
            .recommendations
            .iter()
            .map(|r| format!("• {r}"))
            .collect::<Vec<_>>()
            .join("\n");
        out.push_str(&panel("Top Recommendations", &body, Color::Green));
    }

    out
}

fn issue_detail(number: usize, issue: &ReviewIssue) -> String {
    let color = severity_color(issue.severity);
    let body = format!(
        "{}\n\nDescription: {}\n\nCategory: {}\nSeverity: {}\nFile: {}\nLine: {}\n\nSuggestion: {}",
        style(&issue.title).bold(),
        issue.description,
        issue.category,
        issue.severity,
        issue.file.as_deref().unwrap_or("N/A"),
        issue.line.map(|l| l.to_string()).unwrap_or_else(|| "N/A".to_string()),
        issue.suggestion.as_deref().unwrap_or("No specific suggestion provided"),
    );
    panel(&format!("Issue #{number}"), &body, color)
}

/// Plain-width table of issues; colour is applied after padding.
pub fn issues_table(issues: &[ReviewIssue]) -> String {
    let headers = ["Severity", "Category", "Title", "File", "Line"];
    let rows: Vec<[String; 5]> = issues
        .iter()
        .map(|issue| {
            [
                issue.severity.to_string(),
                issue.category.to_string(),
                clip(&issue.title),
                clip(issue.file.as_deref().unwrap_or("N/A")),
                issue.line.map(|l| l.to_string()).unwrap_or_else(|| "N/A".to_string()),
            ]
        })
        .collect();

    let mut widths = headers.map(UnicodeWidthStr::width);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers
        .iter()
        .zip(widths)
        .map(|(h, w)| style(pad(h, w)).bold().to_string())
        .collect();
    out.push_str(&header_cells.join("  "));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');

    for (issue, row) in issues.iter().zip(&rows) {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(col, (cell, w))| {
                let padded = pad(cell, w);
                match col {
                    0 => style(padded).fg(severity_color(issue.severity)).bold().to_string(),
                    1 => style(padded).cyan().to_string(),
                    3 | 4 => style(padded).dim().to_string(),
                    _ => padded,
                }
            })
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }
    out
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

fn clip(text: &str) -> String {
    if text.width() <= MAX_CELL_WIDTH {
        return text.to_string();
    }
    let mut out = String::new();
    for ch in text.chars() {
        if out.width() + 2 > MAX_CELL_WIDTH {
            break;
        }
        out.push(ch);
    }
    out.push('…');
    out
}

/// Current PR information shown before generating a description.
pub fn format_pr_info(pr: &PullRequestInfo, files_changed: usize) -> String {
    panel(
        "Current PR Information",
        &format!(
            "PR Title: {}\nBranch: {} → {}\nFiles Changed: {}\nChanges: +{} -{}",
            pr.title,
            pr.head_branch,
            pr.base_branch,
            files_changed,
            format_with_commas(pr.additions as u64),
            format_with_commas(pr.deletions as u64)
        ),
        Color::Blue,
    )
}

pub fn format_description(description: &str) -> String {
    panel("Generated PR Description", description, Color::Green)
}

/// Write the report as pretty JSON, creating parent directories as needed.
pub fn write_report(path: &Path, report: &ReviewReport) -> Result<(), ReviewError> {
    let io_err = |source| ReviewError::Io { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| io_err(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    fs::write(path, json + "\n").map_err(io_err)
}
