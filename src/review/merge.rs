//! Merging of per-chunk review results.

use crate::domain::ReviewResult;

/// Recommendations kept after merging.
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Combine per-chunk results in chunk order.
///
/// Issues are concatenated, the score is the mean rounded half-up and clamped
/// to 0..=100, and summaries are joined under `[Chunk i/n]` headers. A single
/// result is returned unchanged; no results yields `None`.
pub fn merge_results(mut results: Vec<ReviewResult>) -> Option<ReviewResult> {
    match results.len() {
        0 => return None,
        1 => return results.pop(),
        _ => {}
    }

    let total = results.len();
    let score = mean_score(results.iter().map(|r| r.score));

    let summary = results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("[Chunk {}/{total}] {}", i + 1, r.summary.trim()))
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut recommendations: Vec<String> = Vec::new();
    for recommendation in results.iter().flat_map(|r| r.recommendations.iter()) {
        if recommendations.len() == MAX_RECOMMENDATIONS {
            break;
        }
        if !recommendations.contains(recommendation) {
            recommendations.push(recommendation.clone());
        }
    }

    let issues = results.into_iter().flat_map(|r| r.issues).collect();

    Some(ReviewResult { score, issues, summary, recommendations })
}

/// Arithmetic mean rounded half-up, clamped to 0..=100.
fn mean_score(scores: impl Iterator<Item = u8>) -> u8 {
    let (sum, count) = scores.fold((0u64, 0u64), |(sum, count), s| (sum + u64::from(s), count + 1));
    if count == 0 {
        return 0;
    }
    let rounded = (2 * sum + count) / (2 * count);
    rounded.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, ReviewIssue, Severity};

    fn issue(title: &str) -> ReviewIssue {
        ReviewIssue {
            severity: Severity::Medium,
            category: Category::Readability,
            title: title.to_string(),
            description: String::new(),
            file: None,
            line: None,
            suggestion: None,
        }
    }

    fn result(score: u8, titles: &[&str], summary: &str, recs: &[&str]) -> ReviewResult {
        ReviewResult {
            score,
            issues: titles.iter().map(|t| issue(t)).collect(),
            summary: summary.to_string(),
            recommendations: recs.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn merging_nothing_yields_nothing() {
        assert_eq!(merge_results(Vec::new()), None);
    }

    #[test]
    fn merging_one_result_is_identity() {
        let single = result(67, &["a", "b"], "  untrimmed  ", &["x", "x"]);
        assert_eq!(merge_results(vec![single.clone()]), Some(single));
    }

    #[test]
    fn mean_score_of_three_chunks() {
        let merged = merge_results(vec![
            result(80, &[], "a", &[]),
            result(60, &[], "b", &[]),
            result(100, &[], "c", &[]),
        ])
        .expect("merged");
        assert_eq!(merged.score, 80);
    }

    #[test]
    fn ties_round_half_up() {
        let merged =
            merge_results(vec![result(0, &[], "", &[]), result(1, &[], "", &[])]).expect("merged");
        assert_eq!(merged.score, 1);
        let merged = merge_results(vec![result(70, &[], "", &[]), result(75, &[], "", &[])])
            .expect("merged");
        assert_eq!(merged.score, 73);
    }

    #[test]
    fn issues_keep_chunk_then_inner_order() {
        let merged = merge_results(vec![
            result(90, &["a1", "a2"], "first", &[]),
            result(50, &[], "second", &[]),
            result(70, &["c1"], "third", &[]),
        ])
        .expect("merged");
        let titles: Vec<&str> = merged.issues.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["a1", "a2", "c1"]);
        similar_asserts::assert_eq!(
            merged.summary,
            "[Chunk 1/3] first\n\n[Chunk 2/3] second\n\n[Chunk 3/3] third"
        );
    }

    #[test]
    fn recommendations_are_deduplicated_and_capped() {
        let merged = merge_results(vec![
            result(50, &[], "", &["tests", "docs", "naming"]),
            result(50, &[], "", &["docs", "errors", "logging", "types"]),
        ])
        .expect("merged");
        assert_eq!(merged.recommendations, vec!["tests", "docs", "naming", "errors", "logging"]);
    }
}
