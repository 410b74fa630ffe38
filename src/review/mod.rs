//! Review and description pipelines on top of the diff size manager.

pub mod describe;
pub mod merge;
pub mod parse;
pub mod prompt;

pub use describe::generate_description;
pub use merge::merge_results;
pub use parse::parse_review_response;

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{info, warn};

use crate::chunk::{filter_and_truncate, make_chunks, select_model, serialize_files, should_chunk};
use crate::domain::{Config, DiffChunk, DiffFile, ModelChoice, PullRequestInfo, ReviewResult};
use crate::error::ReviewError;
use crate::llm::{ChatModel, ChatRequest};
use crate::utils::estimate_tokens;
use prompt::{build_chunk_prompt, build_review_prompt, CHUNK_SYSTEM_PROMPT, REVIEW_SYSTEM_PROMPT};

/// Caller choices for one review run.
#[derive(Debug, Clone, Default)]
pub struct ReviewOptions {
    /// Chunk even when the diff fits the budget
    pub force_chunk: bool,
    pub model: ModelChoice,
}

/// Merged review plus what it took to produce it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewOutcome {
    pub result: ReviewResult,
    /// Model used for the request(s)
    pub model: String,
    /// Number of requests sent; 1 when unchunked
    pub chunks: usize,
    pub files_reviewed: usize,
    pub estimated_tokens: usize,
}

/// Drives a review: filter, budget, chunk, ask the model, merge.
pub struct Reviewer<'a, M: ChatModel> {
    model: &'a M,
    config: &'a Config,
    progress: ProgressBar,
}

impl<'a, M: ChatModel> Reviewer<'a, M> {
    pub fn new(model: &'a M, config: &'a Config) -> Self {
        Self { model, config, progress: ProgressBar::hidden() }
    }

    /// Show a spinner on stderr while requests are in flight.
    pub fn with_spinner(mut self) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.progress = spinner;
        self
    }

    /// Review `files`. Returns `Ok(None)` when nothing reviewable is left after filtering.
    ///
    /// Chunks are sent one at a time in index order; the first failure aborts
    /// the run and no partial result is returned.
    pub fn review(
        &self,
        pr: &PullRequestInfo,
        files: &[DiffFile],
        options: &ReviewOptions,
    ) -> Result<Option<ReviewOutcome>, ReviewError> {
        let prepared = filter_and_truncate(files, &self.config.limits);
        if prepared.is_empty() {
            warn!(files = files.len(), "no reviewable files after filtering");
            return Ok(None);
        }

        let models = &self.config.models;
        let diff = serialize_files(&prepared);
        let estimated_tokens = estimate_tokens(&diff);
        let chunked = should_chunk(&prepared, models.budget_tokens, options.force_chunk);
        let chunks =
            if chunked { make_chunks(&prepared, models.budget_tokens) } else { Vec::new() };
        let largest_request = chunks
            .iter()
            .map(|chunk| chunk.estimated_tokens)
            .max()
            .unwrap_or(estimated_tokens);
        let model = select_model(largest_request, chunked, &options.model, models);
        info!(
            files = prepared.len(),
            estimated_tokens,
            largest_request,
            chunked,
            model = %model,
            "starting review"
        );

        let outcome = if chunked {
            let result = self.review_chunks(pr, &chunks, &model);
            self.progress.finish_and_clear();
            ReviewOutcome {
                result: result?,
                model,
                chunks: chunks.len(),
                files_reviewed: prepared.len(),
                estimated_tokens,
            }
        } else {
            self.progress.set_message(format!("Analyzing code with {model}..."));
            let request = ChatRequest::new(
                model.as_str(),
                REVIEW_SYSTEM_PROMPT,
                build_review_prompt(pr, &diff),
            )
            .temperature(models.review_temperature)
            .max_tokens(models.review_max_tokens);
            let reply = self.model.complete(&request);
            self.progress.finish_and_clear();
            let result = parse_review_response(&reply?)?;
            ReviewOutcome {
                result,
                model,
                chunks: 1,
                files_reviewed: prepared.len(),
                estimated_tokens,
            }
        };

        Ok(Some(outcome))
    }

    fn review_chunks(
        &self,
        pr: &PullRequestInfo,
        chunks: &[DiffChunk],
        model: &str,
    ) -> Result<ReviewResult, ReviewError> {
        let models = &self.config.models;
        let total = chunks.len();
        let mut results = Vec::with_capacity(total);

        for chunk in chunks {
            let first = chunk.files.first().map(|f| f.path.as_str()).unwrap_or_default();
            self.progress
                .set_message(format!("Analyzing chunk {}/{total}: {first}", chunk.index + 1));
            info!(
                chunk = chunk.index,
                files = chunk.files.len(),
                estimated_tokens = chunk.estimated_tokens,
                "reviewing chunk"
            );

            let diff = serialize_files(&chunk.files);
            let request = ChatRequest::new(
                model,
                CHUNK_SYSTEM_PROMPT,
                build_chunk_prompt(pr, chunk, total, &diff),
            )
            .temperature(models.review_temperature)
            .max_tokens(models.chunk_max_tokens);

            let reply = self.model.complete(&request)?;
            results.push(parse_review_response(&reply)?);
        }

        merge_results(results).ok_or_else(|| ReviewError::parse("no chunk produced a review"))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedModel;
    use super::*;
    use crate::domain::{FileStatus, ModelSettings};
    use crate::error::Service;

    fn file(path: &str, patch_len: usize) -> DiffFile {
        DiffFile {
            path: path.to_string(),
            status: FileStatus::Modified,
            additions: 1,
            deletions: 0,
            patch: Some("+".repeat(patch_len)),
            previous_path: None,
        }
    }

    fn config(budget_tokens: usize) -> Config {
        Config {
            models: ModelSettings { budget_tokens, ..ModelSettings::default() },
            ..Config::default()
        }
    }

    fn reply(score: u8, title: &str) -> Result<String, ReviewError> {
        Ok(format!(
            r#"{{"score": {score}, "summary": "s{score}",
                "issues": [{{"severity": "LOW", "category": "style", "title": "{title}"}}]}}"#
        ))
    }

    #[test]
    fn small_diff_is_reviewed_in_one_request() {
        let model = ScriptedModel::new(vec![reply(88, "one")]);
        let config = config(6000);
        let outcome = Reviewer::new(&model, &config)
            .review(&PullRequestInfo::default(), &[file("a.rs", 100)], &ReviewOptions::default())
            .expect("review")
            .expect("outcome");

        assert_eq!(outcome.chunks, 1);
        assert_eq!(outcome.result.score, 88);
        assert_eq!(outcome.model, "gpt-4");
        let requests = model.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].max_tokens, 2000);
        assert!(requests[0].messages[1].content.contains("File: a.rs"));
    }

    #[test]
    fn forced_chunking_sends_chunks_in_order_and_merges() {
        let model =
            ScriptedModel::new(vec![reply(80, "first"), reply(60, "second"), reply(100, "third")]);
        let config = config(60);
        let files = [file("a.rs", 150), file("b.rs", 150), file("c.rs", 150)];
        let options = ReviewOptions { force_chunk: true, model: ModelChoice::Auto };

        let outcome = Reviewer::new(&model, &config)
            .review(&PullRequestInfo::default(), &files, &options)
            .expect("review")
            .expect("outcome");

        assert_eq!(outcome.chunks, 3);
        assert_eq!(outcome.result.score, 80);
        assert_eq!(outcome.model, "gpt-4");
        let titles: Vec<&str> = outcome.result.issues.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);

        let requests = model.requests.borrow();
        assert_eq!(requests.len(), 3);
        assert!(requests[0].messages[1].content.contains("File: a.rs"));
        assert!(requests[2].messages[1].content.contains("File: c.rs"));
        assert!(requests.iter().all(|r| r.max_tokens == 1500));
    }

    #[test]
    fn oversized_chunk_switches_to_large_context_model() {
        let model = ScriptedModel::new(vec![reply(90, "small"), reply(70, "generated")]);
        let config = Config::default();
        let generated = DiffFile {
            additions: 900,
            patch: Some("+".repeat(80_000)),
            ..file("gen.rs", 0)
        };
        let files = [file("a.rs", 2), generated];

        let outcome = Reviewer::new(&model, &config)
            .review(&PullRequestInfo::default(), &files, &ReviewOptions::default())
            .expect("review")
            .expect("outcome");

        assert_eq!(outcome.chunks, 2);
        assert_eq!(outcome.model, "gpt-3.5-turbo-16k");
        let requests = model.requests.borrow();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.model == "gpt-3.5-turbo-16k"));
        assert!(requests[1].messages[1].content.contains("File: gen.rs"));
    }

    #[test]
    fn failed_chunk_aborts_without_partial_result() {
        let model = ScriptedModel::new(vec![
            reply(90, "ok"),
            Err(ReviewError::RateLimit { service: Service::OpenAi, message: "slow down".into() }),
            reply(90, "never sent"),
        ]);
        let config = config(60);
        let files = [file("a.rs", 150), file("b.rs", 150), file("c.rs", 150)];

        let err = Reviewer::new(&model, &config)
            .review(&PullRequestInfo::default(), &files, &ReviewOptions::default())
            .expect_err("must abort");
        assert_eq!(err.kind(), "RateLimitError");
        assert_eq!(model.requests.borrow().len(), 2);
    }

    #[test]
    fn malformed_reply_surfaces_as_parse_error() {
        let model = ScriptedModel::new(vec![Ok("Looks fine to me!".to_string())]);
        let config = config(6000);
        let err = Reviewer::new(&model, &config)
            .review(&PullRequestInfo::default(), &[file("a.rs", 10)], &ReviewOptions::default())
            .expect_err("must fail");
        assert_eq!(err.kind(), "ResponseParseError");
    }

    #[test]
    fn only_binary_files_means_nothing_to_review() {
        let model = ScriptedModel::new(Vec::new());
        let config = config(6000);
        let outcome = Reviewer::new(&model, &config)
            .review(&PullRequestInfo::default(), &[file("logo.png", 10)], &ReviewOptions::default())
            .expect("review");
        assert!(outcome.is_none());
        assert!(model.requests.borrow().is_empty());
    }

    #[test]
    fn pinned_model_is_used_for_every_chunk() {
        let model = ScriptedModel::new(vec![reply(70, "a"), reply(70, "b")]);
        let config = config(60);
        let files = [file("a.rs", 150), file("b.rs", 150)];
        let options =
            ReviewOptions { force_chunk: false, model: ModelChoice::Pinned("gpt-4o".to_string()) };

        let outcome = Reviewer::new(&model, &config)
            .review(&PullRequestInfo::default(), &files, &options)
            .expect("review")
            .expect("outcome");
        assert_eq!(outcome.model, "gpt-4o");
        assert!(model.requests.borrow().iter().all(|r| r.model == "gpt-4o"));
    }
}
