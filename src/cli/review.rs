//! Review command implementation

use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::utils::{effective_config, require_credentials};
use crate::config::CliOverrides;
use crate::domain::{ModelChoice, ReviewReport};
use crate::fetch::{GitHubClient, PullRequestSource};
use crate::llm::OpenAiClient;
use crate::render::{format_review, write_report};
use crate::review::{ReviewOptions, Reviewer};

#[derive(Args)]
pub struct ReviewArgs {
    /// Repository as owner/name
    #[arg(short = 'r', long, value_name = "OWNER/NAME")]
    pub repo: String,

    /// Pull request number
    #[arg(short = 'p', long, value_name = "NUMBER")]
    pub pr: u64,

    /// GitHub token (overrides GITHUB_TOKEN)
    #[arg(short = 't', long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Write the review as JSON to this file
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Split the diff into chunks even when it fits the budget
    #[arg(short = 'c', long)]
    pub chunk: bool,

    /// Model name, or 'auto' to pick one from the diff size
    #[arg(short = 'm', long, value_name = "MODEL", default_value = "auto")]
    pub model: ModelChoice,

    /// Token budget per request before the diff is chunked
    #[arg(long, value_name = "TOKENS")]
    pub budget_tokens: Option<usize>,

    /// Truncate files with more changed lines than this
    #[arg(long, value_name = "LINES")]
    pub max_changes: Option<usize>,

    /// Lines kept from a truncated patch, marker included
    #[arg(long, value_name = "LINES")]
    pub truncate_lines: Option<usize>,
}

pub fn run(args: ReviewArgs, config_path: Option<&Path>) -> Result<()> {
    let config = effective_config(
        config_path,
        CliOverrides {
            github_token: args.token,
            budget_tokens: args.budget_tokens,
            max_changes_per_file: args.max_changes,
            truncate_lines: args.truncate_lines,
        },
    )?;
    require_credentials(&config)?;

    let github = GitHubClient::new(&config)?;
    let pr = github.pull_request(&args.repo, args.pr)?;
    let files = github.pull_request_files(&args.repo, args.pr)?;
    info!(repo = %args.repo, pr = args.pr, files = files.len(), "fetched pull request");

    let model = OpenAiClient::new(&config)?;
    let options = ReviewOptions { force_chunk: args.chunk, model: args.model };
    let Some(outcome) = Reviewer::new(&model, &config).with_spinner().review(&pr, &files, &options)?
    else {
        warn!("No reviewable diff content in PR #{}", args.pr);
        eprintln!("No reviewable changes found in PR #{}.", args.pr);
        return Ok(());
    };

    println!("{}", format_review(&outcome.result, &pr, &args.repo));

    if let Some(path) = args.output {
        let report = ReviewReport {
            repo: args.repo.clone(),
            pr_number: args.pr,
            model: outcome.model.clone(),
            chunks: outcome.chunks,
            generated_at: Some(chrono::Utc::now().to_rfc3339()),
            result: outcome.result,
        };
        write_report(&path, &report)?;
        eprintln!("Review saved to {}", path.display());
    }
    Ok(())
}
