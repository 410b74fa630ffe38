//! Describe command implementation

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::Path;
use tracing::info;

use super::utils::{effective_config, require_credentials};
use crate::config::CliOverrides;
use crate::fetch::{current_branch, repo_from_remote, GitHubClient, PullRequestSource};
use crate::llm::OpenAiClient;
use crate::render::{format_description, format_pr_info};
use crate::review::generate_description;

#[derive(Args)]
pub struct DescribeArgs {
    /// Repository as owner/name (defaults to the origin remote of the current checkout)
    #[arg(short = 'r', long, value_name = "OWNER/NAME")]
    pub repo: Option<String>,

    /// Pull request number (defaults to the open PR for the current branch)
    #[arg(short = 'p', long, value_name = "NUMBER")]
    pub pr: Option<u64>,

    /// GitHub token (overrides GITHUB_TOKEN)
    #[arg(short = 't', long, value_name = "TOKEN")]
    pub token: Option<String>,
}

pub fn run(args: DescribeArgs, config_path: Option<&Path>) -> Result<()> {
    let config = effective_config(
        config_path,
        CliOverrides { github_token: args.token, ..CliOverrides::default() },
    )?;
    require_credentials(&config)?;

    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let repo = match args.repo.or_else(|| repo_from_remote(&cwd)) {
        Some(repo) => repo,
        None => bail!("Could not determine repository. Please specify with --repo option."),
    };

    let github = GitHubClient::new(&config)?;
    let number = match args.pr {
        Some(number) => number,
        None => {
            let Some(branch) = current_branch(&cwd) else {
                bail!("Could not determine the current branch. Please specify with --pr option.");
            };
            info!(%repo, %branch, "looking up pull request for branch");
            github.find_pull_for_branch(&repo, &branch)?
        }
    };

    let pr = github.pull_request(&repo, number)?;
    let files = github.pull_request_files(&repo, number)?;
    let paths: Vec<String> = files.iter().map(|f| f.path.clone()).collect();
    println!("{}", format_pr_info(&pr, paths.len()));

    let model = OpenAiClient::new(&config)?;
    let description = generate_description(&model, &config.models, &pr, &paths)?;
    println!("{}", format_description(&description));
    Ok(())
}
