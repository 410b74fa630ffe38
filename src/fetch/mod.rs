//! Pull-request fetching from the code-hosting API and the local checkout.

pub mod git;
pub mod github;

pub use git::{current_branch, parse_github_slug, repo_from_remote};
pub use github::GitHubClient;

use crate::domain::{DiffFile, PullRequestInfo};
use crate::error::ReviewError;

/// Source of pull-request metadata and diffs.
pub trait PullRequestSource {
    /// Title, body, branches and commit messages of one pull request.
    fn pull_request(&self, repo: &str, number: u64) -> Result<PullRequestInfo, ReviewError>;

    /// Changed files in API order, with patches where the API provides them.
    fn pull_request_files(&self, repo: &str, number: u64) -> Result<Vec<DiffFile>, ReviewError>;

    /// Number of the open pull request whose head is `branch`.
    fn find_pull_for_branch(&self, repo: &str, branch: &str) -> Result<u64, ReviewError>;
}
