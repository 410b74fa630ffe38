//! Local git helpers used when `--repo` or `--pr` are omitted.

use git2::Repository;
use std::path::Path;
use tracing::debug;

/// `owner/repo` of the `origin` remote of the repository containing `dir`.
pub fn repo_from_remote(dir: &Path) -> Option<String> {
    let repo = Repository::discover(dir).ok()?;
    let remote = repo.find_remote("origin").ok()?;
    let url = remote.url()?;
    debug!(url, "found origin remote");
    parse_github_slug(url)
}

/// Name of the branch checked out in the repository containing `dir`.
pub fn current_branch(dir: &Path) -> Option<String> {
    let repo = Repository::discover(dir).ok()?;
    let head = repo.head().ok()?;
    if !head.is_branch() {
        return None;
    }
    head.shorthand().map(str::to_string)
}

/// Extract `owner/repo` from an HTTPS or SSH GitHub remote URL.
pub fn parse_github_slug(url: &str) -> Option<String> {
    let url = url.trim();
    let rest = url
        .strip_prefix("https://github.com/")
        .or_else(|| url.strip_prefix("http://github.com/"))
        .or_else(|| url.strip_prefix("ssh://git@github.com/"))
        .or_else(|| url.strip_prefix("git@github.com:"))?;
    let rest = rest.trim_end_matches('/');
    let rest = rest.strip_suffix(".git").unwrap_or(rest);

    let mut parts = rest.split('/');
    let owner = parts.next().filter(|s| !s.is_empty())?;
    let name = parts.next().filter(|s| !s.is_empty())?;
    if parts.next().is_some() {
        return None;
    }
    Some(format!("{owner}/{name}"))
}
