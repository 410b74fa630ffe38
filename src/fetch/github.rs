//! GitHub REST client for pull-request metadata and changed files.

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::PullRequestSource;
use crate::domain::{Config, DiffFile, PullRequestInfo};
use crate::error::{classify_status, ReviewError, Service};

const PER_PAGE: usize = 100;
/// GitHub stops listing files after 3000 entries.
const MAX_PAGES: usize = 30;

#[derive(Debug, Deserialize)]
struct PullPayload {
    number: u64,
    title: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    html_url: String,
    head: BranchRef,
    base: BranchRef,
    #[serde(default)]
    additions: usize,
    #[serde(default)]
    deletions: usize,
}

#[derive(Debug, Deserialize)]
struct BranchRef {
    #[serde(rename = "ref")]
    ref_: String,
}

#[derive(Debug, Deserialize)]
struct CommitPayload {
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    message: String,
}

pub struct GitHubClient {
    client: Client,
    api_url: String,
}

impl GitHubClient {
    pub fn new(config: &Config) -> Result<Self, ReviewError> {
        let token = config.github_token.as_deref().ok_or_else(|| {
            ReviewError::missing_credential(
                Service::GitHub,
                "set GITHUB_TOKEN or pass --token",
            )
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static("2022-11-28"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            ReviewError::Authentication {
                service: Service::GitHub,
                message: "token contains characters not allowed in a header".to_string(),
            }
        })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .user_agent(concat!("pr-review/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|source| ReviewError::Network { service: Service::GitHub, source })?;

        Ok(Self { client, api_url: config.github_api_url.trim_end_matches('/').to_string() })
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T, ReviewError> {
        let url = format!("{}{}", self.api_url, path);
        debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|source| ReviewError::Network { service: Service::GitHub, source })?;
        let response = check_status(response, what)?;
        response
            .json::<T>()
            .map_err(|source| ReviewError::Network { service: Service::GitHub, source })
    }

    fn get_paged<T: DeserializeOwned>(
        &self,
        path: &str,
        what: &str,
    ) -> Result<Vec<T>, ReviewError> {
        let separator = if path.contains('?') { '&' } else { '?' };
        let mut items = Vec::new();
        for page in 1..=MAX_PAGES {
            let batch: Vec<T> =
                self.get_json(&format!("{path}{separator}per_page={PER_PAGE}&page={page}"), what)?;
            let done = batch.len() < PER_PAGE;
            items.extend(batch);
            if done {
                break;
            }
        }
        Ok(items)
    }
}

fn check_status(response: Response, what: &str) -> Result<Response, ReviewError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let exhausted = response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim() == "0")
        .unwrap_or(false);
    let body = response.text().unwrap_or_default();
    Err(classify_status(Service::GitHub, status.as_u16(), exhausted, &body, what))
}

impl PullRequestSource for GitHubClient {
    fn pull_request(&self, repo: &str, number: u64) -> Result<PullRequestInfo, ReviewError> {
        let what = format!("pull request {repo}#{number}");
        let pull: PullPayload = self.get_json(&format!("/repos/{repo}/pulls/{number}"), &what)?;
        let commits: Vec<CommitPayload> =
            self.get_paged(&format!("/repos/{repo}/pulls/{number}/commits"), &what)?;
        info!(repo, number, commits = commits.len(), "fetched pull request");

        Ok(PullRequestInfo {
            number: pull.number,
            title: pull.title,
            body: pull.body.unwrap_or_default(),
            head_branch: pull.head.ref_,
            base_branch: pull.base.ref_,
            url: pull.html_url,
            additions: pull.additions,
            deletions: pull.deletions,
            commits: commits.into_iter().map(|c| c.commit.message).collect(),
        })
    }

    fn pull_request_files(&self, repo: &str, number: u64) -> Result<Vec<DiffFile>, ReviewError> {
        let what = format!("pull request {repo}#{number}");
        let files: Vec<DiffFile> =
            self.get_paged(&format!("/repos/{repo}/pulls/{number}/files"), &what)?;
        info!(repo, number, files = files.len(), "fetched changed files");
        Ok(files)
    }

    fn find_pull_for_branch(&self, repo: &str, branch: &str) -> Result<u64, ReviewError> {
        let what = format!("repository {repo}");
        let pulls: Vec<PullPayload> =
            self.get_paged(&format!("/repos/{repo}/pulls?state=open"), &what)?;
        pulls
            .into_iter()
            .find(|pull| pull.head.ref_ == branch)
            .map(|pull| pull.number)
            .ok_or_else(|| ReviewError::NotFound(format!("no open PR found for branch: {branch}")))
    }
}
