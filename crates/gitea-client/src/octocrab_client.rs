//! Octocrab-based Gitea API client
//!
//! Gitea serves a GitHub-shaped REST API under `/api/v1`, so the octocrab
//! HTTP stack (auth, base URI, JSON decoding) is reused with raw routes and
//! Gitea-specific response types.

use crate::client::GiteaClient;
use crate::types::{BranchInfo, Commit, CommitStatus, PullRequest, PullRequestState, StateFilter};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;

/// Page size requested from list endpoints
const PAGE_SIZE: u32 = 50;

/// Direct Gitea API client using octocrab
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    octocrab: Arc<Octocrab>,
    owner: String,
    repo: String,
}

impl OctocrabClient {
    /// Create a client for `owner/repo` on top of a configured octocrab instance
    pub fn new(octocrab: Arc<Octocrab>, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            octocrab,
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Build a client for `repository` ("owner/name") on the Gitea at `endpoint`
    pub fn connect(endpoint: &str, token: String, repository: &str) -> Result<Self> {
        let (owner, repo) = parse_repository(repository)?;
        let uri = format!("{}/api/v1", endpoint.trim_end_matches('/'));
        debug!("Creating Gitea client for {}/{} at {}", owner, repo, uri);

        let octocrab = Octocrab::builder()
            .base_uri(&uri)
            .context("Failed to set base URI")?
            .personal_token(token)
            .build()
            .context("Failed to build Octocrab client")?;

        Ok(Self::new(Arc::new(octocrab), owner, repo))
    }

    fn route(&self, path: &str) -> String {
        format!("/repos/{}/{}{}", self.owner, self.repo, path)
    }

    /// Fetch every page of a list endpoint
    async fn paginate<T: DeserializeOwned>(
        &self,
        route: &str,
        state: Option<StateFilter>,
    ) -> Result<Vec<T>> {
        collect_pages(|page| async move {
            let params = ListParams {
                page,
                limit: PAGE_SIZE,
                state: state.map(|s| s.as_str()),
                sort: state.map(|_| "recentupdate"),
            };
            self.octocrab
                .get(route, Some(&params))
                .await
                .with_context(|| format!("GET {} (page {}) failed", route, page))
        })
        .await
    }

    async fn list_commits(&self, number: u64) -> Result<Vec<ApiCommit>> {
        self.paginate(&self.route(&format!("/pulls/{}/commits", number)), None)
            .await
    }

    async fn latest_commit(&self, number: u64) -> Result<Commit> {
        let route = self.route(&format!("/pulls/{}/commits", number));
        let params = ListParams {
            page: 1,
            limit: 1,
            state: None,
            sort: None,
        };
        let commits: Vec<ApiCommit> = self
            .octocrab
            .get(&route, Some(&params))
            .await
            .with_context(|| format!("Failed to retrieve commits of PR #{}", number))?;

        let latest = commits
            .into_iter()
            .next()
            .with_context(|| format!("PR #{} has no commits", number))?;
        convert_commit(latest)
    }
}

#[async_trait]
impl GiteaClient for OctocrabClient {
    async fn list_pull_requests(&self, state: StateFilter) -> Result<Vec<PullRequest>> {
        debug!(
            "Fetching {} PRs for {}/{}",
            state.as_str(),
            self.owner,
            self.repo
        );

        let pulls: Vec<ApiPullRequest> = self.paginate(&self.route("/pulls"), Some(state)).await?;

        let mut prs = Vec::with_capacity(pulls.len());
        for pr in pulls {
            let tip = self.latest_commit(pr.number).await?;
            prs.push(convert_pull_request(pr, tip));
        }

        debug!("Fetched {} PRs for {}/{}", prs.len(), self.owner, self.repo);
        Ok(prs)
    }

    async fn list_modified_files(&self, number: u64) -> Result<Vec<String>> {
        debug!("Fetching changed files of PR #{}", number);

        let files: Vec<ApiChangedFile> = self
            .paginate(&self.route(&format!("/pulls/{}/files", number)), None)
            .await?;

        Ok(files.into_iter().map(|f| f.filename).collect())
    }

    async fn get_pull_request(&self, number: u64, commit_sha: &str) -> Result<PullRequest> {
        debug!("Fetching PR #{} at {}", number, commit_sha);

        let pr: ApiPullRequest = self
            .octocrab
            .get(self.route(&format!("/pulls/{}", number)), None::<&()>)
            .await
            .with_context(|| format!("Failed to retrieve PR #{}", number))?;

        let commit = self
            .list_commits(number)
            .await?
            .into_iter()
            .find(|c| c.sha == commit_sha)
            .with_context(|| format!("commit with ref '{}' does not exist", commit_sha))?;

        Ok(convert_pull_request(pr, convert_commit(commit)?))
    }

    async fn post_comment(&self, number: u64, body: &str) -> Result<()> {
        debug!("Posting comment on PR #{}", number);

        let _: serde_json::Value = self
            .octocrab
            .post(
                self.route(&format!("/issues/{}/comments", number)),
                Some(&CommentBody { body }),
            )
            .await
            .with_context(|| format!("Failed to comment on PR #{}", number))?;
        Ok(())
    }

    async fn update_commit_status(&self, commit_sha: &str, status: &CommitStatus) -> Result<()> {
        debug!(
            "Setting status {} ({}) on {}",
            status.state, status.context, commit_sha
        );

        let _: serde_json::Value = self
            .octocrab
            .post(self.route(&format!("/statuses/{}", commit_sha)), Some(status))
            .await
            .with_context(|| format!("Failed to set status on {}", commit_sha))?;
        Ok(())
    }
}

/// Request pages from 1 upwards until one comes back empty
///
/// Gitea caps `limit` at its configured maximum, so a page shorter than
/// requested does not mean it was the last one.
async fn collect_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut items = Vec::new();
    let mut page = 1u32;

    loop {
        let batch = fetch_page(page).await?;
        if batch.is_empty() {
            break;
        }
        items.extend(batch);
        page += 1;
    }

    Ok(items)
}

/// Split "owner/name" into its two parts
pub fn parse_repository(repository: &str) -> Result<(String, String)> {
    match repository.split('/').collect::<Vec<_>>().as_slice() {
        [owner, repo] if !owner.is_empty() && !repo.is_empty() => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(anyhow::anyhow!(
            "malformed repository string '{}', expected 'owner/name'",
            repository
        )),
    }
}

#[derive(Debug, Serialize)]
struct ListParams<'a> {
    page: u32,
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiPullRequest {
    number: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    html_url: String,
    state: PullRequestState,
    #[serde(default)]
    merged: bool,
    merged_at: Option<DateTime<Utc>>,
    closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    labels: Vec<ApiLabel>,
    base: ApiBranch,
    head: ApiBranch,
}

#[derive(Debug, Deserialize)]
struct ApiLabel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiBranch {
    #[serde(default)]
    label: String,
    #[serde(rename = "ref", default)]
    ref_name: String,
    #[serde(default)]
    sha: String,
    repo: Option<ApiRepository>,
}

#[derive(Debug, Deserialize)]
struct ApiRepository {
    #[serde(default)]
    clone_url: String,
}

#[derive(Debug, Deserialize)]
struct ApiCommit {
    sha: String,
    created: Option<DateTime<Utc>>,
    commit: ApiRepoCommit,
}

#[derive(Debug, Deserialize)]
struct ApiRepoCommit {
    #[serde(default)]
    message: String,
    author: Option<ApiCommitUser>,
}

#[derive(Debug, Deserialize)]
struct ApiCommitUser {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ApiChangedFile {
    filename: String,
}

/// Convert a Gitea pull request plus its tip commit to our PullRequest type
fn convert_pull_request(pr: ApiPullRequest, tip: Commit) -> PullRequest {
    PullRequest {
        number: pr.number,
        title: pr.title,
        url: pr.html_url,
        state: pr.state,
        merged: pr.merged,
        merged_at: pr.merged_at,
        closed_at: pr.closed_at,
        base: convert_branch(pr.base),
        head: convert_branch(pr.head),
        labels: pr.labels.into_iter().map(|l| l.name).collect(),
        tip,
    }
}

fn convert_branch(branch: ApiBranch) -> BranchInfo {
    BranchInfo {
        name: branch.label,
        ref_name: branch.ref_name,
        sha: branch.sha,
        clone_url: branch.repo.map(|r| r.clone_url).unwrap_or_default(),
    }
}

/// Convert a Gitea commit, which Gitea reports in the committer's timezone
fn convert_commit(commit: ApiCommit) -> Result<Commit> {
    let (author_name, author_email, author_date) = match commit.commit.author {
        Some(author) => (author.name, author.email, author.date),
        None => (String::new(), String::new(), None),
    };
    let created = commit
        .created
        .or(author_date)
        .with_context(|| format!("commit {} has no timestamp", commit.sha))?;

    Ok(Commit {
        sha: commit.sha,
        message: commit.commit.message,
        author_name,
        author_email,
        created,
    })
}
