//! Fixtures and in-memory fakes shared by the unit tests

use crate::git::Git;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use gitea_client::{
    BranchInfo, Commit, CommitStatus, GiteaClient, PullRequest, PullRequestState, StateFilter,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Reference point for fixture timestamps
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// A PR whose tip commit is `number` days older than [`base_time`]
///
/// Closed fixtures are merged at [`base_time`], which makes them newer
/// than every open fixture.
pub fn pull_request(number: u64, base: &str, state: PullRequestState) -> PullRequest {
    let closed = state == PullRequestState::Closed;
    PullRequest {
        number,
        title: format!("pr{} title", number),
        url: format!("pr{} url", number),
        state,
        merged: closed,
        merged_at: closed.then(base_time),
        closed_at: closed.then(base_time),
        base: BranchInfo {
            name: base.to_string(),
            ref_name: base.to_string(),
            sha: format!("base{}", number),
            clone_url: format!("pr{} url", number),
        },
        head: BranchInfo {
            name: format!("pr{}", number),
            ref_name: format!("pr{}", number),
            sha: format!("oid{}", number),
            clone_url: format!("pr{} url", number),
        },
        labels: Vec::new(),
        tip: Commit {
            sha: format!("oid{}", number),
            message: format!("commit message{}", number),
            author_name: format!("login{}", number),
            author_email: "user@example.com".to_string(),
            created: base_time() - Duration::days(number as i64),
        },
    }
}

/// A PR with a skip marker in its latest commit
pub fn skip_ci(mut pr: PullRequest) -> PullRequest {
    pr.tip.message = format!("[skip ci]{}", pr.tip.message);
    pr
}

pub fn with_labels(mut pr: PullRequest, labels: &[&str]) -> PullRequest {
    pr.labels = labels.iter().map(|l| l.to_string()).collect();
    pr
}

/// A recorded call on [`FakeGitea`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GiteaCall {
    ListPullRequests(StateFilter),
    ListModifiedFiles(u64),
    GetPullRequest(u64, String),
    PostComment(u64, String),
    UpdateCommitStatus(String, CommitStatus),
}

/// In-memory Gitea that records every call
#[derive(Debug, Clone, Default)]
pub struct FakeGitea {
    pull_requests: Vec<PullRequest>,
    files: HashMap<u64, Vec<String>>,
    fail_listing: bool,
    fail_files: bool,
    calls: Arc<Mutex<Vec<GiteaCall>>>,
}

impl FakeGitea {
    pub fn new(pull_requests: Vec<PullRequest>) -> Self {
        Self {
            pull_requests,
            ..Default::default()
        }
    }

    pub fn with_files(mut self, number: u64, files: &[&str]) -> Self {
        self.files
            .insert(number, files.iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn failing_files(mut self) -> Self {
        self.fail_files = true;
        self
    }

    pub fn calls(&self) -> Vec<GiteaCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&GiteaCall) -> bool) -> usize {
        self.calls().iter().filter(|c| predicate(c)).count()
    }

    fn record(&self, call: GiteaCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl GiteaClient for FakeGitea {
    async fn list_pull_requests(&self, state: StateFilter) -> anyhow::Result<Vec<PullRequest>> {
        self.record(GiteaCall::ListPullRequests(state));
        if self.fail_listing {
            anyhow::bail!("401 Unauthorized");
        }
        Ok(self
            .pull_requests
            .iter()
            .filter(|pr| listed(state, pr.state))
            .cloned()
            .collect())
    }

    async fn list_modified_files(&self, number: u64) -> anyhow::Result<Vec<String>> {
        self.record(GiteaCall::ListModifiedFiles(number));
        if self.fail_files {
            anyhow::bail!("502 Bad Gateway");
        }
        Ok(self.files.get(&number).cloned().unwrap_or_default())
    }

    async fn get_pull_request(&self, number: u64, commit_sha: &str) -> anyhow::Result<PullRequest> {
        self.record(GiteaCall::GetPullRequest(number, commit_sha.to_string()));
        self.pull_requests
            .iter()
            .find(|pr| pr.number == number)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("PR not found"))
    }

    async fn post_comment(&self, number: u64, body: &str) -> anyhow::Result<()> {
        self.record(GiteaCall::PostComment(number, body.to_string()));
        Ok(())
    }

    async fn update_commit_status(
        &self,
        commit_sha: &str,
        status: &CommitStatus,
    ) -> anyhow::Result<()> {
        self.record(GiteaCall::UpdateCommitStatus(
            commit_sha.to_string(),
            status.clone(),
        ));
        Ok(())
    }
}

/// Gitea's server-side `state` filter
fn listed(filter: StateFilter, state: PullRequestState) -> bool {
    match filter {
        StateFilter::Open => state == PullRequestState::Open,
        StateFilter::Closed => state == PullRequestState::Closed,
        StateFilter::All => true,
    }
}

/// A recorded call on [`FakeGit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    Init(String),
    Pull {
        url: String,
        base_ref: String,
        depth: u32,
        submodules: bool,
        fetch_tags: bool,
    },
    RevParse(String),
    Fetch {
        url: String,
        number: u64,
        depth: u32,
        submodules: bool,
    },
    Merge(String, bool),
    Rebase(String, String, bool),
    Checkout(String, String, bool),
}

/// Git stand-in that records calls and reports "sha" from rev-parse
#[derive(Debug, Clone, Default)]
pub struct FakeGit {
    calls: Arc<Mutex<Vec<GitCall>>>,
}

impl FakeGit {
    pub fn calls(&self) -> Vec<GitCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: GitCall) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

#[async_trait]
impl Git for FakeGit {
    async fn init(&self, base_ref: &str) -> anyhow::Result<()> {
        self.record(GitCall::Init(base_ref.to_string()))
    }

    async fn pull(
        &self,
        url: &str,
        base_ref: &str,
        depth: u32,
        submodules: bool,
        fetch_tags: bool,
    ) -> anyhow::Result<()> {
        self.record(GitCall::Pull {
            url: url.to_string(),
            base_ref: base_ref.to_string(),
            depth,
            submodules,
            fetch_tags,
        })
    }

    async fn rev_parse(&self, reference: &str) -> anyhow::Result<String> {
        self.record(GitCall::RevParse(reference.to_string()))?;
        Ok("sha".to_string())
    }

    async fn fetch(&self, url: &str, number: u64, depth: u32, submodules: bool) -> anyhow::Result<()> {
        self.record(GitCall::Fetch {
            url: url.to_string(),
            number,
            depth,
            submodules,
        })
    }

    async fn merge(&self, sha: &str, submodules: bool) -> anyhow::Result<()> {
        self.record(GitCall::Merge(sha.to_string(), submodules))
    }

    async fn rebase(&self, base_ref: &str, sha: &str, submodules: bool) -> anyhow::Result<()> {
        self.record(GitCall::Rebase(
            base_ref.to_string(),
            sha.to_string(),
            submodules,
        ))
    }

    async fn checkout(&self, branch: &str, sha: &str, submodules: bool) -> anyhow::Result<()> {
        self.record(GitCall::Checkout(
            branch.to_string(),
            sha.to_string(),
            submodules,
        ))
    }
}
