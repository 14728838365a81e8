//! Gitea API data transfer objects
//!
//! These types are immutable snapshots of what the Gitea API reports for a
//! repository. They are intentionally separate from the resource's version
//! and configuration models to keep this crate reusable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which pull requests to list, by lifecycle state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateFilter {
    /// Only open pull requests
    #[default]
    Open,
    /// Only closed (merged or abandoned) pull requests
    Closed,
    /// Every pull request regardless of state
    All,
}

impl StateFilter {
    /// Value of the `state` query parameter understood by Gitea
    pub fn as_str(&self) -> &'static str {
        match self {
            StateFilter::Open => "open",
            StateFilter::Closed => "closed",
            StateFilter::All => "all",
        }
    }
}

/// Lifecycle state of a single pull request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestState {
    #[default]
    Open,
    Closed,
}

impl PullRequestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PullRequestState::Open => "open",
            PullRequestState::Closed => "closed",
        }
    }
}

impl fmt::Display for PullRequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pull request together with its latest commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR index within the repository (e.g., 42)
    pub number: u64,

    /// PR title
    pub title: String,

    /// PR URL for opening in browser
    pub url: String,

    /// Open or closed
    pub state: PullRequestState,

    /// Whether a closed PR was merged
    pub merged: bool,

    /// When the PR was merged, if it was
    pub merged_at: Option<DateTime<Utc>>,

    /// When the PR was closed, if it was
    pub closed_at: Option<DateTime<Utc>>,

    /// Branch the PR targets
    pub base: BranchInfo,

    /// Branch the PR proposes
    pub head: BranchInfo,

    /// Label names attached to the PR
    pub labels: Vec<String>,

    /// Latest known commit on the head branch
    pub tip: Commit,
}

/// One side (base or head) of a pull request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchInfo {
    /// Branch label as shown by Gitea (e.g., "main")
    pub name: String,

    /// Git ref of the branch (e.g., "main" or "feature/foo")
    pub ref_name: String,

    /// Commit the branch pointed at when the PR was fetched
    pub sha: String,

    /// Clone URL of the repository holding the branch
    pub clone_url: String,
}

/// A commit as listed for a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub message: String,
    pub author_name: String,
    pub author_email: String,
    pub created: DateTime<Utc>,
}

/// State of a commit status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusState {
    Pending,
    Success,
    Failure,
    Error,
}

impl StatusState {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusState::Pending => "pending",
            StatusState::Success => "success",
            StatusState::Failure => "failure",
            StatusState::Error => "error",
        }
    }
}

impl fmt::Display for StatusState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusState {
    type Err = anyhow::Error;

    /// Parse a status name, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(StatusState::Pending),
            "success" => Ok(StatusState::Success),
            "failure" => Ok(StatusState::Failure),
            "error" => Ok(StatusState::Error),
            _ => Err(anyhow::anyhow!("unknown status: {}", s)),
        }
    }
}

/// A commit status to publish
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStatus {
    pub state: StatusState,
    pub target_url: String,
    pub description: String,
    /// Full status context (e.g., "concourse-ci/status")
    pub context: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_filter_default() {
        assert_eq!(StateFilter::default(), StateFilter::Open);
    }

    #[test]
    fn test_state_filter_serde() {
        let filters = vec![
            (StateFilter::Open, "\"open\""),
            (StateFilter::Closed, "\"closed\""),
            (StateFilter::All, "\"all\""),
        ];

        for (filter, expected_json) in filters {
            let json = serde_json::to_string(&filter).unwrap();
            assert_eq!(json, expected_json);
            assert_eq!(format!("\"{}\"", filter.as_str()), expected_json);

            let deserialized: StateFilter = serde_json::from_str(&json).unwrap();
            assert_eq!(deserialized, filter);
        }

        assert!(serde_json::from_str::<StateFilter>("\"merged\"").is_err());
    }

    #[test]
    fn test_status_state_from_str_is_case_insensitive() {
        assert_eq!("success".parse::<StatusState>().unwrap(), StatusState::Success);
        assert_eq!("FAILURE".parse::<StatusState>().unwrap(), StatusState::Failure);
        assert_eq!("Pending".parse::<StatusState>().unwrap(), StatusState::Pending);
        assert_eq!("error".parse::<StatusState>().unwrap(), StatusState::Error);

        let err = "done".parse::<StatusState>().unwrap_err();
        assert_eq!(err.to_string(), "unknown status: done");
    }
}
