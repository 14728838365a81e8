//! Versions and build metadata
//!
//! A version is the checkpoint Concourse persists between checks. It is
//! derived from a pull request snapshot by pure functions.

use chrono::{DateTime, Utc};
use gitea_client::{PullRequest, PullRequestState};
use serde::{Deserialize, Serialize};

/// A pull request state the pipeline can be triggered on
///
/// Versions are ordered by `committed` only. An empty `pr` means no
/// version has been emitted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Version {
    /// PR number as a string
    pub pr: String,

    /// Head commit SHA
    pub commit: String,

    /// When the PR was last updated (see [`updated_at`])
    #[serde(skip_serializing_if = "Option::is_none")]
    pub committed: Option<DateTime<Utc>>,

    /// PR state at that moment
    pub state: PullRequestState,
}

impl Version {
    /// Whether this is the "no history yet" version
    pub fn is_empty(&self) -> bool {
        self.pr.is_empty()
    }
}

impl From<&PullRequest> for Version {
    fn from(pr: &PullRequest) -> Self {
        Version {
            pr: pr.number.to_string(),
            commit: pr.head.sha.clone(),
            committed: Some(updated_at(pr)),
            state: pr.state,
        }
    }
}

/// Last time a PR was updated, by commit or by being merged or closed
///
/// Merged PRs report their merge time, PRs closed without merging their
/// closing time, and open PRs the time of their latest commit.
pub fn updated_at(pr: &PullRequest) -> DateTime<Utc> {
    let closed_at = match pr.state {
        PullRequestState::Closed if pr.merged => pr.merged_at,
        PullRequestState::Closed => pr.closed_at,
        PullRequestState::Open => None,
    };

    closed_at.unwrap_or(pr.tip.created)
}

/// Ordered name/value pairs describing the fetched pull request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(Vec<MetadataField>);

/// A single metadata entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataField {
    pub name: String,
    pub value: String,
}

impl Metadata {
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push(MetadataField {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Value of the first field called `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetadataField> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
