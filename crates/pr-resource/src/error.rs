//! Resource error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the check, get and put operations
///
/// Every variant aborts the whole operation; no partial output is produced.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("invalid source configuration: {0}")]
    InvalidSource(String),

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("failed to list pull requests")]
    ListPullRequests(#[source] anyhow::Error),

    #[error("failed to list modified files of pull request #{number}")]
    ListModifiedFiles {
        number: u64,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid path pattern '{pattern}'")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("invalid pull request number '{0}'")]
    InvalidPullRequestNumber(String),

    #[error("failed to retrieve pull request #{number}")]
    GetPullRequest {
        number: u64,
        #[source]
        source: anyhow::Error,
    },

    #[error("git {operation} failed")]
    Git {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to set status on commit {commit}")]
    UpdateCommitStatus {
        commit: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to post comment on pull request #{number}")]
    PostComment {
        number: u64,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to {action} {}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {what}")]
    Encode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ResourceError>;

impl ResourceError {
    /// Wrap a failed git step
    pub(crate) fn git(operation: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| ResourceError::Git { operation, source }
    }
}
