//! Gitea client trait
//!
//! This module defines the `GiteaClient` trait, the narrow contract the
//! pull request resource needs from the hosting service. A client is bound
//! to a single repository at construction time.

use crate::types::{CommitStatus, PullRequest, StateFilter};
use async_trait::async_trait;

/// Gitea API client trait
///
/// Implementations hide pagination, authentication and HTTP semantics.
/// Every list operation returns the complete, flattened result.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a client can be shared across
/// async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use gitea_client::{GiteaClient, PullRequest, StateFilter};
///
/// async fn open_prs(client: &dyn GiteaClient) -> anyhow::Result<Vec<PullRequest>> {
///     client.list_pull_requests(StateFilter::Open).await
/// }
/// ```
#[async_trait]
pub trait GiteaClient: Send + Sync {
    /// List every pull request matching `state`, each with its latest commit
    async fn list_pull_requests(&self, state: StateFilter) -> anyhow::Result<Vec<PullRequest>>;

    /// List the paths of every file touched by a pull request
    async fn list_modified_files(&self, number: u64) -> anyhow::Result<Vec<String>>;

    /// Fetch a pull request with its tip set to the given commit
    ///
    /// Fails if `commit_sha` is not one of the pull request's commits.
    async fn get_pull_request(&self, number: u64, commit_sha: &str)
        -> anyhow::Result<PullRequest>;

    /// Post a comment on a pull request
    async fn post_comment(&self, number: u64, body: &str) -> anyhow::Result<()>;

    /// Create or update a commit status
    async fn update_commit_status(
        &self,
        commit_sha: &str,
        status: &CommitStatus,
    ) -> anyhow::Result<()>;
}
