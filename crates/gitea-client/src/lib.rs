//! Gitea pull request API client
//!
//! This crate provides the trait-based Gitea client used by the pull request
//! resource. The trait is the seam for tests; the octocrab implementation
//! talks to a real Gitea instance.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              GiteaClient trait                   │
//! │  - list_pull_requests()                          │
//! │  - list_modified_files()                         │
//! │  - get_pull_request()                            │
//! │  - post_comment() / update_commit_status()       │
//! └─────────────────────────────────────────────────┘
//!                        │
//!        ┌───────────────┴───────────────┐
//!        ▼                               ▼
//! ┌─────────────────┐         ┌─────────────────────┐
//! │ OctocrabClient  │         │ test fakes          │
//! │ (/api/v1)       │         │ (in-memory)         │
//! └─────────────────┘         └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use gitea_client::{GiteaClient, OctocrabClient, StateFilter, TokenResolver};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let token = TokenResolver::new().resolve("")?;
//! let client = OctocrabClient::connect("https://codeberg.org", token, "owner/repo")?;
//!
//! let prs = client.list_pull_requests(StateFilter::Open).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod octocrab_client;
pub mod token;
pub mod types;

pub use client::GiteaClient;
pub use octocrab_client::{parse_repository, OctocrabClient};
pub use token::{TokenResolver, TOKEN_ENV_VAR};
pub use types::{
    BranchInfo, Commit, CommitStatus, PullRequest, PullRequestState, StateFilter, StatusState,
};
