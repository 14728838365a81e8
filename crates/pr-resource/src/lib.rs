//! Concourse resource for Gitea pull requests
//!
//! Implements the three resource steps on top of the `gitea-client` crate:
//!
//! - [`check`] resolves which pull request versions are new
//! - [`get`] fetches one version into a working directory
//! - [`put`] reports a build result back as a commit status or comment
//!
//! ```text
//!            stdin (JSON)                       stdout (JSON)
//!                 │                                  ▲
//!                 ▼                                  │
//!   ┌──────────────────────────┐        ┌────────────┴───────────┐
//!   │ resource-check/in/out    │───────▶│ check / get / put      │
//!   │ (cli)                    │        │                        │
//!   └──────────────────────────┘        └──────┬──────────┬──────┘
//!                                              │          │
//!                                              ▼          ▼
//!                                     ┌─────────────┐ ┌─────────┐
//!                                     │ GiteaClient │ │ Git     │
//!                                     └─────────────┘ └─────────┘
//! ```
//!
//! Each step runs once per process and awaits its collaborators one call at
//! a time.

pub mod check;
pub mod cli;
pub mod error;
pub mod get;
pub mod git;
pub mod paths;
pub mod put;
pub mod skip_ci;
pub mod source;
pub mod template;
pub mod version;

#[cfg(test)]
mod test_support;

pub use check::{check, CheckRequest, CheckResponse};
pub use error::{ResourceError, Result};
pub use get::{get, GetParameters, GetRequest, GetResponse, IntegrationTool};
pub use git::{Git, GitCommand};
pub use paths::{filter_ignore_path, filter_path, is_inside_path};
pub use put::{put, PutParameters, PutRequest, PutResponse};
pub use skip_ci::contains_skip_ci;
pub use source::Source;
pub use template::expand_build_metadata;
pub use version::{updated_at, Metadata, MetadataField, Version};
