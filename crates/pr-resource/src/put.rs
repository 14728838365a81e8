//! Publishing build results (`out`)
//!
//! Reads the version stored by `in` and reports back to the pull request
//! with a commit status and/or a comment.

use crate::error::{ResourceError, Result};
use crate::get::resource_dir;
use crate::source::Source;
use crate::template::expand_build_metadata;
use crate::version::{Metadata, Version};
use gitea_client::{CommitStatus, GiteaClient, StatusState};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const DEFAULT_BASE_CONTEXT: &str = "concourse-ci";
const DEFAULT_CONTEXT: &str = "status";
const DEFAULT_TARGET_URL: &str = "$ATC_EXTERNAL_URL/builds/$BUILD_ID";

/// `params` of the `out` step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PutParameters {
    /// Directory of the `in` checkout, relative to the input directory
    pub path: String,
    pub base_context: String,
    pub context: String,
    /// Comment text to post on the PR
    pub comment: String,
    /// File whose content is posted as a comment, relative to the input directory
    pub comment_file: String,
    pub target_url: String,
    pub description: String,
    /// One of success, pending, failure or error
    pub status: String,
}

impl PutParameters {
    /// Check the status name, returning it parsed when one is set
    pub fn validate(&self) -> Result<Option<StatusState>> {
        if self.status.is_empty() {
            return Ok(None);
        }

        self.status
            .parse()
            .map(Some)
            .map_err(|e: anyhow::Error| ResourceError::InvalidParameters(e.to_string()))
    }

    /// The status to report for `state`, with defaults filled in
    fn commit_status(&self, state: StatusState, env: &HashMap<String, String>) -> CommitStatus {
        let base_context = non_empty(&self.base_context).unwrap_or(DEFAULT_BASE_CONTEXT);
        let context = non_empty(&self.context).unwrap_or(DEFAULT_CONTEXT);
        let target_url = non_empty(&self.target_url).unwrap_or(DEFAULT_TARGET_URL);
        let description = non_empty(&self.description)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Concourse CI build {}", state));

        CommitStatus {
            state,
            target_url: expand_build_metadata(target_url, env),
            description,
            context: expand_build_metadata(&format!("{}/{}", base_context, context), env),
        }
    }
}

/// Input of the `out` step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PutRequest {
    pub source: Source,
    #[serde(default)]
    pub params: PutParameters,
}

/// Output of the `out` step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutResponse {
    pub version: Version,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

/// Report on the pull request fetched into `input_dir`
///
/// `env` supplies the build metadata substituted into comments, the
/// status context and the target URL.
pub async fn put(
    request: &PutRequest,
    client: &dyn GiteaClient,
    input_dir: &Path,
    env: &HashMap<String, String>,
) -> Result<PutResponse> {
    let params = &request.params;
    let status = params.validate()?;

    let stored = resource_dir(&input_dir.join(&params.path));
    let version: Version = read_json(&stored.join("version.json"))?;
    let metadata: Metadata = read_json(&stored.join("metadata.json"))?;

    if let Some(state) = status {
        let commit_status = params.commit_status(state, env);
        debug!(
            "Setting {} status '{}' on {}",
            commit_status.state, commit_status.context, version.commit
        );
        client
            .update_commit_status(&version.commit, &commit_status)
            .await
            .map_err(|source| ResourceError::UpdateCommitStatus {
                commit: version.commit.clone(),
                source,
            })?;
        info!("Set status {} on {}", state, version.commit);
    }

    if !params.comment.is_empty() {
        let body = expand_build_metadata(&params.comment, env);
        post_comment(client, &version, &body).await?;
    }

    if !params.comment_file.is_empty() {
        let path = input_dir.join(&params.comment_file);
        let content = fs::read_to_string(&path).map_err(|source| ResourceError::Io {
            action: "read",
            path,
            source,
        })?;
        if !content.is_empty() {
            let body = expand_build_metadata(&content, env);
            post_comment(client, &version, &body).await?;
        }
    }

    Ok(PutResponse { version, metadata })
}

async fn post_comment(client: &dyn GiteaClient, version: &Version, body: &str) -> Result<()> {
    let number: u64 = version
        .pr
        .parse()
        .map_err(|_| ResourceError::InvalidPullRequestNumber(version.pr.clone()))?;

    client
        .post_comment(number, body)
        .await
        .map_err(|source| ResourceError::PostComment { number, source })?;
    info!("Commented on PR #{}", number);
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read(path).map_err(|source| ResourceError::Io {
        action: "read",
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&content).map_err(|source| ResourceError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}
