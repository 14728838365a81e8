//! Version resolution
//!
//! Decides which pull request versions are new since the last version the
//! pipeline saw.

use crate::error::{ResourceError, Result};
use crate::paths::{filter_ignore_path, filter_path};
use crate::skip_ci::contains_skip_ci;
use crate::source::Source;
use crate::version::{updated_at, Version};
use gitea_client::{GiteaClient, PullRequest};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Input of the `check` step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckRequest {
    pub source: Source,

    /// Last version emitted; absent on the very first check
    #[serde(default)]
    pub version: Option<Version>,
}

/// Output of the `check` step, oldest version first
pub type CheckResponse = Vec<Version>;

/// Resolve the versions to emit for `request`
///
/// Collaborator calls are issued one at a time. Changed files are only
/// listed for PRs that pass every other filter, and only when path filters
/// are configured.
pub async fn check(request: &CheckRequest, client: &dyn GiteaClient) -> Result<CheckResponse> {
    let source = &request.source;
    let last = request.version.clone().unwrap_or_default();

    let pull_requests = client
        .list_pull_requests(source.state)
        .await
        .map_err(ResourceError::ListPullRequests)?;
    debug!("Considering {} pull requests", pull_requests.len());

    let mut versions = Vec::new();
    for pr in &pull_requests {
        if !passes_filters(source, &last, pr) {
            continue;
        }
        if source.has_path_filters() && !touches_wanted_paths(source, client, pr).await? {
            continue;
        }
        versions.push(Version::from(pr));
    }

    versions.sort_by_key(|v| v.committed);
    let response = collapse(versions, last);

    info!("Check found {} version(s)", response.len());
    Ok(response)
}

/// Skip-CI, base branch, recency and label filters, in that order
fn passes_filters(source: &Source, last: &Version, pr: &PullRequest) -> bool {
    if !source.disable_ci_skip && (contains_skip_ci(&pr.title) || contains_skip_ci(&pr.tip.message))
    {
        debug!("Skipping PR #{}: skip-ci marker", pr.number);
        return false;
    }

    if let Some(base_branch) = source.base_branch() {
        if pr.base.name != base_branch {
            debug!("Skipping PR #{}: targets {}", pr.number, pr.base.name);
            return false;
        }
    }

    if let Some(since) = last.committed {
        if updated_at(pr) <= since {
            return false;
        }
    }

    if !source.labels.is_empty() && !pr.labels.iter().any(|l| source.labels.contains(l)) {
        debug!("Skipping PR #{}: no wanted label", pr.number);
        return false;
    }

    true
}

/// Include and ignore path filters over the PR's changed files
async fn touches_wanted_paths(
    source: &Source,
    client: &dyn GiteaClient,
    pr: &PullRequest,
) -> Result<bool> {
    let files = client
        .list_modified_files(pr.number)
        .await
        .map_err(|source| ResourceError::ListModifiedFiles {
            number: pr.number,
            source,
        })?;
    debug!("PR #{} changes {} file(s)", pr.number, files.len());

    if !source.paths.is_empty() {
        let mut wanted = Vec::new();
        for pattern in &source.paths {
            wanted.extend(filter_path(&files, pattern)?);
        }
        if wanted.is_empty() {
            debug!("Skipping PR #{}: no file matches paths", pr.number);
            return Ok(false);
        }
    }

    if !source.ignore_paths.is_empty() {
        let mut remaining = files;
        for pattern in &source.ignore_paths {
            remaining = filter_ignore_path(&remaining, pattern)?;
        }
        if remaining.is_empty() {
            debug!("Skipping PR #{}: every file is ignored", pr.number);
            return Ok(false);
        }
    }

    Ok(true)
}

/// Apply the "nothing new" and "first run" rules to sorted versions
fn collapse(mut versions: Vec<Version>, last: Version) -> Vec<Version> {
    match (versions.is_empty(), last.is_empty()) {
        // Nothing new: keep reporting the last version
        (true, false) => vec![last],
        // First run: only the newest, not the whole backlog
        (false, true) => versions.pop().into_iter().collect(),
        _ => versions,
    }
}
