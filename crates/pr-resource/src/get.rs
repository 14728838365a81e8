//! Fetching a pull request (`in`)
//!
//! Clones the base branch, fetches the PR head and integrates it, then
//! stores the version and metadata under `.git/resource` for a later `out`.

use crate::error::{ResourceError, Result};
use crate::git::Git;
use crate::source::Source;
use crate::version::{Metadata, Version};
use gitea_client::GiteaClient;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// How the PR head is combined with its base branch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationTool {
    #[default]
    Merge,
    Rebase,
    Checkout,
}

/// `params` of the `in` step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GetParameters {
    /// Only echo the version back
    pub skip_download: bool,
    pub integration_tool: IntegrationTool,
    /// Shallow clone depth; 0 clones the full history
    pub git_depth: u32,
    pub submodules: bool,
    pub fetch_tags: bool,
}

/// Input of the `in` step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetRequest {
    pub source: Source,
    pub version: Version,
    #[serde(default)]
    pub params: GetParameters,
}

/// Output of the `in` step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetResponse {
    pub version: Version,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

/// Directory holding the stored version and metadata of a checkout
pub fn resource_dir(checkout: &Path) -> PathBuf {
    checkout.join(".git").join("resource")
}

/// Materialise the requested version into `output_dir`
pub async fn get(
    request: &GetRequest,
    client: &dyn GiteaClient,
    git: &dyn Git,
    output_dir: &Path,
) -> Result<GetResponse> {
    let version = &request.version;
    let params = &request.params;

    if params.skip_download {
        debug!("Download skipped for PR #{}", version.pr);
        return Ok(GetResponse {
            version: version.clone(),
            metadata: Metadata::default(),
        });
    }

    let number: u64 = version
        .pr
        .parse()
        .map_err(|_| ResourceError::InvalidPullRequestNumber(version.pr.clone()))?;

    let pr = client
        .get_pull_request(number, &version.commit)
        .await
        .map_err(|source| ResourceError::GetPullRequest { number, source })?;

    git.init(&pr.base.ref_name)
        .await
        .map_err(ResourceError::git("init"))?;
    git.pull(
        &pr.base.clone_url,
        &pr.base.ref_name,
        params.git_depth,
        params.submodules,
        params.fetch_tags,
    )
    .await
    .map_err(ResourceError::git("pull"))?;

    let base_sha = git
        .rev_parse(&pr.base.ref_name)
        .await
        .map_err(ResourceError::git("rev-parse"))?;

    git.fetch(
        &pr.head.clone_url,
        pr.number,
        params.git_depth,
        params.submodules,
    )
    .await
    .map_err(ResourceError::git("fetch"))?;

    let mut metadata = Metadata::default();
    metadata.add("pr", pr.number.to_string());
    metadata.add("title", pr.title.as_str());
    metadata.add("url", pr.url.as_str());
    metadata.add("head_name", pr.head.ref_name.as_str());
    metadata.add("head_sha", pr.tip.sha.as_str());
    metadata.add("base_name", pr.base.ref_name.as_str());
    metadata.add("base_sha", base_sha);
    metadata.add("message", pr.tip.message.as_str());
    metadata.add("author", pr.tip.author_name.as_str());
    metadata.add("author_email", pr.tip.author_email.as_str());
    metadata.add("state", pr.state.as_str());

    store(&resource_dir(output_dir), version, &metadata)?;

    match params.integration_tool {
        IntegrationTool::Merge => git
            .merge(&pr.tip.sha, params.submodules)
            .await
            .map_err(ResourceError::git("merge"))?,
        IntegrationTool::Rebase => git
            .rebase(&pr.base.ref_name, &pr.tip.sha, params.submodules)
            .await
            .map_err(ResourceError::git("rebase"))?,
        IntegrationTool::Checkout => git
            .checkout(&pr.head.ref_name, &pr.tip.sha, params.submodules)
            .await
            .map_err(ResourceError::git("checkout"))?,
    }

    info!(
        "Fetched PR #{} at {} ({:?})",
        pr.number, pr.tip.sha, params.integration_tool
    );

    Ok(GetResponse {
        version: version.clone(),
        metadata,
    })
}

/// Write `version.json`, `metadata.json` and one file per metadata field
fn store(dir: &Path, version: &Version, metadata: &Metadata) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| ResourceError::Io {
        action: "create",
        path: dir.to_path_buf(),
        source,
    })?;

    let encoded_version = serde_json::to_vec(version).map_err(|source| ResourceError::Encode {
        what: "version",
        source,
    })?;
    write(&dir.join("version.json"), &encoded_version)?;

    let encoded_metadata =
        serde_json::to_vec(metadata).map_err(|source| ResourceError::Encode {
            what: "metadata",
            source,
        })?;
    write(&dir.join("metadata.json"), &encoded_metadata)?;

    for field in metadata.iter() {
        write(&dir.join(&field.name), field.value.as_bytes())?;
    }

    Ok(())
}

fn write(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).map_err(|source| ResourceError::Io {
        action: "write",
        path: path.to_path_buf(),
        source,
    })
}
