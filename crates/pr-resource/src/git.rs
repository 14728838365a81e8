//! Git collaborator used by the `in` step
//!
//! The `Git` trait is the seam between fetching a pull request and the git
//! mechanics. `GitCommand` drives the `git` binary in a working directory.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Git operations needed to materialise a pull request
#[async_trait]
pub trait Git: Send + Sync {
    /// Create an empty repository on `base_ref`
    async fn init(&self, base_ref: &str) -> Result<()>;

    /// Pull `base_ref` from `url`
    async fn pull(
        &self,
        url: &str,
        base_ref: &str,
        depth: u32,
        submodules: bool,
        fetch_tags: bool,
    ) -> Result<()>;

    /// Resolve a reference to a commit SHA
    async fn rev_parse(&self, reference: &str) -> Result<String>;

    /// Fetch the head of pull request `number` from `url`
    async fn fetch(&self, url: &str, number: u64, depth: u32, submodules: bool) -> Result<()>;

    /// Merge `sha` into the current branch
    async fn merge(&self, sha: &str, submodules: bool) -> Result<()>;

    /// Rebase `sha` onto `base_ref`
    async fn rebase(&self, base_ref: &str, sha: &str, submodules: bool) -> Result<()>;

    /// Check out `sha` as a new `branch`
    async fn checkout(&self, branch: &str, sha: &str, submodules: bool) -> Result<()>;
}

/// `Git` implementation running the `git` binary
#[derive(Debug, Clone)]
pub struct GitCommand {
    directory: PathBuf,
    access_token: String,
}

impl GitCommand {
    pub fn new(directory: impl Into<PathBuf>, access_token: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            access_token: access_token.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        let display = args.join(" ");
        debug!("Running git {}", display);

        // The token is passed per invocation so it never lands in .git/config
        let output = Command::new("git")
            .arg("-c")
            .arg(format!(
                "http.extraHeader=Authorization: token {}",
                self.access_token
            ))
            .args(args)
            .current_dir(&self.directory)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .await
            .with_context(|| format!("Failed to run 'git {}'", display))?;

        if !output.status.success() {
            anyhow::bail!(
                "'git {}' exited with {}: {}",
                display,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn update_submodules(&self, mode: &str) -> Result<()> {
        self.run(&["submodule", "update", "--init", "--recursive", mode])
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl Git for GitCommand {
    async fn init(&self, base_ref: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .with_context(|| format!("Failed to create {}", self.directory.display()))?;

        self.run(&["init"]).await?;
        self.run(&["config", "user.name", "concourse-ci"]).await?;
        self.run(&["config", "user.email", "concourse@local"]).await?;
        self.run(&["checkout", "-b", base_ref]).await?;
        Ok(())
    }

    async fn pull(
        &self,
        url: &str,
        base_ref: &str,
        depth: u32,
        submodules: bool,
        fetch_tags: bool,
    ) -> Result<()> {
        let depth_arg = depth.to_string();
        let mut args = vec!["pull", url, base_ref];
        if depth > 0 {
            args.extend(["--depth", depth_arg.as_str()]);
        }
        if submodules {
            args.push("--recurse-submodules");
        }
        if fetch_tags {
            args.push("--tags");
        }

        self.run(&args).await.map(|_| ())
    }

    async fn rev_parse(&self, reference: &str) -> Result<String> {
        self.run(&["rev-parse", "--verify", reference]).await
    }

    async fn fetch(&self, url: &str, number: u64, depth: u32, submodules: bool) -> Result<()> {
        let refspec = format!("pull/{}/head", number);
        let depth_arg = depth.to_string();
        let mut args = vec!["fetch", url, refspec.as_str()];
        if depth > 0 {
            args.extend(["--depth", depth_arg.as_str()]);
        }
        if submodules {
            args.push("--recurse-submodules");
        }

        self.run(&args).await.map(|_| ())
    }

    async fn merge(&self, sha: &str, submodules: bool) -> Result<()> {
        self.run(&["merge", sha, "--no-stat"]).await?;
        if submodules {
            self.update_submodules("--merge").await?;
        }
        Ok(())
    }

    async fn rebase(&self, base_ref: &str, sha: &str, submodules: bool) -> Result<()> {
        self.run(&["rebase", base_ref, sha]).await?;
        if submodules {
            self.update_submodules("--rebase").await?;
        }
        Ok(())
    }

    async fn checkout(&self, branch: &str, sha: &str, submodules: bool) -> Result<()> {
        self.run(&["checkout", "-b", branch, sha]).await?;
        if submodules {
            self.update_submodules("--checkout").await?;
        }
        Ok(())
    }
}
