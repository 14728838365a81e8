//! Plumbing shared by the `check`, `in` and `out` binaries
//!
//! Concourse talks to a resource over stdio: the request arrives as JSON on
//! stdin, the response leaves as JSON on stdout, and everything else goes to
//! stderr.

use crate::source::Source;
use anyhow::{Context, Result};
use gitea_client::{OctocrabClient, TokenResolver};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

/// Log to stderr at `info` unless `RUST_LOG` says otherwise
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .init();
}

/// Decode the request from stdin, rejecting unknown fields
pub fn read_request<T: DeserializeOwned>() -> Result<T> {
    serde_json::from_reader(io::stdin().lock()).context("Failed to decode request")
}

/// Encode the response to stdout
pub fn write_response<T: Serialize>(response: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, response).context("Failed to encode response")?;
    writeln!(stdout).context("Failed to write response")?;
    Ok(())
}

/// The directory Concourse passes as the first argument to `in` and `out`
pub fn target_directory() -> Result<PathBuf> {
    std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("missing arguments: expected a target directory")
}

/// Resolve the access token for `source`
pub fn access_token(source: &Source) -> Result<String> {
    TokenResolver::new().resolve(&source.access_token)
}

/// Validate `source` and build a Gitea client for it
pub fn connect(source: &Source) -> Result<OctocrabClient> {
    source
        .validate()
        .context("Invalid source configuration")?;
    let token = access_token(source)?;
    OctocrabClient::connect(&source.endpoint, token, &source.repository)
        .context("Failed to create Gitea client")
}
