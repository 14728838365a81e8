//! `out`: set a commit status and/or comment on the fetched pull request

use anyhow::{Context, Result};
use pr_resource::{cli, put, PutRequest};
use std::collections::HashMap;

#[tokio::main]
async fn main() {
    cli::init_logging();

    if let Err(err) = run().await {
        log::error!("put failed: {:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let request: PutRequest = cli::read_request()?;
    let input_dir = cli::target_directory()?;
    let client = cli::connect(&request.source)?;
    let env: HashMap<String, String> = std::env::vars().collect();

    let response = put(&request, &client, &input_dir, &env)
        .await
        .context("Failed to publish build result")?;

    cli::write_response(&response)
}
