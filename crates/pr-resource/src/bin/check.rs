//! `check`: report new pull request versions

use anyhow::{Context, Result};
use pr_resource::{check, cli, CheckRequest};

#[tokio::main]
async fn main() {
    cli::init_logging();

    if let Err(err) = run().await {
        log::error!("check failed: {:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let request: CheckRequest = cli::read_request()?;
    let client = cli::connect(&request.source)?;

    let response = check(&request, &client)
        .await
        .context("Failed to check for new versions")?;

    cli::write_response(&response)
}
