//! `in`: fetch a pull request version into the given directory

use anyhow::{Context, Result};
use pr_resource::{cli, get, GetRequest, GitCommand};

#[tokio::main]
async fn main() {
    cli::init_logging();

    if let Err(err) = run().await {
        log::error!("get failed: {:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let request: GetRequest = cli::read_request()?;
    let output_dir = cli::target_directory()?;
    let client = cli::connect(&request.source)?;
    let git = GitCommand::new(&output_dir, cli::access_token(&request.source)?);

    let response = get(&request, &client, &git, git.directory())
        .await
        .with_context(|| format!("Failed to fetch PR #{}", request.version.pr))?;

    cli::write_response(&response)
}
