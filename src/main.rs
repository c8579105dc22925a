//! rocker - manage and check connections to remote rocker servers.

mod cli;
mod launcher;

use clap::Parser;
use cli::Args;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting rocker");

    if let Err(e) = launcher::start(args).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
