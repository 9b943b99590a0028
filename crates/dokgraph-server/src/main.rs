//! Dokgraph server binary
//!
//! Starts the HTTP server for outline extraction and connection analysis.

use anyhow::Context;
use clap::Parser;
use dokgraph_server::{config::ServerConfig, start_server};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Extract knowledge documents from shared outlines and infer their connections
#[derive(Debug, Parser)]
#[command(name = "dokgraph-server", version, about)]
struct Cli {
    /// TOML configuration file; environment variables override its values
    #[arg(long, env = "DOKGRAPH_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = ServerConfig::load(cli.config.as_deref()).context("loading configuration")?;
    start_server(config).await?;

    Ok(())
}
