//! stdio entry point for the FMP MCP server.

use anyhow::Context as _;
use clap::Parser;
use fmp_client::{FmpClient, FmpConfig};
use fmp_mcp_server::FmpService;
use rmcp::ServiceExt as _;
use rmcp::transport::stdio;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// MCP server for the Financial Modeling Prep API (stdio transport).
#[derive(Debug, Parser)]
#[command(name = "fmp-mcp-server", version, about)]
struct Args {
    /// FMP API key.
    #[arg(long, env = "FMP_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Base URL of the FMP REST API.
    #[arg(long, env = "FMP_BASE_URL", default_value = fmp_client::config::DEFAULT_BASE_URL)]
    base_url: String,

    /// Upstream request timeout in seconds.
    #[arg(long, env = "FMP_TIMEOUT_SECS", default_value_t = fmp_client::config::DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the MCP transport; all diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = FmpConfig::new(
        args.api_key,
        &args.base_url,
        Duration::from_secs(args.timeout_secs),
    )?;
    let client = FmpClient::new(config)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting fmp-mcp-server on stdio"
    );

    let service = FmpService::new(client)
        .serve(stdio())
        .await
        .context("failed to start MCP service on stdio")?;
    service
        .waiting()
        .await
        .context("MCP service terminated abnormally")?;

    Ok(())
}
