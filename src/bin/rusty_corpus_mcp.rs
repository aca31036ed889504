//! MCP server entrypoint (stdio transport).
//!
//! Exposes the Rusty Corpus tools and resources over stdio for agent hosts. Logs go to stderr
//! and the log file so stdout stays reserved for protocol frames.
use anyhow::{Context, Result};
use rmcp::{service::ServiceExt, transport::stdio};
use rustycorpus::{config, corpus::CorpusService, logging, mcp::RustyCorpusMcpServer};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    config::init_config();
    logging::init_tracing(false);

    let corpus = CorpusService::from_config(config::get_config())
        .context("failed to initialise corpus service")?;
    let server = RustyCorpusMcpServer::new(Arc::new(corpus));

    let service = server
        .serve(stdio())
        .await
        .context("failed to start MCP server over stdio")?;

    service
        .waiting()
        .await
        .context("MCP server terminated unexpectedly")?;

    Ok(())
}
