use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use kinesis_mcp::McpServer;
use kinesis_mcp_server::{AwsKinesis, KinesisService, ServerConfig, build_registry, telemetry};

const INSTRUCTIONS: &str = "Tools for Amazon Kinesis Data Streams: create, describe and delete \
streams, write and read records, manage shards, tags, encryption, enhanced monitoring, \
resource policies and enhanced fan-out consumers. Every tool accepts an optional region_name.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    telemetry::init(config.log_format)
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to install the log subscriber")?;

    tracing::info!(
        region = %config.region,
        testing = config.testing,
        allow_destructive = config.allow_destructive,
        "kinesis-mcp-server starting"
    );

    let service = KinesisService::new(Arc::new(AwsKinesis::new()), config.region.clone());
    let registry = build_registry(service, &config);
    tracing::info!(tools = registry.len(), "tools registered");

    McpServer::new(registry, "kinesis-mcp-server", env!("CARGO_PKG_VERSION"))
        .with_instructions(INSTRUCTIONS)
        .serve_stdio()
        .await
        .context("MCP server stopped with an error")?;
    Ok(())
}
