mod advisory;
mod config;
mod dataset;
mod error;
mod filter;
mod model;
mod server;
mod session;

use std::sync::Arc;

use advisor_common::openai::OpenAiClient;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use rmcp::{ServiceExt, transport::stdio};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use advisory::AdvisoryClient;
use config::Config;
use dataset::Dataset;
use server::SchemeAdvisorServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing to stderr (stdout is reserved for MCP JSON-RPC)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting scheme-advisor MCP server");

    let config = Config::from_env()?;
    info!(
        dataset_path = %config.dataset_path,
        model = %config.model,
        base_url = %config.openai.base_url,
        "configuration loaded"
    );
    if config.openai.api_key.is_none() {
        warn!("no API key set (GROQ_API_KEY or OPENAI_API_KEY); summaries and answers will fail");
    }

    // Loaded once; every session reads the same records.
    let dataset = Arc::new(Dataset::load(&config.dataset_path())?);
    if dataset.is_empty() {
        warn!("scheme dataset has no rows; every filter will come back empty");
    }

    let openai = Arc::new(OpenAiClient::new(config.openai.clone())?);
    let advisor = Arc::new(AdvisoryClient::new(openai, config.model.clone()));
    let server = SchemeAdvisorServer::new(dataset, advisor);

    if let Some(addr) = config.http_listen_addr.as_deref() {
        let service = StreamableHttpService::new(
            move || Ok(server.fresh_session()),
            LocalSessionManager::default().into(),
            StreamableHttpServerConfig::default(),
        );
        let router = axum::Router::new().nest_service("/mcp", service);
        let listener = TcpListener::bind(addr).await?;
        info!(listen_addr = %addr, "MCP server ready, serving streamable HTTP at /mcp");
        axum::serve(listener, router).await?;
    } else if let Some(addr) = config.tcp_listen_addr.as_deref() {
        let listener = TcpListener::bind(addr).await?;
        info!(listen_addr = %addr, "MCP server ready, serving on TCP");
        loop {
            let (stream, peer) = listener.accept().await?;
            let server = server.fresh_session();
            tokio::spawn(async move {
                tracing::info!(peer = %peer, "MCP client connected");
                let service = server.serve(stream).await.inspect_err(|e| {
                    tracing::error!(error = %e, "MCP server error");
                })?;
                service.waiting().await?;
                tracing::info!(peer = %peer, "MCP client disconnected");
                Ok::<(), anyhow::Error>(())
            });
        }
    } else {
        info!("MCP server ready, serving on stdio");
        let service = server.serve(stdio()).await.inspect_err(|e| {
            tracing::error!(error = %e, "MCP server error");
        })?;
        service.waiting().await?;
        info!("MCP server shut down");
    }
    Ok(())
}
