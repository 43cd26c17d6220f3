//! MCP server initialization for stdio and Streamable HTTP transports.
//!
//! Provides [`serve_stdio`] and [`serve_http`] entry points that build the shared
//! workspace, import the configured snapshot, and hand it to the MCP tool handler.

use crate::tools::MnemosTools;
use anyhow::Result;
use mnemos::config::MnemosConfig;
use mnemos::workspace::Workspace;
use rmcp::ServiceExt;
use std::sync::{Arc, Mutex};

/// Shared setup: build the workspace from config and import the seed snapshot if one is set.
fn setup_shared_state(config: &MnemosConfig) -> Result<Arc<Mutex<Workspace>>> {
    let mut workspace = Workspace::new(config);

    if let Some(seed) = config.resolved_seed_path() {
        workspace.seed_from(&seed)?;
    }

    tracing::info!(
        memories = workspace.memory.len(),
        link_threshold = config.memory.link_threshold,
        "workspace ready"
    );

    Ok(Arc::new(Mutex::new(workspace)))
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: MnemosConfig) -> Result<()> {
    tracing::info!("starting mnemos MCP server on stdio");

    let workspace = setup_shared_state(&config)?;

    let tools = MnemosTools::new(workspace);
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server running, waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}

/// Start the MCP server over Streamable HTTP transport.
///
/// Every session shares one workspace.
pub async fn serve_http(config: MnemosConfig) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);

    tracing::info!(addr = %bind_addr, "starting mnemos MCP server on HTTP");

    let workspace = setup_shared_state(&config)?;

    let service = rmcp::transport::streamable_http_server::StreamableHttpService::new(
        move || Ok(MnemosTools::new(workspace.clone())),
        rmcp::transport::streamable_http_server::session::local::LocalSessionManager::default()
            .into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", service);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "MCP server listening at http://{bind_addr}/mcp");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}
