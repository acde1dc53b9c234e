// Receipt Processor - Web Server

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use receipt_processor::api::{router, AppState};
use receipt_processor::{ReceiptStore, ServerConfig};

/// Initialize logging and tracing
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {:?}", e);
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = ServerConfig::from_env()?;

    // Create shared state
    let state = AppState::new(Arc::new(ReceiptStore::new()), config.policy);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.addr))?;

    info!(addr = %config.addr, policy = %config.policy, "Receipt processor listening");
    info!("POST http://{}/receipts/process", config.addr);
    info!("GET  http://{}/receipts/:id/points", config.addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
