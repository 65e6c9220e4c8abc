//! GTP bridge HTTP server
//!
//! Usage: `gtp-server [bind_address] [engine_path]`
//!
//! Positional arguments override `GTP_BIND_ADDR` / `GTP_ENGINE_PATH`.
//! `GTP_COMMAND_TIMEOUT_SECS` bounds each engine exchange (unbounded by default).

use anyhow::{Context, Result};
use gtp_server::{GtpServer, ServerConfig};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Resolves on Ctrl-C or, on unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = ServerConfig::from_env().context("Invalid configuration")?;

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    if let Some(addr) = args.get(1) {
        config.bind_address = addr.clone();
    }
    if let Some(engine) = args.get(2) {
        config.engine_path = PathBuf::from(engine);
    }

    info!(
        "Starting GTP bridge: engine {:?}, command timeout {:?}",
        config.engine_path, config.command_timeout
    );

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;

    let server = GtpServer::from_config(&config);
    server.run(listener, shutdown_signal()).await?;

    info!("GTP bridge stopped");
    Ok(())
}
