//! # gtp-server
//!
//! HTTP control surface for a GTP engine.
//!
//! This crate provides:
//! - `SessionManager` owning the single engine session
//! - `ServerConfig` with environment overrides
//! - axum routes for starting, playing, generating moves, and ending games

pub mod config;
pub mod http;
pub mod session;

pub use config::{ConfigError, ServerConfig};
pub use session::{GameSetup, SessionManager};

use gtp_bridge::KataGoLauncher;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// GTP bridge HTTP server
pub struct GtpServer {
    sessions: Arc<SessionManager>,
}

impl GtpServer {
    /// Create a server around an existing session manager
    pub fn new(sessions: SessionManager) -> Self {
        Self {
            sessions: Arc::new(sessions),
        }
    }

    /// Create a server that launches the configured engine binary
    pub fn from_config(config: &ServerConfig) -> Self {
        let launcher = KataGoLauncher::new(config.engine_path.clone());
        Self::new(SessionManager::new(launcher).with_command_timeout(config.command_timeout))
    }

    /// Shared session manager
    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// Axum router serving this server's endpoints
    pub fn router(&self) -> axum::Router {
        http::router(self.sessions.clone())
    }

    /// Serve on `listener` until `shutdown` resolves, then end any running game
    pub async fn run<S>(self, listener: TcpListener, shutdown: S) -> std::io::Result<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        info!("GTP bridge listening on {}", listener.local_addr()?);
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Shutting down, ending any running game");
        self.sessions.end().await;
        Ok(())
    }
}
