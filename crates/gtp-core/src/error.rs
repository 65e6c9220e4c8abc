//! Error types for the GTP bridge

use std::time::Duration;
use thiserror::Error;

/// Result type for GTP bridge operations
pub type Result<T> = std::result::Result<T, GtpError>;

/// GTP bridge error types
#[derive(Debug, Error)]
pub enum GtpError {
    /// A game is already in progress
    #[error("Game already running")]
    AlreadyRunning,

    /// No game has been started
    #[error("No game running")]
    NoActiveSession,

    /// Engine process or pipe setup failed
    #[error("Engine launch failed: {0}")]
    LaunchError(String),

    /// Engine answered with a failure-marked response
    #[error("{0}")]
    EngineRejected(String),

    /// Request body failed to parse or validate
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Pipe broken or closed mid-exchange
    #[error("Engine I/O failure: {0}")]
    IoFailure(String),

    /// Engine did not finish a response in time
    #[error("Engine did not respond within {0:?}")]
    Timeout(Duration),
}

impl GtpError {
    /// Whether this error leaves the engine pipes in an unknown state
    pub fn is_fatal(&self) -> bool {
        matches!(self, GtpError::IoFailure(_) | GtpError::Timeout(_))
    }
}
