//! Server configuration

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding the listen address
pub const ENV_BIND_ADDR: &str = "GTP_BIND_ADDR";
/// Environment variable overriding the engine binary
pub const ENV_ENGINE_PATH: &str = "GTP_ENGINE_PATH";
/// Environment variable bounding each engine exchange, in seconds
pub const ENV_COMMAND_TIMEOUT: &str = "GTP_COMMAND_TIMEOUT_SECS";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must not be empty")]
    Empty { key: &'static str },
    #[error("{key} must be a whole number of seconds, got {value:?}")]
    InvalidTimeout { key: &'static str, value: String },
}

/// Configuration for the HTTP bridge
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address to listen on (host:port)
    pub bind_address: String,
    /// Engine binary launched for every game
    pub engine_path: PathBuf,
    /// Deadline for one engine exchange, unbounded when `None`
    pub command_timeout: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            engine_path: PathBuf::from("./katago"),
            command_timeout: None,
        }
    }
}

impl ServerConfig {
    /// Defaults overlaid with `GTP_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup(ENV_BIND_ADDR) {
            config.bind_address = non_empty(ENV_BIND_ADDR, addr)?;
        }
        if let Some(path) = lookup(ENV_ENGINE_PATH) {
            config.engine_path = PathBuf::from(non_empty(ENV_ENGINE_PATH, path)?);
        }
        if let Some(raw) = lookup(ENV_COMMAND_TIMEOUT) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout {
                    key: ENV_COMMAND_TIMEOUT,
                    value: raw.clone(),
                })?;
            // 0 keeps exchanges unbounded
            config.command_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(config)
    }
}

fn non_empty(key: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Empty { key });
    }
    Ok(trimmed.to_string())
}
