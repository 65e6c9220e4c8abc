//! GTP protocol adapter
//!
//! Frames exactly one command/response exchange at a time: write the command
//! line, then read until a line starting with `=` or `?` arrives.

use crate::transport::LineTransport;
use gtp_core::{Command, GtpError, ResponseBlock, ResponseStatus, Result};
use std::time::Duration;
use tracing::debug;

/// Protocol adapter over an exclusively owned transport
pub struct GtpAdapter {
    transport: Box<dyn LineTransport>,
    /// Per-exchange deadline, unbounded when `None`
    timeout: Option<Duration>,
}

impl GtpAdapter {
    pub fn new(transport: Box<dyn LineTransport>, timeout: Option<Duration>) -> Self {
        Self { transport, timeout }
    }

    /// Send a command and wait for its response block
    pub async fn send(&mut self, command: &Command) -> Result<ResponseBlock> {
        self.send_command(&command.to_string()).await
    }

    /// Send raw command text and wait for its response block
    pub async fn send_command(&mut self, text: &str) -> Result<ResponseBlock> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.exchange(text))
                .await
                .map_err(|_| GtpError::Timeout(limit))?,
            None => self.exchange(text).await,
        }
    }

    async fn exchange(&mut self, text: &str) -> Result<ResponseBlock> {
        debug!("[Rust→Engine] {}", text);
        self.transport.write_line(text).await?;

        let mut lines = Vec::new();
        loop {
            let line = self.transport.read_line().await?.ok_or_else(|| {
                GtpError::IoFailure(format!(
                    "Engine closed output before answering {:?}",
                    text
                ))
            })?;
            debug!("[Engine→Rust] {}", line.trim_end());

            let terminal = ResponseStatus::of_line(&line).is_some();
            lines.push(line);
            if terminal {
                break;
            }
        }

        ResponseBlock::from_lines(lines)
            .ok_or_else(|| GtpError::IoFailure("Unterminated response block".into()))
    }

    /// Stop the engine behind this adapter
    pub async fn terminate(&mut self) -> Result<()> {
        self.transport.terminate().await
    }
}
