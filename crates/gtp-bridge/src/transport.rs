//! Transport abstraction for engine I/O
//!
//! A `LineTransport` owns the engine's input and output streams. Every byte
//! exchanged with the engine goes through it, so tests can swap in a fake and
//! deadlines can be layered on top without touching callers.

use async_trait::async_trait;
use gtp_core::Result;

/// Line-oriented, exclusively owned connection to an engine
#[async_trait]
pub trait LineTransport: Send {
    /// Write `line` followed by a single `\n` and flush
    async fn write_line(&mut self, line: &str) -> Result<()>;

    /// Read the next line including its terminator.
    /// Returns `None` once the engine has closed its output.
    async fn read_line(&mut self) -> Result<Option<String>>;

    /// Forcibly stop the engine and release its streams
    async fn terminate(&mut self) -> Result<()>;
}
