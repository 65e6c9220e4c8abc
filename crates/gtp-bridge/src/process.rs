//! Child-process transport
//!
//! Talks to the engine over its stdin/stdout pipes. stderr is inherited so the
//! engine's own diagnostics end up next to the server log.

use crate::transport::LineTransport;
use async_trait::async_trait;
use gtp_core::{GtpError, Result};
use std::ffi::OsStr;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info, warn};

/// Engine subprocess with piped stdin/stdout
pub struct ProcessTransport {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl ProcessTransport {
    /// Spawn `program` with `args` and take ownership of its pipes
    pub fn spawn<I, S>(program: impl AsRef<OsStr>, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let program = program.as_ref();
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                GtpError::LaunchError(format!("Failed to spawn {:?}: {}", program, e))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| GtpError::LaunchError("No stdin".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| GtpError::LaunchError("No stdout".into()))?;

        info!("Spawned engine {:?} (pid {:?})", program, child.id());

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        })
    }

    /// OS process id, `None` once the process has been reaped
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }
}

#[async_trait]
impl LineTransport for ProcessTransport {
    async fn write_line(&mut self, line: &str) -> Result<()> {
        self.stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|e| GtpError::IoFailure(format!("Write failed: {}", e)))?;
        self.stdin
            .write_all(b"\n")
            .await
            .map_err(|e| GtpError::IoFailure(format!("Write newline failed: {}", e)))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| GtpError::IoFailure(format!("Flush failed: {}", e)))?;
        Ok(())
    }

    async fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        let bytes_read = self
            .stdout
            .read_until(b'\n', &mut buf)
            .await
            .map_err(|e| GtpError::IoFailure(format!("Read failed: {}", e)))?;

        if bytes_read == 0 {
            return Ok(None);
        }
        // Engines may print non-UTF-8 diagnostics
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }

    async fn terminate(&mut self) -> Result<()> {
        let pid = self.child.id();
        if let Err(e) = self.child.start_kill() {
            // Already exited on its own (e.g. after `quit`)
            debug!("Kill of engine {:?} skipped: {}", pid, e);
        }
        match self.child.wait().await {
            Ok(status) => {
                info!("Engine {:?} exited: {}", pid, status);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to reap engine {:?}: {}", pid, e);
                Err(GtpError::IoFailure(format!("Wait failed: {}", e)))
            }
        }
    }
}
