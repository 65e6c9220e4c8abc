//! Scripted stand-ins for an engine process
//!
//! `ScriptedTransport` answers each written command through a responder
//! closure and records everything it was sent. `ScriptedLauncher` hands out a
//! fresh scripted transport per launch.

use crate::launcher::{EngineLauncher, LaunchRequest};
use crate::transport::LineTransport;
use async_trait::async_trait;
use gtp_core::{GtpError, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

type Responder = Box<dyn FnMut(&str) -> Option<String> + Send>;
type SharedResponder = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Default)]
struct TranscriptState {
    sent: Vec<String>,
    terminated: bool,
}

/// Shared record of what a scripted transport observed
#[derive(Debug, Clone, Default)]
pub struct Transcript(Arc<Mutex<TranscriptState>>);

impl Transcript {
    /// Command lines written, without their newline
    pub fn sent(&self) -> Vec<String> {
        lock(&self.0).sent.clone()
    }

    /// Whether `terminate` was called
    pub fn terminated(&self) -> bool {
        lock(&self.0).terminated
    }
}

/// In-memory engine transport
pub struct ScriptedTransport {
    responder: Responder,
    pending: VecDeque<String>,
    silent: bool,
    /// Stop answering once a command with this prefix is written
    hang_on: Option<String>,
    transcript: Transcript,
}

impl ScriptedTransport {
    /// Answer each command with `responder(command)`.
    /// A `None` answer behaves like the engine closing its output.
    pub fn new<F>(responder: F) -> (Self, Transcript)
    where
        F: FnMut(&str) -> Option<String> + Send + 'static,
    {
        let transcript = Transcript::default();
        let transport = Self {
            responder: Box::new(responder),
            pending: VecDeque::new(),
            silent: false,
            hang_on: None,
            transcript: transcript.clone(),
        };
        (transport, transcript)
    }

    /// Answer commands with `replies` in order, then hit EOF
    pub fn replies<I, S>(replies: I) -> (Self, Transcript)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut queue: VecDeque<String> = replies.into_iter().map(Into::into).collect();
        Self::new(move |_| queue.pop_front())
    }

    /// Accept commands but never answer
    pub fn silent() -> (Self, Transcript) {
        let (mut transport, transcript) = Self::new(|_| None);
        transport.silent = true;
        (transport, transcript)
    }

    /// Go silent from the first command starting with `prefix` on
    pub fn hang_on(mut self, prefix: impl Into<String>) -> Self {
        self.hang_on = Some(prefix.into());
        self
    }
}

#[async_trait]
impl LineTransport for ScriptedTransport {
    async fn write_line(&mut self, line: &str) -> Result<()> {
        if lock(&self.transcript.0).terminated {
            return Err(GtpError::IoFailure("Broken pipe".into()));
        }
        lock(&self.transcript.0).sent.push(line.to_string());

        if self
            .hang_on
            .as_deref()
            .is_some_and(|prefix| line.starts_with(prefix))
        {
            self.silent = true;
        }

        if !self.silent {
            if let Some(reply) = (self.responder)(line) {
                self.pending
                    .extend(reply.split_inclusive('\n').map(str::to_string));
            }
        }
        Ok(())
    }

    async fn read_line(&mut self) -> Result<Option<String>> {
        if let Some(line) = self.pending.pop_front() {
            return Ok(Some(line));
        }
        if self.silent {
            std::future::pending::<()>().await;
        }
        Ok(None)
    }

    async fn terminate(&mut self) -> Result<()> {
        lock(&self.transcript.0).terminated = true;
        Ok(())
    }
}

/// Minimal Go engine: accepts setup, plays legal-looking vertices, and
/// always generates `Q16`
pub fn go_engine(command: &str) -> Option<String> {
    let mut parts = command.split_whitespace();
    let reply = match parts.next() {
        Some("boardsize" | "komi" | "clear_board" | "quit") => "=\n\n",
        Some("play") => match parts.nth(1) {
            Some(vertex) if is_vertex(vertex) => "=\n\n",
            _ => "? illegal move\n\n",
        },
        Some("genmove") => "= Q16\n\n",
        _ => "? unknown command\n\n",
    };
    Some(reply.to_string())
}

fn is_vertex(token: &str) -> bool {
    if token.eq_ignore_ascii_case("pass") {
        return true;
    }
    let mut chars = token.chars();
    let column = chars.next().map(|c| c.to_ascii_lowercase());
    let row: Option<u32> = chars.as_str().parse().ok();
    matches!(column, Some('a'..='t')) && column != Some('i') && matches!(row, Some(1..=19))
}

/// Launcher handing out scripted transports
pub struct ScriptedLauncher {
    responder: Option<SharedResponder>,
    hang_on: Option<String>,
    launches: Mutex<Vec<LaunchRequest>>,
    transcripts: Mutex<Vec<Transcript>>,
}

impl ScriptedLauncher {
    /// Every launched engine answers through `responder`
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            responder: Some(Arc::new(responder)),
            hang_on: None,
            launches: Mutex::new(Vec::new()),
            transcripts: Mutex::new(Vec::new()),
        }
    }

    /// Launcher whose engines behave like `go_engine`
    pub fn go_engine() -> Self {
        Self::new(go_engine)
    }

    /// Launcher that fails every launch
    pub fn failing() -> Self {
        Self {
            responder: None,
            hang_on: None,
            launches: Mutex::new(Vec::new()),
            transcripts: Mutex::new(Vec::new()),
        }
    }

    /// Launched engines stop answering at the first command starting with `prefix`
    pub fn hanging_on(mut self, prefix: impl Into<String>) -> Self {
        self.hang_on = Some(prefix.into());
        self
    }

    /// Launch requests received, in order
    pub fn launches(&self) -> Vec<LaunchRequest> {
        lock(&self.launches).clone()
    }

    /// Transcripts of launched engines, in launch order
    pub fn transcripts(&self) -> Vec<Transcript> {
        lock(&self.transcripts).clone()
    }
}

#[async_trait]
impl EngineLauncher for ScriptedLauncher {
    async fn launch(&self, request: &LaunchRequest) -> Result<Box<dyn LineTransport>> {
        lock(&self.launches).push(request.clone());
        let responder = self
            .responder
            .clone()
            .ok_or_else(|| GtpError::LaunchError("No such file or directory".into()))?;

        let (mut transport, transcript) = ScriptedTransport::new(move |line| responder(line));
        if let Some(prefix) = &self.hang_on {
            transport = transport.hang_on(prefix.clone());
        }
        lock(&self.transcripts).push(transcript);
        Ok(Box::new(transport))
    }
}
