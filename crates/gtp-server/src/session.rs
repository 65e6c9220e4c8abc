//! Engine session lifecycle
//!
//! At most one engine runs at a time. Every operation holds the same lock for
//! its whole duration, including the round-trips to the engine, so exchanges
//! never interleave on the pipes.

use gtp_bridge::{EngineLauncher, GtpAdapter, LaunchRequest};
use gtp_core::{Color, Command, GtpError, ResponseBlock, Result, Vertex};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Parameters for a new game
#[derive(Debug, Clone, PartialEq)]
pub struct GameSetup {
    pub board_size: u32,
    pub komi: f64,
    pub launch: LaunchRequest,
}

/// A fully initialized engine: spawned, piped, and board configured
struct Session {
    adapter: GtpAdapter,
}

/// Owner of the single engine session
pub struct SessionManager {
    launcher: Arc<dyn EngineLauncher>,
    command_timeout: Option<Duration>,
    session: Mutex<Option<Session>>,
}

impl SessionManager {
    pub fn new(launcher: impl EngineLauncher) -> Self {
        Self::with_launcher(Arc::new(launcher))
    }

    pub fn with_launcher(launcher: Arc<dyn EngineLauncher>) -> Self {
        Self {
            launcher,
            command_timeout: None,
            session: Mutex::new(None),
        }
    }

    /// Bound every engine exchange by `timeout`
    pub fn with_command_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Launch the engine and set up the board
    pub async fn start(&self, setup: &GameSetup) -> Result<()> {
        let mut slot = self.session.lock().await;
        if slot.is_some() {
            return Err(GtpError::AlreadyRunning);
        }

        let transport = self
            .launcher
            .launch(&setup.launch)
            .await
            .map_err(|e| match e {
                GtpError::LaunchError(_) => e,
                other => GtpError::LaunchError(other.to_string()),
            })?;
        let mut adapter = GtpAdapter::new(transport, self.command_timeout);

        let commands = [
            Command::BoardSize(setup.board_size),
            Command::Komi(setup.komi),
            Command::ClearBoard,
        ];
        for command in &commands {
            match adapter.send(command).await {
                Ok(block) if block.is_rejection() => {
                    warn!("Engine refused setup {:?}: {}", command.to_string(), block.text());
                }
                Ok(_) => {}
                Err(e) => {
                    if let Err(term) = adapter.terminate().await {
                        warn!("Failed to stop engine after setup error: {}", term);
                    }
                    return Err(GtpError::LaunchError(format!(
                        "Engine setup failed on {:?}: {}",
                        command.to_string(),
                        e
                    )));
                }
            }
        }

        *slot = Some(Session { adapter });
        info!(
            "Game started: board {}, komi {:.1}",
            setup.board_size, setup.komi
        );
        Ok(())
    }

    /// Play `vertex` for `color`, returning the engine's response text
    pub async fn play(&self, color: Color, vertex: Vertex) -> Result<String> {
        let mut slot = self.session.lock().await;
        let block = Self::exchange(&mut slot, Command::Play { color, vertex }).await?;
        if block.is_rejection() {
            return Err(GtpError::EngineRejected(block.text()));
        }
        Ok(block.text())
    }

    /// Ask the engine for a move, returning the bare move token
    pub async fn generate_move(&self, color: Color) -> Result<String> {
        let mut slot = self.session.lock().await;
        let block = Self::exchange(&mut slot, Command::GenMove(color)).await?;
        if block.is_rejection() {
            return Err(GtpError::EngineRejected(block.text()));
        }
        Ok(block.payload().to_string())
    }

    /// Quit and kill the engine if one is running. Never fails.
    pub async fn end(&self) {
        let mut slot = self.session.lock().await;
        let Some(mut session) = slot.take() else {
            return;
        };

        if let Err(e) = session.adapter.send(&Command::Quit).await {
            warn!("Engine did not acknowledge quit: {}", e);
        }
        if let Err(e) = session.adapter.terminate().await {
            warn!("Failed to stop engine: {}", e);
        }
        info!("Game ended");
    }

    /// Whether a game is running
    pub async fn is_active(&self) -> bool {
        self.session.lock().await.is_some()
    }

    /// One exchange against the active session.
    /// A fatal I/O error tears the session down so later calls are not wedged.
    async fn exchange(slot: &mut Option<Session>, command: Command) -> Result<ResponseBlock> {
        let session = slot.as_mut().ok_or(GtpError::NoActiveSession)?;
        match session.adapter.send(&command).await {
            Err(e) if e.is_fatal() => {
                error!("Engine lost during {:?}: {}; clearing session", command.to_string(), e);
                if let Some(mut dead) = slot.take() {
                    if let Err(term) = dead.adapter.terminate().await {
                        warn!("Failed to stop engine: {}", term);
                    }
                }
                Err(e)
            }
            other => other,
        }
    }
}
