//! Engine launchers
//!
//! The session manager asks a launcher for a fresh transport on every game
//! start. Production code spawns KataGo; tests hand out scripted transports.

use crate::process::ProcessTransport;
use crate::transport::LineTransport;
use async_trait::async_trait;
use gtp_core::Result;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::info;

/// Caller-supplied engine files for one game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    /// Neural network model file
    pub model: PathBuf,
    /// Engine configuration file
    pub config: PathBuf,
}

/// Creates a connected transport for a new engine instance
#[async_trait]
pub trait EngineLauncher: Send + Sync + 'static {
    async fn launch(&self, request: &LaunchRequest) -> Result<Box<dyn LineTransport>>;
}

/// Spawns `<program> gtp -model <model> -config <config>`
#[derive(Debug, Clone)]
pub struct KataGoLauncher {
    program: PathBuf,
}

impl KataGoLauncher {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Command-line arguments for a launch
    pub fn args(request: &LaunchRequest) -> Vec<OsString> {
        vec![
            "gtp".into(),
            "-model".into(),
            request.model.clone().into_os_string(),
            "-config".into(),
            request.config.clone().into_os_string(),
        ]
    }
}

impl Default for KataGoLauncher {
    fn default() -> Self {
        Self::new("./katago")
    }
}

#[async_trait]
impl EngineLauncher for KataGoLauncher {
    async fn launch(&self, request: &LaunchRequest) -> Result<Box<dyn LineTransport>> {
        info!(
            "Launching {:?} with model {:?}, config {:?}",
            self.program, request.model, request.config
        );
        let transport = ProcessTransport::spawn(&self.program, Self::args(request))?;
        Ok(Box::new(transport))
    }
}
