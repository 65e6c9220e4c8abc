//! Bridge infrastructure between Rust and a GTP engine subprocess
//!
//! This crate provides:
//! - The `LineTransport` capability that hides blocking pipe I/O
//! - A child-process transport and the launcher that spawns it
//! - The protocol adapter framing one command/response exchange
//! - A scripted transport standing in for an engine in tests

pub mod adapter;
pub mod launcher;
pub mod process;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transport;

pub use adapter::GtpAdapter;
pub use launcher::{EngineLauncher, KataGoLauncher, LaunchRequest};
pub use process::ProcessTransport;
pub use transport::LineTransport;
