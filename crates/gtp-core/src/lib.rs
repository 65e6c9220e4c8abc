//! # gtp-core
//!
//! Core types for driving a Go Text Protocol (GTP) engine.
//!
//! This crate provides the foundational types shared by the bridge and server:
//! - Outbound commands and their wire rendering
//! - Response block framing (success / failure markers)
//! - The error type surfaced to callers

pub mod command;
pub mod error;
pub mod response;

pub use command::{Color, Command, Vertex};
pub use error::{GtpError, Result};
pub use response::{FAILURE_MARKER, ResponseBlock, ResponseStatus, SUCCESS_MARKER};
