//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while mapping stats to or from the wire schema
#[derive(Error, Debug)]
pub enum WireError {
    #[error("cannot serialize empty performance stats")]
    EmptyStats,

    #[error("failed to encode wire message: {0}")]
    Encode(#[source] bincode::Error),

    #[error("failed to decode wire message: {0}")]
    Decode(#[source] bincode::Error),
}

/// Errors that can occur reading or writing output files
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("invalid output path: {0}")]
    InvalidPath(String),
}
