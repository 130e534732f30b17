//! Error types for Motes
//!
//! The simulation itself never fails; only configuration I/O does.

use thiserror::Error;

/// The main error type for Motes operations
#[derive(Debug, Error)]
pub enum MotesError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Motes operations
pub type Result<T> = std::result::Result<T, MotesError>;
