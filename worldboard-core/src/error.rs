//! Error types for worldboard.

use thiserror::Error;

/// Errors that can occur in worldboard operations.
#[derive(Error, Debug)]
pub enum WorldboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Failed to fetch {0}: {1}")]
    Fetch(String, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid calendar cell: {0}")]
    InvalidCell(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for worldboard operations.
pub type WorldboardResult<T> = Result<T, WorldboardError>;
