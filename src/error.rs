//! Error types for topology construction and simulation runs

use thiserror::Error;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid topology shape: {0}")]
    InvalidTopologyShape(String),

    #[error("Invalid replication factor {0}: must be odd and between 1 and 99")]
    InvalidReplicationFactor(usize),

    #[error("Invalid failure granularity {granularity}: topology has {levels} levels")]
    InvalidGranularity { granularity: usize, levels: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}
