//! Error types shared across the crate

use thiserror::Error;

/// Errors reported by a quiz data source
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DataSourceError {
    #[error("failed to read quiz data: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode quiz data: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("quiz data has an empty question")]
    EmptyQuestion,
}

/// Errors emitted by session operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("cannot {operation} while session is {state}")]
    InvalidTransition {
        operation: &'static str,
        state: &'static str,
    },
    #[error("quiz session is no longer running")]
    Closed,
}
