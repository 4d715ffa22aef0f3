// Error types for the collection core

use std::time::Duration;

/// Per-container stats fetch failure. Recorded in that container's snapshot only.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("stats fetch timed out after {0:?}")]
    Timeout(Duration),
    #[error("stats fetch cancelled")]
    Cancelled,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed stats response: {0}")]
    Decode(String),
}

/// Container listing failure (daemon unreachable, API error).
#[derive(Debug, thiserror::Error)]
#[error("container list failed: {0}")]
pub struct ListError(pub String);

/// Batch-fatal error for one collection cycle.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error(transparent)]
    List(#[from] ListError),
    #[error("collection cancelled before containers were listed")]
    Cancelled,
}
