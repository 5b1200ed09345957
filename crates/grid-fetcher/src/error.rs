use std::path::PathBuf;

use alloy_primitives::U256;
use thiserror::Error;

use crate::types::Position;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("Grid dimensions must be non-zero, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("Concurrency limit must be at least 1")]
    InvalidConcurrencyLimit,
    #[error("Token bucket capacity must be at least 1")]
    InvalidBucketCapacity,
    #[error("Position {0} is outside the grid")]
    OutOfBounds(Position),
    #[error("Position {0} was recorded twice")]
    AlreadyRecorded(Position),
    #[error("Position {0} was never resolved")]
    Unresolved(Position),
}

#[derive(Debug, Error)]
pub enum CellConversionError {
    #[error("lockedUntil {0} does not fit in 64 bits")]
    LockedUntilOverflow(U256),
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize grid: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
}
