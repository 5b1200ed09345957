use std::fmt;
use std::time::Duration;

use crate::constants::DEFAULT_MAX_IN_FLIGHT;
use crate::error::GridError;

/// How reads are scheduled across the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    /// One read at a time, row-major.
    Sequential,
    /// Each row is read in consecutive batches of `batch_size` concurrent reads. Every batch completes
    /// before the next one starts, and `row_delay` (if any) is slept between rows.
    RowBatched { batch_size: usize, row_delay: Option<Duration> },
    /// All positions are scheduled against one limiter allowing `max_in_flight` reads at once,
    /// regardless of row boundaries.
    Bounded { max_in_flight: usize },
}

impl FetchStrategy {
    /// Upper bound on concurrently outstanding reads under this strategy.
    pub fn max_in_flight(&self) -> usize {
        match self {
            FetchStrategy::Sequential => 1,
            FetchStrategy::RowBatched { batch_size, .. } => *batch_size,
            FetchStrategy::Bounded { max_in_flight } => *max_in_flight,
        }
    }

    pub fn validate(&self) -> Result<(), GridError> {
        if self.max_in_flight() == 0 {
            return Err(GridError::InvalidConcurrencyLimit);
        }
        Ok(())
    }
}

impl Default for FetchStrategy {
    fn default() -> Self {
        FetchStrategy::Bounded { max_in_flight: DEFAULT_MAX_IN_FLIGHT }
    }
}

impl fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStrategy::Sequential => f.write_str("sequential"),
            FetchStrategy::RowBatched { batch_size, row_delay: Some(delay) } => {
                write!(f, "row-batched (batch size {}, {:?} between rows)", batch_size, delay)
            }
            FetchStrategy::RowBatched { batch_size, row_delay: None } => {
                write!(f, "row-batched (batch size {})", batch_size)
            }
            FetchStrategy::Bounded { max_in_flight } => write!(f, "bounded (max {} in flight)", max_in_flight),
        }
    }
}
