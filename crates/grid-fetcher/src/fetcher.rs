use std::time::Duration;

use futures::future::join_all;
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use tokio::time::Instant;

use crate::error::GridError;
use crate::limiter::{ConcurrencyLimiter, RateLimiter, Unlimited};
use crate::reader::CellReader;
use crate::strategy::FetchStrategy;
use crate::types::{Cell, Grid, GridBuilder, GridDimensions, Position};

/// Summary of one fetch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchReport {
    pub attempted: usize,
    pub missing: usize,
    pub elapsed: Duration,
}

/// Reads every position of a grid according to a [`FetchStrategy`].
///
/// Failed reads never abort the run: they are logged with their coordinates and recorded as missing.
pub struct GridFetcher<L = Unlimited> {
    strategy: FetchStrategy,
    limiter: ConcurrencyLimiter,
    rate_limiter: L,
}

impl GridFetcher<Unlimited> {
    pub fn new(strategy: FetchStrategy) -> Result<Self, GridError> {
        strategy.validate()?;
        let limiter = ConcurrencyLimiter::new(strategy.max_in_flight())?;
        Ok(Self { strategy, limiter, rate_limiter: Unlimited })
    }
}

impl<L: RateLimiter> GridFetcher<L> {
    pub fn with_rate_limiter<M: RateLimiter>(self, rate_limiter: M) -> GridFetcher<M> {
        GridFetcher { strategy: self.strategy, limiter: self.limiter, rate_limiter }
    }

    pub fn strategy(&self) -> FetchStrategy {
        self.strategy
    }

    pub fn limiter(&self) -> &ConcurrencyLimiter {
        &self.limiter
    }

    pub async fn fetch<R: CellReader>(
        &self,
        reader: &R,
        dimensions: GridDimensions,
    ) -> Result<(Grid, FetchReport), GridError> {
        info!("Fetching {} grid ({} cells), strategy: {}", dimensions, dimensions.len(), self.strategy);
        let started = Instant::now();

        let grid = match self.strategy {
            FetchStrategy::Sequential => fetch_sequential(reader, dimensions, &self.limiter, &self.rate_limiter).await?,
            FetchStrategy::RowBatched { batch_size, row_delay } => {
                fetch_row_batched(reader, dimensions, batch_size, row_delay, &self.limiter, &self.rate_limiter).await?
            }
            FetchStrategy::Bounded { .. } => {
                fetch_bounded(reader, dimensions, &self.limiter, &self.rate_limiter).await?
            }
        };

        let report =
            FetchReport { attempted: dimensions.len(), missing: grid.missing_count(), elapsed: started.elapsed() };
        info!("Fetched {} cells in {:?}, {} missing", report.attempted, report.elapsed, report.missing);
        Ok((grid, report))
    }
}

/// Reads `position` under both limiters. Any failure is logged and turned into the missing marker.
async fn read_position<R: CellReader, L: RateLimiter>(
    reader: &R,
    limiter: &ConcurrencyLimiter,
    rate_limiter: &L,
    position: Position,
) -> Option<Cell> {
    let _permit = match limiter.acquire().await {
        Ok(permit) => permit,
        Err(e) => {
            warn!("Skipping cell {}: concurrency limiter unavailable: {}", position, e);
            return None;
        }
    };
    rate_limiter.acquire().await;

    debug!("Reading cell {} ({} in flight)", position, limiter.in_flight());
    let raw = match reader.read_cell(position).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Failed to read cell {}: {}", position, e);
            return None;
        }
    };

    match Cell::try_from(raw) {
        Ok(cell) => Some(cell),
        Err(e) => {
            warn!("Discarding cell {}: {}", position, e);
            None
        }
    }
}

pub async fn fetch_sequential<R: CellReader, L: RateLimiter>(
    reader: &R,
    dimensions: GridDimensions,
    limiter: &ConcurrencyLimiter,
    rate_limiter: &L,
) -> Result<Grid, GridError> {
    let mut builder = GridBuilder::new(dimensions);
    for position in dimensions.positions() {
        let cell = read_position(reader, limiter, rate_limiter, position).await;
        builder.record(position, cell)?;
    }
    builder.finish()
}

pub async fn fetch_row_batched<R: CellReader, L: RateLimiter>(
    reader: &R,
    dimensions: GridDimensions,
    batch_size: usize,
    row_delay: Option<Duration>,
    limiter: &ConcurrencyLimiter,
    rate_limiter: &L,
) -> Result<Grid, GridError> {
    if batch_size == 0 {
        return Err(GridError::InvalidConcurrencyLimit);
    }

    let mut builder = GridBuilder::new(dimensions);
    for row in 0..dimensions.rows() {
        if let Some(delay) = row_delay.filter(|_| row > 0) {
            debug!("Pausing {:?} before row {}", delay, row);
            tokio::time::sleep(delay).await;
        }

        let positions: Vec<Position> = (0..dimensions.cols()).map(|col| Position::new(row, col)).collect();
        for batch in positions.chunks(batch_size) {
            let cells = join_all(batch.iter().map(|&position| read_position(reader, limiter, rate_limiter, position)))
                .await;
            for (&position, cell) in batch.iter().zip(cells) {
                builder.record(position, cell)?;
            }
        }
    }
    builder.finish()
}

/// Schedules every position against `limiter`. Results are placed by position, so completion order does
/// not affect the layout.
pub async fn fetch_bounded<R: CellReader, L: RateLimiter>(
    reader: &R,
    dimensions: GridDimensions,
    limiter: &ConcurrencyLimiter,
    rate_limiter: &L,
) -> Result<Grid, GridError> {
    let results: Vec<(Position, Option<Cell>)> = stream::iter(dimensions.positions())
        .map(|position| async move { (position, read_position(reader, limiter, rate_limiter, position).await) })
        .buffer_unordered(limiter.max_in_flight())
        .collect()
        .await;

    let mut builder = GridBuilder::new(dimensions);
    for (position, cell) in results {
        builder.record(position, cell)?;
    }
    builder.finish()
}
