use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use alloy_primitives::U256;
use grid_fetcher::{CellReader, GridDimensions, Position};
use grid_rpc_client::RawCell;

/// A deterministic response for every position.
pub fn sample_raw(position: Position) -> RawCell {
    let index = (position.row * 100 + position.col) as u64;
    RawCell {
        content: format!("cell-{}-{}", position.row, position.col),
        value: U256::from(10u64).pow(U256::from(18)) * U256::from(index + 1),
        last_updater: format!("0x{:040x}", index),
        locked_until: U256::from(1_700_000_000 + index),
    }
}

/// In-memory reader that records calls and the peak number of concurrent reads.
/// Positions without a response fail.
#[derive(Default)]
pub struct StubReader {
    responses: HashMap<Position, RawCell>,
    delays: HashMap<Position, Duration>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    calls: Mutex<Vec<Position>>,
}

impl StubReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn full(dimensions: GridDimensions) -> Self {
        let mut reader = Self::new();
        for position in dimensions.positions() {
            reader.responses.insert(position, sample_raw(position));
        }
        reader
    }

    pub fn with_response(mut self, position: Position, raw: RawCell) -> Self {
        self.responses.insert(position, raw);
        self
    }

    pub fn failing_at(mut self, position: Position) -> Self {
        self.responses.remove(&position);
        self
    }

    pub fn with_delays(mut self, dimensions: GridDimensions, delay: impl Fn(Position) -> Duration) -> Self {
        for position in dimensions.positions() {
            self.delays.insert(position, delay(position));
        }
        self
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<Position> {
        self.calls.lock().unwrap().clone()
    }
}

impl CellReader for StubReader {
    type Error = String;

    fn read_cell(&self, position: Position) -> impl Future<Output = Result<RawCell, Self::Error>> + Send {
        async move {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
            self.calls.lock().unwrap().push(position);

            let delay = self.delays.get(&position).copied().unwrap_or(Duration::from_millis(1));
            tokio::time::sleep(delay).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.responses.get(&position).cloned().ok_or_else(|| format!("execution reverted at {}", position))
        }
    }
}
