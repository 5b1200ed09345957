//! Bounds on how many reads may be outstanding and how fast they may start.

use std::future::Future;
use std::time::Duration;

use tokio::sync::{AcquireError, Mutex, Semaphore, SemaphorePermit};
use tokio::time::Instant;

use crate::error::GridError;

/// Caps the number of reads in flight at once.
///
/// Every read holds a permit for its whole duration; the permit is released when dropped, whether the read
/// succeeded or failed.
#[derive(Debug)]
pub struct ConcurrencyLimiter {
    semaphore: Semaphore,
    max_in_flight: usize,
}

impl ConcurrencyLimiter {
    pub fn new(max_in_flight: usize) -> Result<Self, GridError> {
        if max_in_flight == 0 {
            return Err(GridError::InvalidConcurrencyLimit);
        }
        Ok(Self { semaphore: Semaphore::new(max_in_flight), max_in_flight })
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    pub fn in_flight(&self) -> usize {
        self.max_in_flight - self.semaphore.available_permits()
    }

    pub async fn acquire(&self) -> Result<SemaphorePermit<'_>, AcquireError> {
        self.semaphore.acquire().await
    }
}

/// Decides when the next read may start.
pub trait RateLimiter {
    fn acquire(&self) -> impl Future<Output = ()> + Send;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Unlimited;

impl RateLimiter for Unlimited {
    fn acquire(&self) -> impl Future<Output = ()> + Send {
        std::future::ready(())
    }
}

/// Token bucket holding up to `capacity` tokens, refilled with one token every `refill_interval`.
///
/// The bucket starts full. Waiters are served in arrival order.
#[derive(Debug)]
pub struct TokenBucket {
    capacity: u32,
    refill_interval: Duration,
    state: Mutex<BucketState>,
}

#[derive(Debug)]
struct BucketState {
    tokens: u32,
    last_refill: Instant,
}

impl TokenBucket {
    pub fn new(capacity: u32, refill_interval: Duration) -> Result<Self, GridError> {
        if capacity == 0 {
            return Err(GridError::InvalidBucketCapacity);
        }
        Ok(Self {
            capacity,
            refill_interval,
            state: Mutex::new(BucketState { tokens: capacity, last_refill: Instant::now() }),
        })
    }

    /// One read per `interval`, no bursts.
    pub fn pacing(interval: Duration) -> Self {
        let state = Mutex::new(BucketState { tokens: 1, last_refill: Instant::now() });
        Self { capacity: 1, refill_interval: interval, state }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn refill_interval(&self) -> Duration {
        self.refill_interval
    }

    fn refill(&self, state: &mut BucketState, now: Instant) {
        if self.refill_interval.is_zero() {
            state.tokens = self.capacity;
            state.last_refill = now;
            return;
        }

        let elapsed = now.saturating_duration_since(state.last_refill);
        let earned = elapsed.as_nanos() / self.refill_interval.as_nanos();
        let missing = u128::from(self.capacity - state.tokens);
        if earned >= missing {
            state.tokens = self.capacity;
            state.last_refill = now;
        } else if earned > 0 {
            // earned < capacity <= u32::MAX
            let earned = earned as u32;
            state.tokens += earned;
            state.last_refill += self.refill_interval * earned;
        }
    }
}

impl RateLimiter for TokenBucket {
    fn acquire(&self) -> impl Future<Output = ()> + Send {
        async move {
            let mut state = self.state.lock().await;
            loop {
                self.refill(&mut state, Instant::now());
                if state.tokens > 0 {
                    state.tokens -= 1;
                    return;
                }
                tokio::time::sleep_until(state.last_refill + self.refill_interval).await;
            }
        }
    }
}
