//! # Grid Fetcher
//!
//! Reads every cell of an R×C on-chain grid and assembles a complete, position-ordered [`Grid`], with
//! failed reads kept as explicit missing markers.
//!
//! ## Modules
//!
//! - [`fetcher`] - [`GridFetcher`] and the sequential, row-batched and bounded scheduling routines
//! - [`limiter`] - Concurrency limiter and request pacing
//! - [`reader`] - The [`CellReader`] seam, implemented for the RPC-backed [`GridContract`]
//! - [`output`] - Atomic JSON output
//! - [`types`] - Grid data model
//!
//! [`GridContract`]: grid_rpc_client::GridContract

pub mod constants;
pub mod error;
pub mod fetcher;
pub mod limiter;
pub mod output;
pub mod reader;
pub mod strategy;
pub mod types;

pub use error::{CellConversionError, GridError, OutputError};
pub use fetcher::{FetchReport, GridFetcher};
pub use limiter::{ConcurrencyLimiter, RateLimiter, TokenBucket, Unlimited};
pub use output::write_grid_json;
pub use reader::CellReader;
pub use strategy::FetchStrategy;
pub use types::{Cell, Grid, GridBuilder, GridDimensions, Position};
