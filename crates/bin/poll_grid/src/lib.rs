use std::path::{Path, PathBuf};
use std::time::Duration;

use alloy_primitives::Address;
use grid_fetcher::{
    write_grid_json, CellReader, FetchReport, FetchStrategy, GridDimensions, GridError, GridFetcher, OutputError,
    RateLimiter, TokenBucket,
};
use grid_rpc_client::{BlockId, ClientError, GridContract, RpcClient};
use log::info;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PollError {
    #[error("Could not reach RPC endpoint: {0}")]
    Connection(#[source] ClientError),
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),
    #[error("Could not write output: {0}")]
    Output(#[from] OutputError),
}

#[derive(Debug, Clone)]
pub struct PollConfig {
    pub rpc_url: String,
    pub contract: Address,
    pub output: PathBuf,
    pub dimensions: GridDimensions,
    pub strategy: FetchStrategy,
    /// Minimum spacing between the start of two reads.
    pub request_interval: Option<Duration>,
    /// Block to read at; the head block at startup when unset.
    pub block: Option<u64>,
    pub request_timeout: Duration,
}

/// Connects to the endpoint, reads the whole grid at a single block and writes it to `config.output`.
///
/// Individual cell failures are not errors: they show up as `null` in the output and in the report.
pub async fn poll_grid(config: &PollConfig) -> Result<FetchReport, PollError> {
    let client = RpcClient::try_with_timeout(&config.rpc_url, config.request_timeout).map_err(PollError::Connection)?;

    let chain_id = client.chain_id().await.map_err(PollError::Connection)?;
    let block = match config.block {
        Some(block) => block,
        None => client.block_number().await.map_err(PollError::Connection)?,
    };
    info!("Connected to chain {}, reading contract {} at block {}", chain_id, config.contract, block);

    let contract = GridContract::new(client, config.contract, BlockId::Number(block));
    let fetcher = GridFetcher::new(config.strategy)?;

    match config.request_interval {
        Some(interval) => {
            info!("Pacing reads to one every {:?}", interval);
            let fetcher = fetcher.with_rate_limiter(TokenBucket::pacing(interval));
            fetch_and_write(&contract, &fetcher, config.dimensions, &config.output).await
        }
        None => fetch_and_write(&contract, &fetcher, config.dimensions, &config.output).await,
    }
}

/// Fetches the complete grid through `reader`, then writes it to `output` in one piece.
pub async fn fetch_and_write<R: CellReader, L: RateLimiter>(
    reader: &R,
    fetcher: &GridFetcher<L>,
    dimensions: GridDimensions,
    output: &Path,
) -> Result<FetchReport, PollError> {
    let (grid, report) = fetcher.fetch(reader, dimensions).await?;
    write_grid_json(output, &grid)?;
    info!("Wrote {} grid to {}", grid.dimensions(), output.display());
    Ok(report)
}
