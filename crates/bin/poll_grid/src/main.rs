use std::path::PathBuf;
use std::time::Duration;

use alloy_primitives::Address;
use clap::{Parser, ValueEnum};
use grid_fetcher::constants::{DEFAULT_BATCH_SIZE, DEFAULT_COLS, DEFAULT_MAX_IN_FLIGHT, DEFAULT_ROWS};
use grid_fetcher::{FetchStrategy, GridDimensions};
use grid_rpc_client::constants::{DEFAULT_REQUEST_TIMEOUT_SECONDS, DEFAULT_RPC_URL, GRID_RPC_URL_ENV};
use log::{error, info, warn};
use poll_grid::{poll_grid, PollConfig, PollError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// One read at a time
    Sequential,
    /// Fixed-size batches within each row
    RowBatched,
    /// A single in-flight limit across the whole grid
    Bounded,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Reads every cell of the on-chain grid and writes it to a JSON file")]
struct Args {
    /// RPC endpoint to read from
    #[arg(long, env = GRID_RPC_URL_ENV, default_value = DEFAULT_RPC_URL)]
    rpc_url: String,

    /// Address of the grid contract
    #[arg(long, env = "GRID_CONTRACT_ADDRESS")]
    contract: Address,

    /// Output JSON file
    #[arg(long, env = "GRID_OUTPUT", default_value = "grid.json")]
    output: PathBuf,

    #[arg(long, default_value_t = DEFAULT_ROWS)]
    rows: usize,

    #[arg(long, default_value_t = DEFAULT_COLS)]
    cols: usize,

    #[arg(long, value_enum, default_value_t = StrategyArg::Bounded)]
    strategy: StrategyArg,

    /// Maximum concurrent reads (bounded strategy)
    #[arg(long, default_value_t = DEFAULT_MAX_IN_FLIGHT)]
    max_in_flight: usize,

    /// Reads per batch (row-batched strategy)
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Pause between rows in milliseconds (row-batched strategy)
    #[arg(long)]
    row_delay_ms: Option<u64>,

    /// Minimum interval between two reads in milliseconds
    #[arg(long)]
    request_interval_ms: Option<u64>,

    /// Block number to read at (defaults to the latest block at startup)
    #[arg(long)]
    block: Option<u64>,

    /// Timeout of a single RPC request in seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECONDS)]
    timeout_secs: u64,
}

impl Args {
    fn strategy(&self) -> FetchStrategy {
        match self.strategy {
            StrategyArg::Sequential => FetchStrategy::Sequential,
            StrategyArg::RowBatched => FetchStrategy::RowBatched {
                batch_size: self.batch_size,
                row_delay: self.row_delay_ms.map(Duration::from_millis),
            },
            StrategyArg::Bounded => FetchStrategy::Bounded { max_in_flight: self.max_in_flight },
        }
    }

    fn into_config(self) -> Result<PollConfig, PollError> {
        if self.row_delay_ms.is_some() && self.strategy != StrategyArg::RowBatched {
            warn!("--row-delay-ms only applies to the row-batched strategy and is ignored");
        }
        let strategy = self.strategy();
        strategy.validate()?;

        Ok(PollConfig {
            rpc_url: self.rpc_url,
            contract: self.contract,
            output: self.output,
            dimensions: GridDimensions::new(self.rows, self.cols)?,
            strategy,
            request_interval: self.request_interval_ms.map(Duration::from_millis),
            block: self.block,
            request_timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .try_init()
        .expect("Failed to configure env_logger");
}

#[tokio::main]
async fn main() -> Result<(), Box<PollError>> {
    init_logging();

    let args = Args::parse();
    let config = args.into_config().inspect_err(|err| error!("{}", err))?;

    match poll_grid(&config).await {
        Ok(report) => {
            info!(
                "Grid written to {} ({} of {} cells missing, {:?})",
                config.output.display(),
                report.missing,
                report.attempted,
                report.elapsed
            );
            Ok(())
        }
        Err(err) => {
            error!("Failed to poll grid: {}", err);
            Err(Box::new(err))
        }
    }
}
