//! Constants used throughout the RPC client

/// Environment variable holding the JSON-RPC endpoint URL.
pub const GRID_RPC_URL_ENV: &str = "GRID_RPC_URL";

/// Endpoint used when neither a flag nor [`GRID_RPC_URL_ENV`] provides one.
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

/// Default timeout for RPC requests in seconds.
///
/// A cell read that exceeds it fails with a transport error and is recorded as missing.
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// JSON-RPC error code used by geth-compatible nodes for `execution reverted`.
pub const EXECUTION_REVERTED_CODE: i64 = 3;
