/// Number of rows of the on-chain grid.
pub const DEFAULT_ROWS: usize = 8;

/// Number of columns of the on-chain grid.
pub const DEFAULT_COLS: usize = 8;

/// Maximum number of concurrent `getCell` requests for the bounded strategy.
///
/// Higher values increase throughput but may overwhelm the RPC server.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 4;

/// Number of cells of a row requested together by the row-batched strategy.
pub const DEFAULT_BATCH_SIZE: usize = 4;
