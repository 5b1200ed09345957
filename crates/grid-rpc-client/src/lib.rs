//! # Grid RPC Client
//!
//! A thin JSON-RPC client for reading the on-chain grid contract through `eth_call`.
//!
//! ## Modules
//!
//! - [`client`] - HTTP JSON-RPC client (`eth_chainId`, `eth_blockNumber`, `eth_call`)
//! - [`contract`] - ABI binding for the grid contract's `getCell(uint256,uint256)` accessor
//! - [`error`] - Error types returned by the client
//! - [`types`] - Request/response types shared with callers
//!
//! ## Usage
//!
//! ```rust,no_run
//! use grid_rpc_client::{BlockId, GridContract, RpcClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RpcClient::try_new("http://localhost:8545")?;
//!     let block = BlockId::Number(client.block_number().await?);
//!
//!     let contract = GridContract::new(client, "0x5FbDB2315678afecb367f032d93F642f64180aa3".parse()?, block);
//!     let cell = contract.get_cell(0, 0).await?;
//!     println!("{} -> {}", cell.content, cell.value);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod constants;
pub mod contract;
pub mod error;
mod jsonrpc;
pub mod types;

pub use client::RpcClient;
pub use contract::GridContract;
pub use error::ClientError;
pub use types::{BlockId, RawCell};
