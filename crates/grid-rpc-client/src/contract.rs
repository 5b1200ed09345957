use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall};

use crate::client::RpcClient;
use crate::error::ClientError;
use crate::types::{BlockId, RawCell};

sol! {
    function getCell(uint256 row, uint256 col)
        external
        view
        returns (string content, uint256 value, address lastUpdater, uint256 lockedUntil);
}

/// Binding of the grid contract at `address`, with every read pinned to `block`.
#[derive(Clone)]
pub struct GridContract {
    client: RpcClient,
    address: Address,
    block: BlockId,
}

impl GridContract {
    pub fn new(client: RpcClient, address: Address, block: BlockId) -> Self {
        Self { client, address, block }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn block(&self) -> BlockId {
        self.block
    }

    pub async fn get_cell(&self, row: u64, col: u64) -> Result<RawCell, ClientError> {
        log::trace!("getCell({}, {}) on {} at block {}", row, col, self.address, self.block);
        let output = self.client.eth_call(self.address, &encode_get_cell(row, col), self.block).await?;
        decode_get_cell(&output)
    }
}

pub fn encode_get_cell(row: u64, col: u64) -> Vec<u8> {
    getCellCall { row: U256::from(row), col: U256::from(col) }.abi_encode()
}

pub fn decode_get_cell(output: &[u8]) -> Result<RawCell, ClientError> {
    if output.is_empty() {
        return Err(ClientError::EmptyReturnData);
    }
    let decoded = getCellCall::abi_decode_returns(output, true)?;

    Ok(RawCell {
        content: decoded.content,
        value: decoded.value,
        last_updater: decoded.lastUpdater.to_checksum(None),
        locked_until: decoded.lockedUntil,
    })
}
