use std::fmt;
use std::future::Future;

use grid_rpc_client::{ClientError, GridContract, RawCell};

use crate::types::Position;

/// Source of single-cell reads.
pub trait CellReader {
    type Error: fmt::Display;

    fn read_cell(&self, position: Position) -> impl Future<Output = Result<RawCell, Self::Error>> + Send;
}

impl CellReader for GridContract {
    type Error = ClientError;

    fn read_cell(&self, position: Position) -> impl Future<Output = Result<RawCell, Self::Error>> + Send {
        self.get_cell(position.row as u64, position.col as u64)
    }
}
