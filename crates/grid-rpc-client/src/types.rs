use std::fmt;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize, Serializer};

/// Block a read is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockId {
    #[default]
    Latest,
    Number(u64),
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockId::Latest => f.write_str("latest"),
            BlockId::Number(number) => write!(f, "{:#x}", number),
        }
    }
}

impl Serialize for BlockId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The `getCell` return tuple as decoded from the wire, before any narrowing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCell {
    pub content: String,
    pub value: U256,
    /// Address of the last writer, EIP-55 checksummed when read from a node.
    pub last_updater: String,
    pub locked_until: U256,
}

/// The `error` member of a JSON-RPC 2.0 response.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}
