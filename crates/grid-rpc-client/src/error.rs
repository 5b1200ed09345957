use crate::constants::EXECUTION_REVERTED_CODE;
use crate::types::JsonRpcErrorObject;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Encountered a request error: {0}")]
    ReqwestError(#[from] reqwest::Error),
    #[error("Encountered a custom error: {0}")]
    CustomError(String),
    #[error("Invalid RPC URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("Execution reverted: {}", .reason.as_deref().unwrap_or("no reason given"))]
    Reverted { reason: Option<String> },
    #[error("Call returned no data (no contract at address or uninitialized storage)")]
    EmptyReturnData,
    #[error("Failed to ABI-decode call output: {0}")]
    AbiDecode(#[from] alloy_sol_types::Error),
    #[error("Invalid hex in response: {0}")]
    HexError(#[from] hex::FromHexError),
    #[error("Invalid quantity in response: {0}")]
    InvalidQuantity(String),
}

impl From<JsonRpcErrorObject> for ClientError {
    fn from(error: JsonRpcErrorObject) -> Self {
        if error.code == EXECUTION_REVERTED_CODE || error.message.contains("revert") {
            let reason =
                error.data.as_ref().and_then(revert_data_reason).or_else(|| message_reason(&error.message));
            return ClientError::Reverted { reason };
        }
        ClientError::Rpc { code: error.code, message: error.message }
    }
}

fn revert_data_reason(data: &serde_json::Value) -> Option<String> {
    let encoded = data.as_str()?;
    let bytes = hex::decode(encoded.trim_start_matches("0x")).ok()?;
    alloy_sol_types::decode_revert_reason(&bytes)
}

/// Extracts `reason` from node messages shaped like `execution reverted: reason`.
fn message_reason(message: &str) -> Option<String> {
    message.split_once(": ").map(|(_, reason)| reason.trim().to_string()).filter(|reason| !reason.is_empty())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn error_object(code: i64, message: &str, data: Option<serde_json::Value>) -> JsonRpcErrorObject {
        JsonRpcErrorObject { code, message: message.to_string(), data }
    }

    /// ABI encoding of `Error("cell not set")`.
    fn encoded_revert() -> String {
        let reason = b"cell not set";
        let mut out = vec![0x08, 0xc3, 0x79, 0xa0];
        let mut offset = [0u8; 32];
        offset[31] = 0x20;
        out.extend_from_slice(&offset);
        let mut len = [0u8; 32];
        len[31] = reason.len() as u8;
        out.extend_from_slice(&len);
        let mut data = [0u8; 32];
        data[..reason.len()].copy_from_slice(reason);
        out.extend_from_slice(&data);
        format!("0x{}", hex::encode(out))
    }

    #[test]
    fn revert_reason_is_decoded_from_data() {
        let error = ClientError::from(error_object(3, "execution reverted", Some(json!(encoded_revert()))));
        match error {
            ClientError::Reverted { reason: Some(reason) } => assert!(reason.contains("cell not set"), "{reason}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[rstest]
    #[case::geth_code(3, "execution reverted: locked", Some("locked"))]
    #[case::generic_code(-32000, "execution reverted: out of range", Some("out of range"))]
    #[case::bare_message(-32000, "execution reverted", None)]
    fn revert_reason_falls_back_to_message(
        #[case] code: i64,
        #[case] message: &str,
        #[case] expected: Option<&str>,
    ) {
        match ClientError::from(error_object(code, message, None)) {
            ClientError::Reverted { reason } => assert_eq!(reason.as_deref(), expected),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn other_errors_keep_code_and_message() {
        match ClientError::from(error_object(-32601, "method not found", None)) {
            ClientError::Rpc { code, message } => {
                assert_eq!(code, -32601);
                assert_eq!(message, "method not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
