use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::constants::DEFAULT_REQUEST_TIMEOUT_SECONDS;
use crate::error::ClientError;
use crate::jsonrpc::post_jsonrpc_request;
use crate::types::BlockId;

struct RpcClientInner {
    /// A raw client, shared by every request issued through this handle.
    http_client: reqwest::Client,
    /// The JSON-RPC endpoint.
    rpc_url: Url,
}

/// Cheaply cloneable handle to a JSON-RPC endpoint.
#[derive(Clone)]
pub struct RpcClient {
    inner: Arc<RpcClientInner>,
}

impl RpcClient {
    pub fn try_new(rpc_url: &str) -> Result<Self, ClientError> {
        Self::try_with_timeout(rpc_url, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECONDS))
    }

    pub fn try_with_timeout(rpc_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let url = Url::parse(rpc_url)
            .map_err(|e| ClientError::InvalidUrl { url: rpc_url.to_string(), reason: e.to_string() })?;
        log::info!("RPC URL: {}", url);
        let http_client = reqwest::ClientBuilder::new().timeout(timeout).build()?;

        Ok(Self { inner: Arc::new(RpcClientInner { http_client, rpc_url: url }) })
    }

    pub fn url(&self) -> &str {
        self.inner.rpc_url.as_str()
    }

    async fn request<T: DeserializeOwned>(&self, method: &str, params: serde_json::Value) -> Result<T, ClientError> {
        post_jsonrpc_request(&self.inner.http_client, self.url(), method, params).await
    }

    pub async fn chain_id(&self) -> Result<u64, ClientError> {
        let quantity: String = self.request("eth_chainId", json!([])).await?;
        parse_quantity(&quantity)
    }

    pub async fn block_number(&self) -> Result<u64, ClientError> {
        let quantity: String = self.request("eth_blockNumber", json!([])).await?;
        parse_quantity(&quantity)
    }

    /// Executes a read-only call against `to` and returns the raw output bytes.
    pub async fn eth_call(&self, to: Address, calldata: &[u8], block: BlockId) -> Result<Vec<u8>, ClientError> {
        let params = json!([
            { "to": to.to_checksum(None), "data": format!("0x{}", hex::encode(calldata)) },
            block,
        ]);
        let output: String = self.request("eth_call", params).await?;
        Ok(hex::decode(output.trim_start_matches("0x"))?)
    }
}

/// Parses a JSON-RPC hex quantity such as `0x1a`.
pub fn parse_quantity(quantity: &str) -> Result<u64, ClientError> {
    let digits = quantity.strip_prefix("0x").ok_or_else(|| ClientError::InvalidQuantity(quantity.to_string()))?;
    u64::from_str_radix(digits, 16).map_err(|_| ClientError::InvalidQuantity(quantity.to_string()))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::constants::GRID_RPC_URL_ENV;

    #[rstest]
    #[case("0x0", 0)]
    #[case("0x1a", 26)]
    #[case("0xaa36a7", 11155111)]
    fn parses_quantities(#[case] quantity: &str, #[case] expected: u64) {
        assert_eq!(parse_quantity(quantity).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("0x")]
    #[case("26")]
    #[case("0xzz")]
    fn rejects_malformed_quantities(#[case] quantity: &str) {
        assert!(matches!(parse_quantity(quantity), Err(ClientError::InvalidQuantity(_))));
    }

    #[test]
    fn rejects_invalid_url() {
        assert!(matches!(RpcClient::try_new("not a url"), Err(ClientError::InvalidUrl { .. })));
    }

    #[test]
    fn keeps_endpoint_url() {
        let client = RpcClient::try_new("http://localhost:8545").unwrap();
        assert_eq!(client.url(), "http://localhost:8545/");
    }

    #[tokio::test]
    #[ignore = "Requires a running JSON-RPC node"]
    async fn test_real_chain_id() {
        let rpc_url = std::env::var(GRID_RPC_URL_ENV)
            .unwrap_or_else(|_| panic!("Missing RPC URL from ENV: {} environment variable is not set", GRID_RPC_URL_ENV));
        let client = RpcClient::try_new(&rpc_url).expect("Failed to create RPC client");

        let chain_id = client.chain_id().await.expect("eth_chainId failed");
        let block_number = client.block_number().await.expect("eth_blockNumber failed");
        println!("chain id {chain_id}, head at block {block_number}");
    }
}
