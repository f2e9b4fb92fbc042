//! Node access for the transaction pipeline

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::types::{ChainInfo, NodeError, PushTransactionRequest};
use crate::SdkError;

/// Local nodeos default endpoint
pub const LOCAL_URL: &str = "http://127.0.0.1:8888";
/// WAX testnet endpoint
pub const WAX_TESTNET_URL: &str = "https://testnet.waxsweden.org/";
/// WAX mainnet endpoint
pub const WAX_MAINNET_URL: &str = "https://facings.waxpub.net";

/// Chain API client (object-safe)
///
/// Implementors only provide [`Net::request`]; the typed calls are built on
/// top of it. Error payloads returned by the node surface as
/// [`SdkError::Rpc`] from typed calls and unchanged from `push_transaction`.
#[async_trait]
pub trait Net: Send + Sync {
    /// POST `payload` to `/v1/chain/<endpoint>` and return the JSON body
    async fn request(&self, endpoint: &str, payload: Value) -> Result<Value, SdkError>;

    /// Chain id and last irreversible block
    async fn get_info(&self) -> Result<ChainInfo, SdkError> {
        let value = checked(self.request("get_info", json!({})).await?)?;
        deserialize_response(value)
    }

    /// Submit a signed transaction; the node's answer is returned as-is
    async fn push_transaction(&self, request: &PushTransactionRequest) -> Result<Value, SdkError> {
        self.request("push_transaction", serde_json::to_value(request)?)
            .await
    }

    /// Serialize action arguments with the contract's on-chain ABI
    async fn abi_json_to_bin(
        &self,
        account: &str,
        action: &str,
        args: Value,
    ) -> Result<Vec<u8>, SdkError> {
        let payload = json!({ "code": account, "action": action, "args": args });
        let value = checked(self.request("abi_json_to_bin", payload).await?)?;
        let binargs = value
            .get("binargs")
            .and_then(Value::as_str)
            .ok_or_else(|| SdkError::Serialization(format!("no binargs in {}", value)))?;
        Ok(hex::decode(binargs)?)
    }

    /// Deserialize action arguments with the contract's on-chain ABI
    async fn abi_bin_to_json(
        &self,
        account: &str,
        action: &str,
        bytes: &[u8],
    ) -> Result<Value, SdkError> {
        let payload = json!({ "code": account, "action": action, "binargs": hex::encode(bytes) });
        let mut value = checked(self.request("abi_bin_to_json", payload).await?)?;
        let args = value.get_mut("args").map(Value::take);
        args.ok_or_else(|| SdkError::Serialization(format!("no args in {}", value)))
    }

    /// Account details
    async fn get_account(&self, account: &str) -> Result<Value, SdkError> {
        checked(
            self.request("get_account", json!({ "account_name": account }))
                .await?,
        )
    }

    /// Contract ABI, or `None` if the account has no contract
    async fn get_abi(&self, account: &str) -> Result<Option<Value>, SdkError> {
        let value = checked(
            self.request("get_abi", json!({ "account_name": account }))
                .await?,
        )?;
        // accounts without a contract answer with only their name
        match value.get("abi") {
            Some(abi) if !abi.is_null() => Ok(Some(value)),
            _ => Ok(None),
        }
    }

    /// Block by number or id
    async fn get_block(&self, block_num_or_id: &str) -> Result<Value, SdkError> {
        checked(
            self.request("get_block", json!({ "block_num_or_id": block_num_or_id }))
                .await?,
        )
    }

    /// Lightweight block header info
    async fn get_block_info(&self, block_num: u32) -> Result<Value, SdkError> {
        checked(
            self.request("get_block_info", json!({ "block_num": block_num }))
                .await?,
        )
    }
}

/// Turn a node error payload into [`SdkError::Rpc`]
fn checked(value: Value) -> Result<Value, SdkError> {
    match NodeError::from_value(&value) {
        Some(error) => Err(SdkError::Rpc {
            code: error.code,
            message: error.describe(),
        }),
        None => Ok(value),
    }
}

/// Helper to deserialize response
pub fn deserialize_response<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, SdkError> {
    serde_json::from_value(value).map_err(|e| SdkError::Serialization(e.to_string()))
}

/// Chain id reported by the default `get_info` response
pub const MOCK_CHAIN_ID: &str = "8a34ec7df1b8cd06ff4a8abbaa7cc50300823350cadc59ab296cb00d104d2b8f";
/// Last irreversible block reported by the default `get_info` response
pub const MOCK_LIB_ID: &str = "00c35c4f7b3a1e90456a2daf3c1f7e8d9a0b4c5d6e7f8091a2b3c4d5e6f70819";

/// In-memory node for tests
///
/// Answers from canned responses keyed by endpoint. Custom responses take
/// precedence over the defaults; unknown endpoints fail with an RPC error.
/// Every request is recorded.
pub struct MockNet {
    responses: Arc<Mutex<HashMap<String, Value>>>,
    default_responses: Arc<Mutex<HashMap<String, Value>>>,
    requests: Arc<Mutex<Vec<(String, Value)>>>,
}

impl MockNet {
    /// Create a mock node with default `get_info` and `push_transaction` answers
    pub fn new() -> Self {
        let mut defaults = HashMap::new();
        defaults.insert(
            "get_info".to_string(),
            json!({
                "server_version": "mock",
                "chain_id": MOCK_CHAIN_ID,
                "head_block_num": 12803180,
                "last_irreversible_block_num": 12803151,
                "last_irreversible_block_id": MOCK_LIB_ID,
            }),
        );
        defaults.insert(
            "push_transaction".to_string(),
            json!({ "transaction_id": "", "processed": { "receipt": { "status": "executed" } } }),
        );

        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            default_responses: Arc::new(Mutex::new(defaults)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set a response for an endpoint
    pub fn set_response(&self, endpoint: &str, response: Value) {
        lock(&self.responses).insert(endpoint.to_string(), response);
    }

    /// Clear custom responses
    pub fn clear_responses(&self) {
        lock(&self.responses).clear();
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<(String, Value)> {
        lock(&self.requests).clone()
    }
}

// A poisoned lock still holds usable canned data.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Default for MockNet {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Net for MockNet {
    async fn request(&self, endpoint: &str, payload: Value) -> Result<Value, SdkError> {
        lock(&self.requests).push((endpoint.to_string(), payload));

        if let Some(response) = lock(&self.responses).get(endpoint).cloned() {
            return Ok(response);
        }
        if let Some(response) = lock(&self.default_responses).get(endpoint).cloned() {
            return Ok(response);
        }

        Err(SdkError::Rpc {
            code: 404,
            message: format!("endpoint not found: {}", endpoint),
        })
    }
}

/// HTTP client for a nodeos chain API
#[cfg(feature = "http")]
pub struct HttpNet {
    client: reqwest::Client,
    host: String,
}

#[cfg(feature = "http")]
impl HttpNet {
    /// Client for the node at `host`
    pub fn new(host: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            host: host.trim_end_matches('/').to_string(),
        }
    }

    /// Local nodeos at `127.0.0.1:8888`
    pub fn local() -> Self {
        Self::new(LOCAL_URL)
    }

    /// WAX testnet
    pub fn wax_testnet() -> Self {
        Self::new(WAX_TESTNET_URL)
    }

    /// WAX mainnet
    pub fn wax_mainnet() -> Self {
        Self::new(WAX_MAINNET_URL)
    }

    /// Client honoring the configured URL and timeout
    pub fn from_config(config: &crate::NetConfig) -> Result<Self, SdkError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| SdkError::Config(e.to_string()))?;
        Ok(Self {
            client,
            host: config.url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without trailing slash
    pub fn host(&self) -> &str {
        &self.host
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/v1/chain/{}", self.host, endpoint)
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl Net for HttpNet {
    async fn request(&self, endpoint: &str, payload: Value) -> Result<Value, SdkError> {
        let url = self.endpoint_url(endpoint);
        tracing::debug!(%url, "chain api request");

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SdkError::Connection {
                url: url.clone(),
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        // 500 carries the node's error payload
        if status > 299 && status != 500 {
            let message = response.text().await.unwrap_or_default();
            return Err(SdkError::Connection {
                url,
                status: Some(status),
                message,
            });
        }

        tracing::debug!(%url, status, "chain api response");
        response.json::<Value>().await.map_err(|e| SdkError::Connection {
            url,
            status: Some(status),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_net_default_info() {
        let net = MockNet::new();
        let info = net.get_info().await.unwrap();
        assert_eq!(info.chain_id.to_hex(), MOCK_CHAIN_ID);
        assert_eq!(info.tapos().ref_block_num, 23631);
        assert_eq!(info.tapos().ref_block_prefix, 2938989125);
    }

    #[tokio::test]
    async fn test_mock_net_custom_response() {
        let net = MockNet::new();
        net.set_response("get_account", json!({ "account_name": "user2" }));
        let account = net.get_account("user2").await.unwrap();
        assert_eq!(account["account_name"], "user2");

        net.clear_responses();
        assert!(net.get_account("user2").await.is_err());
    }

    #[tokio::test]
    async fn test_mock_net_unknown_endpoint() {
        let net = MockNet::new();
        let result = net.request("get_table_rows", json!({})).await;
        assert!(matches!(result, Err(SdkError::Rpc { code: 404, .. })));
    }

    #[tokio::test]
    async fn test_mock_net_records_requests() {
        let net = MockNet::new();
        net.set_response("get_block_info", json!({ "block_num": 7 }));
        net.get_block_info(7).await.unwrap();
        assert_eq!(
            net.requests(),
            vec![("get_block_info".to_string(), json!({ "block_num": 7 }))]
        );
    }

    #[tokio::test]
    async fn test_error_payload_becomes_rpc_error() {
        let net = MockNet::new();
        net.set_response(
            "get_info",
            json!({ "code": 500, "message": "Internal Service Error", "error": { "what": "boom" } }),
        );
        match net.get_info().await {
            Err(SdkError::Rpc { code, message }) => {
                assert_eq!(code, 500);
                assert!(message.contains("boom"));
            }
            other => panic!("expected rpc error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_abi_without_contract() {
        let net = MockNet::new();
        net.set_response("get_abi", json!({ "account_name": "user2" }));
        assert_eq!(net.get_abi("user2").await.unwrap(), None);

        net.set_response("get_abi", json!({ "account_name": "eosio", "abi": { "version": "eosio::abi/1.1" } }));
        assert!(net.get_abi("eosio").await.unwrap().is_some());
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_net_urls() {
        assert_eq!(
            HttpNet::wax_testnet().endpoint_url("get_info"),
            "https://testnet.waxsweden.org/v1/chain/get_info"
        );
        assert_eq!(
            HttpNet::local().endpoint_url("push_transaction"),
            "http://127.0.0.1:8888/v1/chain/push_transaction"
        );
        assert_eq!(HttpNet::wax_mainnet().host(), "https://facings.waxpub.net");
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_net_from_config() {
        let config = crate::NetConfig::new("http://node.example:8888/");
        let net = HttpNet::from_config(&config).unwrap();
        assert_eq!(net.host(), "http://node.example:8888");
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_http_net_unreachable() {
        // port 9 (discard) is closed on test hosts
        let net = HttpNet::new("http://127.0.0.1:9");
        assert!(matches!(
            net.get_info().await,
            Err(SdkError::Connection { .. })
        ));
    }
}
