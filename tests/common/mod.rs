//! Shared fixtures for integration tests.

use std::collections::HashMap;
use std::sync::Arc;

use alloy::primitives::Address;
use serde_json::{json, Value};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use evm_toolbelt::blockchain::types::ChainResult;
use evm_toolbelt::config::{ChainConfig, Secrets};
use evm_toolbelt::{ChainConnection, ConnectOptions, ContractBinding};

/// Anvil / Hardhat account #0.
#[allow(dead_code)]
pub const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Address of [`TEST_PRIVATE_KEY`].
#[allow(dead_code)]
pub const TEST_ACCOUNT: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// Some EOA provided by Hardhat, used as the final recipient.
#[allow(dead_code)]
pub const EOA: &str = "0x976EA74026E726554dB657fA54763abd0C3a0aa9";

/// Answers JSON-RPC requests from a fixed method → result table,
/// echoing the request id.
#[allow(dead_code)]
pub struct RpcResponder {
    results: HashMap<String, Value>,
}

impl Respond for RpcResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        let id = body.get("id").cloned().unwrap_or(Value::Null);
        let rpc_method = body.get("method").and_then(Value::as_str).unwrap_or_default();

        match self.results.get(rpc_method) {
            Some(result) => ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": result,
            })),
            None => ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32601, "message": format!("method {} not mocked", rpc_method) },
            })),
        }
    }
}

/// Start a mock node answering the given JSON-RPC methods.
#[allow(dead_code)]
pub async fn start_mock_node(results: &[(&str, Value)]) -> MockServer {
    let server = MockServer::start().await;
    let results = results
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect();

    Mock::given(method("POST"))
        .respond_with(RpcResponder { results })
        .mount(&server)
        .await;

    server
}

/// Minimal config whose fork URL points at `url`.
#[allow(dead_code)]
pub fn config_for(url: &str) -> ChainConfig {
    let mut config = ChainConfig::default();
    config.url.localhost = url.to_string();
    config.url.block_explorer = format!("{}/api", url);
    config.rpc.timeout_secs = 5;
    config.transactions.receipt_timeout_secs = 5;
    config.transactions.receipt_poll_interval_ms = 50;
    config
}

/// Connect to a mock node over the fork URL.
#[allow(dead_code)]
pub async fn mock_connection(server: &MockServer, secrets: Secrets) -> Arc<ChainConnection> {
    connect_mock(config_for(&server.uri()), secrets).await
}

/// Connect with a config already pointing at a mock node.
#[allow(dead_code)]
pub async fn connect_mock(config: ChainConfig, secrets: Secrets) -> Arc<ChainConnection> {
    let connection = ChainConnection::connect_with("mock", config, secrets, ConnectOptions::default())
        .await
        .expect("mock node should accept the connection");
    Arc::new(connection)
}

/// Secrets holding only [`TEST_PRIVATE_KEY`].
#[allow(dead_code)]
pub fn signing_secrets() -> Secrets {
    Secrets {
        private_key: Some(TEST_PRIVATE_KEY.to_string()),
        ..Default::default()
    }
}

/// A mined receipt as returned by `eth_getTransactionReceipt`.
#[allow(dead_code)]
pub fn receipt(
    tx_hash: &str,
    success: bool,
    to: Option<&str>,
    contract_address: Option<&str>,
) -> Value {
    json!({
        "type": "0x0",
        "status": if success { "0x1" } else { "0x0" },
        "cumulativeGasUsed": "0x5208",
        "logs": [],
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "transactionHash": tx_hash,
        "transactionIndex": "0x0",
        "blockHash": format!("0x{}", "2".repeat(64)),
        "blockNumber": "0x1",
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0xba43b7400",
        "from": TEST_ACCOUNT,
        "to": to,
        "contractAddress": contract_address,
    })
}

/// JSON-RPC request bodies the mock node received for `rpc_method`, in order.
#[allow(dead_code)]
pub async fn rpc_calls(server: &MockServer, rpc_method: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|request| serde_json::from_slice::<Value>(&request.body).ok())
        .filter(|body| body["method"] == rpc_method)
        .collect()
}

/// ERC20 bindings used throughout the swap scenario.
#[allow(dead_code)]
pub struct Erc20Set {
    pub weth: ContractBinding,
    pub usdc: ContractBinding,
    pub usdt: ContractBinding,
}

#[allow(dead_code)]
impl Erc20Set {
    /// Bind the `[tokens]` entries of the connection's config with the bundled ERC20 ABI.
    pub fn load(connection: &Arc<ChainConnection>) -> ChainResult<Self> {
        let config = connection.config();
        Ok(Self {
            weth: ContractBinding::erc20(connection.clone(), config.token("weth")?)?,
            usdc: ContractBinding::erc20(connection.clone(), config.token("usdc")?)?,
            usdt: ContractBinding::erc20(connection.clone(), config.token("usdt")?)?,
        })
    }
}

/// State threaded through the ordered swap scenario steps.
#[allow(dead_code)]
pub struct SwapScenario {
    pub connection: Arc<ChainConnection>,
    pub account: Address,
    pub tokens: Erc20Set,
    /// Set by the deploy step; every later step depends on it.
    pub swap: Option<ContractBinding>,
}

#[allow(dead_code)]
impl SwapScenario {
    /// Connect to the `main` fork and bind the well-known tokens.
    pub async fn setup() -> ChainResult<Self> {
        evm_toolbelt::observability::logging::init(false);

        let connection = Arc::new(ChainConnection::connect("main", ConnectOptions::default()).await?);
        let secrets = connection.secrets();
        assert!(
            secrets.private_key.is_some() && secrets.account.is_some(),
            "PRIVATE_KEY and/or ACCOUNT not found"
        );
        let account = evm_toolbelt::blockchain::types::parse_address(
            secrets.account.as_deref().unwrap_or_default(),
        )?;
        let tokens = Erc20Set::load(&connection)?;

        Ok(Self {
            connection,
            account,
            tokens,
            swap: None,
        })
    }

    /// The deployed Swap contract.
    pub fn swap(&self) -> &ContractBinding {
        self.swap
            .as_ref()
            .expect("deploy step must succeed before dependent steps")
    }
}
