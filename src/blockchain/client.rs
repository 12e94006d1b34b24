//! Connection to a chain node.
//!
//! # Responsibilities
//! - Select the RPC endpoint (local fork or remote RPC + API key)
//! - Optionally trust a proxy CA certificate for all HTTP traffic
//! - Verify the node answers before handing out a connection
//! - Query chain state (balances, nonces, gas price, receipts)

use std::future::IntoFuture;
use std::time::Duration;

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::client::RpcClient;
use alloy::rpc::types::TransactionReceipt;
use alloy::transports::http::reqwest;
use alloy::transports::http::Http;
use tokio::sync::Mutex;
use tokio::time::timeout;
use url::{Host, Url};

use crate::blockchain::types::{ChainError, ChainResult};
use crate::blockchain::wallet::Wallet;
use crate::config::secrets::{CA_CERT_ENV_VAR, RPC_API_KEY_ENV_VAR};
use crate::config::{ChainConfig, Secrets};

/// How to reach the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Use `url.localhost` instead of the remote RPC.
    pub fork: bool,
    /// Route HTTP through a client that trusts `CA_CERT`.
    pub proxy: bool,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self { fork: true, proxy: false }
    }
}

/// Live connection to a chain node.
///
/// Created once per CLI invocation or test session and shared via `Arc`.
pub struct ChainConnection {
    chain: String,
    provider: DynProvider,
    rpc_url: Url,
    chain_id: u64,
    config: ChainConfig,
    secrets: Secrets,
    http: reqwest::Client,
    rpc_timeout: Duration,
    /// Held from nonce lookup until broadcast.
    pub(crate) send_lock: Mutex<()>,
}

impl ChainConnection {
    /// Load `conf/<chain>.toml` and `.env.<chain>`, then connect.
    pub async fn connect(chain: &str, options: ConnectOptions) -> ChainResult<Self> {
        let config = ChainConfig::load(chain)?;
        let secrets = Secrets::load(chain);
        Self::connect_with(chain, config, secrets, options).await
    }

    /// Connect using already-loaded configuration and secrets.
    ///
    /// Fails with [`ChainError::Connection`] if the node does not answer
    /// `eth_chainId` within the RPC timeout.
    pub async fn connect_with(
        chain: &str,
        config: ChainConfig,
        secrets: Secrets,
        options: ConnectOptions,
    ) -> ChainResult<Self> {
        let rpc_timeout = Duration::from_secs(config.rpc.timeout_secs);
        let raw_url = resolve_rpc_url(&config, &secrets, options.fork)?;
        let redacted = redact(&raw_url, secrets.rpc_api_key.as_deref());

        if options.fork {
            tracing::info!(chain, "Using local fork");
        }
        tracing::info!(rpc_url = %redacted, "RPC url");

        let rpc_url: Url = raw_url.parse().map_err(|e| ChainError::Connection {
            url: redacted.clone(),
            reason: format!("invalid URL: {}", e),
        })?;

        let http = build_http_client(&secrets, options.proxy, rpc_timeout)?;
        let provider = ProviderBuilder::new()
            .connect_client(rpc_client(&http, &rpc_url))
            .erased();

        let chain_id = match timeout(rpc_timeout, provider.get_chain_id()).await {
            Ok(Ok(id)) => id,
            Ok(Err(e)) => {
                return Err(ChainError::Connection { url: redacted, reason: e.to_string() });
            }
            Err(_) => {
                return Err(ChainError::Connection {
                    url: redacted,
                    reason: format!("no answer within {} seconds", rpc_timeout.as_secs()),
                });
            }
        };

        tracing::info!(chain, chain_id, "Connected to chain");

        Ok(Self {
            chain: chain.to_string(),
            provider,
            rpc_url,
            chain_id,
            config,
            secrets,
            http,
            rpc_timeout,
            send_lock: Mutex::new(()),
        })
    }

    /// Native asset balance in wei.
    pub async fn get_native_balance(&self, address: Address) -> ChainResult<U256> {
        self.rpc("eth_getBalance", self.provider.get_balance(address)).await
    }

    /// Next nonce of an address, counting transactions still in the mempool.
    pub async fn get_transaction_count(&self, address: Address) -> ChainResult<u64> {
        self.rpc(
            "eth_getTransactionCount",
            self.provider.get_transaction_count(address).pending(),
        )
        .await
    }

    /// Current gas price in wei.
    pub async fn get_gas_price(&self) -> ChainResult<u128> {
        self.rpc("eth_gasPrice", self.provider.get_gas_price()).await
    }

    /// Receipt of a transaction, if mined.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> ChainResult<Option<TransactionReceipt>> {
        self.rpc("eth_getTransactionReceipt", self.provider.get_transaction_receipt(tx_hash))
            .await
    }

    /// Provider that signs with `PRIVATE_KEY`; nonce, gas and chain id are
    /// filled by alloy.
    pub fn signing_provider(&self) -> ChainResult<DynProvider> {
        let wallet = Wallet::from_secrets(&self.secrets)?;
        Ok(self.provider_with_wallet(wallet.to_ethereum_wallet()))
    }

    fn provider_with_wallet(&self, wallet: EthereumWallet) -> DynProvider {
        ProviderBuilder::new()
            .wallet(wallet)
            .connect_client(rpc_client(&self.http, &self.rpc_url))
            .erased()
    }

    /// Await an RPC future with the configured timeout.
    pub(crate) async fn rpc<F, T, E>(&self, op: &str, fut: F) -> ChainResult<T>
    where
        F: IntoFuture<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        match timeout(self.rpc_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(ChainError::Rpc(format!("{} failed: {}", op, e))),
            Err(_) => Err(ChainError::Rpc(format!(
                "{} timed out after {} seconds",
                op,
                self.rpc_timeout.as_secs()
            ))),
        }
    }

    /// Read-only provider.
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// HTTP client shared with the block explorer lookups.
    pub fn http_client(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn chain(&self) -> &str {
        &self.chain
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn secrets(&self) -> &Secrets {
        &self.secrets
    }
}

impl std::fmt::Debug for ChainConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainConnection")
            .field("chain", &self.chain)
            .field("chain_id", &self.chain_id)
            .field("rpc_url", &redact(self.rpc_url.as_str(), self.secrets.rpc_api_key.as_deref()))
            .finish()
    }
}

/// Pick the endpoint: local fork, or remote RPC prefix + API key.
pub fn resolve_rpc_url(config: &ChainConfig, secrets: &Secrets, fork: bool) -> ChainResult<String> {
    if fork {
        return Ok(config.url.localhost.clone());
    }
    let api_key = secrets
        .rpc_api_key
        .as_deref()
        .ok_or(ChainError::MissingCredential(RPC_API_KEY_ENV_VAR))?;
    if config.url.rpc.is_empty() {
        return Err(ChainError::Connection {
            url: String::new(),
            reason: "url.rpc is not configured".to_string(),
        });
    }
    Ok(format!("{}{}", config.url.rpc, api_key))
}

/// Replace the API key in a URL for logging.
pub fn redact(url: &str, api_key: Option<&str>) -> String {
    match api_key {
        Some(key) if !key.is_empty() => url.replace(key, "***"),
        _ => url.to_string(),
    }
}

fn build_http_client(
    secrets: &Secrets,
    proxy: bool,
    request_timeout: Duration,
) -> ChainResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder().timeout(request_timeout);

    if proxy {
        let cert_path = secrets
            .ca_cert
            .as_ref()
            .ok_or(ChainError::MissingCredential(CA_CERT_ENV_VAR))?;
        tracing::info!(cert = %cert_path.display(), "Using certificate behind proxy");

        let pem = std::fs::read(cert_path).map_err(|e| ChainError::Connection {
            url: cert_path.display().to_string(),
            reason: format!("cannot read CA certificate: {}", e),
        })?;
        let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| ChainError::Connection {
            url: cert_path.display().to_string(),
            reason: format!("invalid CA certificate: {}", e),
        })?;
        builder = builder.add_root_certificate(cert);
    }

    builder
        .build()
        .map_err(|e| ChainError::Rpc(format!("HTTP client setup failed: {}", e)))
}

fn rpc_client(http: &reqwest::Client, url: &Url) -> RpcClient {
    RpcClient::new(Http::with_client(http.clone(), url.clone()), is_loopback(url))
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain == "localhost",
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}
