//! Block explorer `getabi` client (Etherscan-compatible API).

use alloy::json_abi::JsonAbi;
use alloy::primitives::Address;
use alloy::transports::http::reqwest;
use serde::Deserialize;
use url::Url;

use crate::blockchain::types::{ChainError, ChainResult};
use crate::config::secrets::BLOCK_EXPLORER_API_KEY_ENV_VAR;
use crate::contract::abi::parse_abi;

/// Result text the explorer returns for contracts without verified source.
pub const NOT_VERIFIED: &str = "Contract source code not verified";

#[derive(Debug, Deserialize)]
struct ExplorerResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    result: String,
}

/// Client for a block explorer API.
#[derive(Debug, Clone)]
pub struct BlockExplorer {
    http: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl BlockExplorer {
    pub fn new(http: reqwest::Client, url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            url: url.into(),
            api_key,
        }
    }

    /// Fetch the verified ABI of `address`.
    ///
    /// Fails with [`ChainError::MissingCredential`] before any request when no
    /// API key is configured. Proxy contracts (e.g. USDC) return the proxy's
    /// ABI, so pass those explicitly.
    pub async fn fetch_abi(&self, address: Address) -> ChainResult<JsonAbi> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ChainError::MissingCredential(BLOCK_EXPLORER_API_KEY_ENV_VAR))?;

        tracing::info!(address = %address, explorer = %self.url, "Getting contract ABI from block explorer");

        let address_str = address.to_checksum(None);
        let request_url = Url::parse_with_params(
            &self.url,
            [
                ("module", "contract"),
                ("action", "getabi"),
                ("address", address_str.as_str()),
                ("apikey", api_key),
            ],
        )
        .map_err(|e| ChainError::Explorer(format!("invalid explorer URL {}: {}", self.url, e)))?;
        let response = self
            .http
            .get(request_url)
            .send()
            .await
            .map_err(|e| ChainError::Explorer(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChainError::Explorer(format!("{} returned status {}", self.url, status)));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ChainError::Explorer(format!("unreadable response: {}", e)))?;
        let body: ExplorerResponse = serde_json::from_str(&text)
            .map_err(|e| ChainError::Explorer(format!("unreadable response: {}", e)))?;

        if body.result == NOT_VERIFIED {
            return Err(ChainError::AbiNotFound {
                address: address_str,
                explorer: self.url.clone(),
            });
        }
        if body.status.as_deref() == Some("0") {
            return Err(ChainError::Explorer(format!(
                "{}: {}",
                body.message.unwrap_or_default(),
                body.result
            )));
        }

        parse_abi(&body.result)
    }
}
