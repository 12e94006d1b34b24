//! Configuration schema definitions.
//!
//! This module defines the per-chain configuration read from `conf/<chain>.toml`.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for a single chain.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ChainConfig {
    /// Endpoint URLs (local fork, remote RPC template, block explorer).
    pub url: UrlConfig,

    /// Well-known token addresses keyed by lowercase symbol (weth, usdc, ...).
    #[serde(default)]
    pub tokens: BTreeMap<String, String>,

    /// DEX router addresses keyed by venue name (uniswapv3, sushiswap, ...).
    #[serde(default)]
    pub routers: BTreeMap<String, String>,

    /// RPC transport settings.
    #[serde(default)]
    pub rpc: RpcConfig,

    /// Solidity compiler settings used by `deploy`.
    #[serde(default)]
    pub compiler: CompilerConfig,

    /// Fixed transaction parameters.
    #[serde(default)]
    pub transactions: TransactionConfig,
}

/// Endpoint URLs for a chain.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct UrlConfig {
    /// Local fork endpoint (e.g. "http://127.0.0.1:8545").
    pub localhost: String,

    /// Remote RPC URL prefix; the RPC API key is appended verbatim.
    pub rpc: String,

    /// Block explorer API endpoint (e.g. "https://api.etherscan.io/api").
    pub block_explorer: String,
}

/// RPC transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Timeout for a single RPC or explorer request in seconds.
    pub timeout_secs: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// Solidity compiler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Pinned solc version; the binary must report exactly this version.
    pub solc_version: String,

    /// Path or name of the solc binary.
    pub solc_binary: String,

    /// Directory holding `<Name>.sol` sources.
    pub source_dir: String,

    /// File with one import remapping per line.
    pub remappings_file: String,

    /// Directory of compiled build artifacts (`<Name>.sol/<Name>.json`).
    pub artifacts_dir: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            solc_version: "0.8.17".to_string(),
            solc_binary: "solc".to_string(),
            source_dir: "contracts".to_string(),
            remappings_file: "remappings.txt".to_string(),
            artifacts_dir: "out".to_string(),
        }
    }
}

/// Transaction parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransactionConfig {
    /// Gas limit for native-asset transfers.
    pub transfer_gas_limit: u64,

    /// Fixed gas price for native-asset transfers, in gwei.
    pub transfer_gas_price_gwei: u64,

    /// Default gas limit for contract deployment.
    pub deploy_gas_limit: u64,

    /// Maximum time to wait for a transaction receipt.
    pub receipt_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub receipt_poll_interval_ms: u64,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            transfer_gas_limit: 2_000_000,
            transfer_gas_price_gwei: 50,
            deploy_gas_limit: 2_000_000,
            receipt_timeout_secs: 120,
            receipt_poll_interval_ms: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_sections_default() {
        let config: ChainConfig = toml::from_str(
            r#"
            [url]
            localhost = "http://127.0.0.1:8545"
            rpc = "https://mainnet.infura.io/v3/"
            block_explorer = "https://api.etherscan.io/api"
            "#,
        )
        .unwrap();

        assert!(config.tokens.is_empty());
        assert_eq!(config.compiler.solc_version, "0.8.17");
        assert_eq!(config.transactions.transfer_gas_limit, 2_000_000);
        assert_eq!(config.transactions.transfer_gas_price_gwei, 50);
        assert_eq!(config.rpc.timeout_secs, 30);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: ChainConfig = toml::from_str(
            r#"
            [url]
            localhost = "http://127.0.0.1:8545"
            rpc = ""
            block_explorer = ""

            [transactions]
            receipt_timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.transactions.receipt_timeout_secs, 5);
        assert_eq!(config.transactions.deploy_gas_limit, 2_000_000);
    }

    #[test]
    fn test_missing_url_section_rejected() {
        let result: Result<ChainConfig, _> = toml::from_str("[tokens]\nweth = \"0x00\"\n");
        assert!(result.is_err());
    }
}
