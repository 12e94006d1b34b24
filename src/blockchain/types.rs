//! Chain-specific types and error definitions.

use alloy::primitives::U256;
use thiserror::Error;

use crate::config::ConfigError;

/// Wei per ether (10^18).
pub const WEI_PER_ETHER: u64 = 1_000_000_000_000_000_000;

/// Wei per gwei (10^9).
pub const WEI_PER_GWEI: u64 = 1_000_000_000;

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Chain configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The node did not answer the liveness check.
    #[error("Could not connect to {url}: {reason}")]
    Connection { url: String, reason: String },

    /// A secret required for this operation is not configured.
    #[error("{0} is not set")]
    MissingCredential(&'static str),

    /// The block explorer has no verified source for the address.
    #[error("Address {address} not verified on {explorer}")]
    AbiNotFound { address: String, explorer: String },

    /// Block explorer request or response failed.
    #[error("Block explorer error: {0}")]
    Explorer(String),

    /// ABI could not be read, parsed or used for encoding.
    #[error("ABI error: {0}")]
    Abi(String),

    /// Solidity compilation failed.
    #[error("Compile error: {0}")]
    Compile(String),

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Invalid private key format or signing error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Receipt was not available within the configured time.
    #[error("Transaction {tx_hash} not mined after {secs} seconds")]
    Timeout { tx_hash: String, secs: u64 },

    /// Transaction was reverted on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// String could not be parsed as an address.
    #[error("Invalid address '{0}'")]
    InvalidAddress(String),
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Convert whole ether to wei.
pub fn ether_to_wei(amount: u64) -> U256 {
    U256::from(amount) * U256::from(WEI_PER_ETHER)
}

/// Convert gwei to wei.
pub fn gwei_to_wei(amount: u64) -> u128 {
    amount as u128 * WEI_PER_GWEI as u128
}

/// Parse an address in any letter case.
pub fn parse_address(raw: &str) -> ChainResult<alloy::primitives::Address> {
    raw.trim()
        .parse()
        .map_err(|_| ChainError::InvalidAddress(raw.to_string()))
}
