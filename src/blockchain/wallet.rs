//! Local signing key.
//!
//! # Security
//! - Private keys come only from [`Secrets`] (env / `.env.<chain>`)
//! - Keys are never logged or serialized

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::types::{ChainError, ChainResult};
use crate::config::secrets::{Secrets, PRIVATE_KEY_ENV_VAR};

/// Wallet used to sign transfers, deployments and contract transactions.
#[derive(Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> ChainResult<Self> {
        let key_hex = private_key_hex
            .trim()
            .strip_prefix("0x")
            .unwrap_or(private_key_hex.trim());

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| ChainError::Wallet(format!("Invalid private key format: {}", e)))?;

        tracing::debug!(address = %signer.address(), "Wallet loaded");

        Ok(Self { signer })
    }

    /// Load the wallet from `PRIVATE_KEY`.
    pub fn from_secrets(secrets: &Secrets) -> ChainResult<Self> {
        let private_key = secrets
            .private_key
            .as_deref()
            .ok_or(ChainError::MissingCredential(PRIVATE_KEY_ENV_VAR))?;
        Self::from_private_key(private_key)
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Wrap the signer for use with alloy's transaction builder and fillers.
    pub fn to_ethereum_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet").field("address", &self.address()).finish()
    }
}
