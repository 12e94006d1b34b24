//! Transaction building, signing, broadcast and receipt waiting.
//!
//! # Responsibilities
//! - Build native transfers with fixed gas limit and gas price
//! - Build and sign contract creation transactions
//! - Broadcast signed envelopes and wait (bounded) for receipts
//!
//! Nonces are read at the `pending` block tag right before signing. Sends through one
//! [`ChainConnection`] are serialized; other processes sending from the same
//! account can still race.

use std::time::Duration;

use alloy::json_abi::JsonAbi;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::Provider;
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use tokio::time::{interval, timeout};

use crate::blockchain::client::ChainConnection;
use crate::blockchain::types::{ether_to_wei, gwei_to_wei, parse_address, ChainError, ChainResult};
use crate::blockchain::wallet::Wallet;
use crate::compiler::SolcCompiler;
use crate::config::TransactionConfig;

/// Build a legacy native-asset transfer.
pub fn build_transfer(
    params: &TransactionConfig,
    chain_id: u64,
    sender: Address,
    nonce: u64,
    to: Address,
    value: U256,
) -> TransactionRequest {
    TransactionRequest::default()
        .with_from(sender)
        .with_to(to)
        .with_value(value)
        .with_nonce(nonce)
        .with_gas_limit(params.transfer_gas_limit)
        .with_gas_price(gwei_to_wei(params.transfer_gas_price_gwei))
        .with_chain_id(chain_id)
}

/// Build a contract creation transaction.
pub fn build_deployment(
    chain_id: u64,
    deployer: Address,
    nonce: u64,
    bytecode: Bytes,
    gas_limit: u64,
    gas_price: u128,
) -> TransactionRequest {
    TransactionRequest::default()
        .with_from(deployer)
        .with_deploy_code(bytecode)
        .with_nonce(nonce)
        .with_gas_limit(gas_limit)
        .with_gas_price(gas_price)
        .with_chain_id(chain_id)
}

impl ChainConnection {
    /// Send `amount` whole ether from `sender` to `to`.
    ///
    /// Requires `PRIVATE_KEY`, and the key must belong to `sender`.
    pub async fn transfer(&self, sender: Address, to: Address, amount: u64) -> ChainResult<TxHash> {
        let wallet = Wallet::from_secrets(self.secrets())?;
        ensure_signer(&wallet, sender)?;

        let tx_hash = {
            let _guard = self.send_lock.lock().await;

            let nonce = self.get_transaction_count(sender).await?;
            tracing::info!(sender = %sender, nonce, "Nonce of sender");

            let tx = build_transfer(
                &self.config().transactions,
                self.chain_id(),
                sender,
                nonce,
                to,
                ether_to_wei(amount),
            );
            self.sign_and_send(&wallet, tx).await?
        };

        tracing::info!(tx_hash = %tx_hash, to = %to, amount_ether = amount, "Transfer sent");

        let receipt = self.wait_for_receipt(tx_hash).await?;
        ensure_success(&receipt)?;
        Ok(tx_hash)
    }

    /// Compile `contracts/<contract>.sol` and deploy it.
    ///
    /// The deployer defaults to `ACCOUNT`, then to the address of
    /// `PRIVATE_KEY`. Returns the created address and the contract ABI.
    pub async fn deploy(
        &self,
        contract: &str,
        deployer: Option<Address>,
        gas_limit: Option<u64>,
    ) -> ChainResult<(Address, JsonAbi)> {
        let wallet = Wallet::from_secrets(self.secrets())?;
        let deployer = match (deployer, self.secrets().account.as_deref()) {
            (Some(address), _) => address,
            (None, Some(account)) => parse_address(account)?,
            (None, None) => wallet.address(),
        };
        ensure_signer(&wallet, deployer)?;

        let compiled = SolcCompiler::from_config(&self.config().compiler)
            .compile(contract)
            .await?;

        let gas_price = self.get_gas_price().await?;
        let gas_limit = gas_limit.unwrap_or(self.config().transactions.deploy_gas_limit);

        let tx_hash = {
            let _guard = self.send_lock.lock().await;
            let nonce = self.get_transaction_count(deployer).await?;
            let tx = build_deployment(
                self.chain_id(),
                deployer,
                nonce,
                compiled.bytecode.clone(),
                gas_limit,
                gas_price,
            );
            self.sign_and_send(&wallet, tx).await?
        };

        let receipt = self.wait_for_receipt(tx_hash).await?;
        ensure_success(&receipt)?;

        let address = receipt.contract_address.ok_or_else(|| {
            ChainError::Reverted(format!("receipt of {} has no contract address", tx_hash))
        })?;

        tracing::info!(contract, address = %address, "Contract deployed");
        tracing::debug!(receipt = ?receipt, "Transaction receipt");

        Ok((address, compiled.abi))
    }

    /// Poll for a receipt until `receipt_timeout_secs` elapses.
    pub async fn wait_for_receipt(&self, tx_hash: TxHash) -> ChainResult<TransactionReceipt> {
        let params = &self.config().transactions;
        let limit = Duration::from_secs(params.receipt_timeout_secs);
        let poll_interval = Duration::from_millis(params.receipt_poll_interval_ms);

        let result = timeout(limit, async {
            let mut ticker = interval(poll_interval);
            loop {
                ticker.tick().await;
                match self.get_transaction_receipt(tx_hash).await? {
                    Some(receipt) => return Ok(receipt),
                    None => tracing::debug!(tx_hash = %tx_hash, "Transaction pending"),
                }
            }
        })
        .await;

        match result {
            Ok(receipt) => receipt,
            Err(_) => Err(ChainError::Timeout {
                tx_hash: tx_hash.to_string(),
                secs: params.receipt_timeout_secs,
            }),
        }
    }

    async fn sign_and_send(&self, wallet: &Wallet, tx: TransactionRequest) -> ChainResult<TxHash> {
        let envelope = tx
            .build(&wallet.to_ethereum_wallet())
            .await
            .map_err(|e| ChainError::Wallet(format!("Signing failed: {}", e)))?;

        let pending = self
            .rpc("eth_sendRawTransaction", self.provider().send_tx_envelope(envelope))
            .await?;
        Ok(*pending.tx_hash())
    }
}

fn ensure_signer(wallet: &Wallet, expected: Address) -> ChainResult<()> {
    if wallet.address() != expected {
        return Err(ChainError::Wallet(format!(
            "PRIVATE_KEY belongs to {}, not {}",
            wallet.address(),
            expected
        )));
    }
    Ok(())
}

pub(crate) fn ensure_success(receipt: &TransactionReceipt) -> ChainResult<()> {
    if !receipt.status() {
        return Err(ChainError::Reverted(receipt.transaction_hash.to_string()));
    }
    Ok(())
}
