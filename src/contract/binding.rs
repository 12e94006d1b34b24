//! A deployed contract bound to its ABI and a chain connection.

use std::path::Path;
use std::sync::Arc;

use alloy::contract::{ContractInstance, Interface};
use alloy::dyn_abi::DynSolValue;
use alloy::json_abi::JsonAbi;
use alloy::network::Ethereum;
use alloy::primitives::{Address, TxHash, U256};

use crate::blockchain::client::ChainConnection;
use crate::blockchain::transaction::ensure_success;
use crate::blockchain::types::{ChainError, ChainResult};
use crate::contract::abi::{artifact_path, erc20, load_artifact_abi};
use crate::contract::explorer::BlockExplorer;

/// Contract at a fixed address with a resolved ABI.
///
/// The ABI is resolved once in [`ContractBinding::bind`] and never changes.
#[derive(Clone)]
pub struct ContractBinding {
    address: Address,
    interface: Interface,
    connection: Arc<ChainConnection>,
}

impl ContractBinding {
    /// Bind `address`, resolving the ABI in this order:
    /// 1. `abi` if given
    /// 2. the local artifact `<artifacts_dir>/<Name>.sol/<Name>.json` if `artifact` is given
    /// 3. the block explorer
    pub async fn bind(
        connection: Arc<ChainConnection>,
        address: Address,
        abi: Option<JsonAbi>,
        artifact: Option<&str>,
    ) -> ChainResult<Self> {
        let abi = match (abi, artifact) {
            (Some(abi), _) => abi,
            (None, Some(name)) => {
                let dir = Path::new(&connection.config().compiler.artifacts_dir);
                load_artifact_abi(&artifact_path(dir, name))?
            }
            (None, None) => {
                let explorer = BlockExplorer::new(
                    connection.http_client().clone(),
                    connection.config().url.block_explorer.clone(),
                    connection.secrets().block_explorer_api_key.clone(),
                );
                explorer.fetch_abi(address).await?
            }
        };

        Ok(Self::with_abi(connection, address, abi))
    }

    /// Bind with a known ABI; never touches disk or network.
    pub fn with_abi(connection: Arc<ChainConnection>, address: Address, abi: JsonAbi) -> Self {
        tracing::debug!(address = %address, "Contract bound");
        Self {
            address,
            interface: Interface::new(abi),
            connection,
        }
    }

    /// Bind a token with the bundled ERC20 ABI.
    pub fn erc20(connection: Arc<ChainConnection>, address: Address) -> ChainResult<Self> {
        Ok(Self::with_abi(connection, address, erc20()?))
    }

    /// Read-only call (`eth_call`).
    pub async fn call(&self, function: &str, args: &[DynSolValue]) -> ChainResult<Vec<DynSolValue>> {
        let instance = ContractInstance::<_, Ethereum>::new(
            self.address,
            self.connection.provider().clone(),
            self.interface.clone(),
        );
        let call = instance
            .function(function, args)
            .map_err(|e| ChainError::Abi(format!("{}: {}", function, e)))?;

        self.connection.rpc(function, call.call()).await
    }

    /// State-mutating call, signed with `PRIVATE_KEY`.
    ///
    /// Waits for the receipt; a reverted transaction is an error.
    pub async fn transact(&self, function: &str, args: &[DynSolValue]) -> ChainResult<TxHash> {
        let provider = self.connection.signing_provider()?;
        let instance =
            ContractInstance::<_, Ethereum>::new(self.address, provider, self.interface.clone());
        let call = instance
            .function(function, args)
            .map_err(|e| ChainError::Abi(format!("{}: {}", function, e)))?;

        let tx_hash = {
            let _guard = self.connection.send_lock.lock().await;
            let pending = self.connection.rpc(function, call.send()).await?;
            *pending.tx_hash()
        };

        tracing::info!(contract = %self.address, function, tx_hash = %tx_hash, "Transaction sent");

        let receipt = self.connection.wait_for_receipt(tx_hash).await?;
        ensure_success(&receipt)?;
        Ok(tx_hash)
    }

    /// ERC20 `balanceOf(holder)`.
    pub async fn balance_of(&self, holder: Address) -> ChainResult<U256> {
        let output = self.call("balanceOf", &[DynSolValue::Address(holder)]).await?;
        first_uint(&output, "balanceOf")
    }

    /// `owner()` of an Ownable contract.
    pub async fn owner(&self) -> ChainResult<Address> {
        let output = self.call("owner", &[]).await?;
        output
            .first()
            .and_then(DynSolValue::as_address)
            .ok_or_else(|| ChainError::Abi("owner() did not return an address".to_string()))
    }

    /// Names of the callable functions.
    pub fn functions(&self) -> Vec<&str> {
        self.interface.abi().functions.keys().map(String::as_str).collect()
    }

    /// Address, rendered checksummed by `Display`.
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn abi(&self) -> &JsonAbi {
        self.interface.abi()
    }
}

impl std::fmt::Debug for ContractBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractBinding")
            .field("address", &self.address)
            .field("functions", &self.functions())
            .finish()
    }
}

fn first_uint(output: &[DynSolValue], function: &str) -> ChainResult<U256> {
    output
        .first()
        .and_then(DynSolValue::as_uint)
        .map(|(value, _bits)| value)
        .ok_or_else(|| ChainError::Abi(format!("{}() did not return a uint", function)))
}
