//! Command line front-end.
//!
//! Each command builds a [`ChainConnection`] (and a [`ContractBinding`] where
//! needed), runs one operation and yields a single output line.

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::blockchain::types::{parse_address, ChainResult};
use crate::blockchain::{ChainConnection, ConnectOptions};
use crate::contract::abi::erc20;
use crate::contract::ContractBinding;

#[derive(Debug, Parser)]
#[command(name = "evm-toolbelt")]
#[command(about = "Balance queries, transfers and deployments against an EVM chain", long_about = None)]
pub struct Cli {
    /// Chain name, selects conf/<chain>.toml and .env.<chain> (main, goerli, ...)
    #[arg(long, default_value = "main", global = true)]
    pub chain: String,

    /// Whether to use the local fork instead of the remote RPC
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set, global = true)]
    pub fork: bool,

    /// Trust the CA certificate in CA_CERT (when behind a proxy)
    #[arg(long, global = true)]
    pub proxy: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Get native chain asset balance at address
    Balance {
        #[arg(long)]
        address: String,
    },
    /// Get ERC20 token balance of address
    BalanceOf {
        /// ERC20 token address
        #[arg(short, long)]
        token: String,
        /// Address to get balance for
        #[arg(short, long)]
        address: String,
        /// Resolve the token ABI through the block explorer instead of the bundled ERC20 ABI
        #[arg(long)]
        explorer: bool,
    },
    /// Transfer native asset (whole ether) using PRIVATE_KEY
    Transfer {
        /// Address to transfer from
        #[arg(long)]
        sender: String,
        /// Address to deposit funds to
        #[arg(long)]
        to: String,
        /// Amount to transfer in ether
        #[arg(long)]
        amount: u64,
    },
    /// Compile and deploy a contract from the configured source directory
    Deploy {
        /// Contract name, e.g. Swap for contracts/Swap.sol
        #[arg(long)]
        contract: String,
        /// Deployer address (defaults to ACCOUNT)
        #[arg(long)]
        deployer: Option<String>,
        /// Gas limit for the creation transaction
        #[arg(long)]
        gas: Option<u64>,
    },
}

impl Cli {
    pub fn connect_options(&self) -> ConnectOptions {
        ConnectOptions {
            fork: self.fork,
            proxy: self.proxy,
        }
    }
}

/// Run the parsed command and return its output line.
pub async fn run(cli: &Cli) -> ChainResult<String> {
    let connection = ChainConnection::connect(&cli.chain, cli.connect_options()).await?;
    execute(&cli.command, Arc::new(connection)).await
}

/// Run a command against an existing connection.
pub async fn execute(command: &Commands, connection: Arc<ChainConnection>) -> ChainResult<String> {
    match command {
        Commands::Balance { address } => {
            let balance = connection.get_native_balance(parse_address(address)?).await?;
            Ok(format!("Native asset balance of {}: {}", address, balance))
        }
        Commands::BalanceOf {
            token,
            address,
            explorer,
        } => {
            let token_address = parse_address(token)?;
            let abi = if *explorer { None } else { Some(erc20()?) };
            let contract = ContractBinding::bind(connection, token_address, abi, None).await?;
            let balance = contract.balance_of(parse_address(address)?).await?;
            Ok(format!("ERC20 {} balance of address {}: {}", token, address, balance))
        }
        Commands::Transfer { sender, to, amount } => {
            let tx_hash = connection
                .transfer(parse_address(sender)?, parse_address(to)?, *amount)
                .await?;
            Ok(format!(
                "Transferred {} ether from {} to {}: {}",
                amount, sender, to, tx_hash
            ))
        }
        Commands::Deploy {
            contract,
            deployer,
            gas,
        } => {
            let deployer = deployer.as_deref().map(parse_address).transpose()?;
            let (address, _abi) = connection.deploy(contract, deployer, *gas).await?;
            Ok(format!("Contract {} deployed to: {}", contract, address))
        }
    }
}
