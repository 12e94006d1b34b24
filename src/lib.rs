//! Client-side utilities over alloy: chain connections, contract bindings,
//! Solidity deployment and a small CLI.

pub mod blockchain;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod contract;
pub mod observability;

pub use blockchain::{ChainConnection, ChainError, ConnectOptions};
pub use config::{ChainConfig, Secrets};
pub use contract::ContractBinding;
