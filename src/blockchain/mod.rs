//! Chain access subsystem.
//!
//! # Data Flow
//! ```text
//! conf/<chain>.toml + .env.<chain>
//!     → client.rs (endpoint selection, liveness check, state queries)
//!     → wallet.rs (key loading, signing)
//!     → transaction.rs (build, sign, broadcast, receipt)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from secrets (environment or `.env.<chain>`)
//! - Never log private keys or RPC API keys
//! - All RPC calls and receipt waits have configurable timeouts

pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{ChainConnection, ConnectOptions};
pub use types::{ChainError, ChainResult};
pub use wallet::Wallet;
