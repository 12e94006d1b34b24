//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! conf/<chain>.toml
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → ChainConfig (validated, immutable)
//!
//! .env.<chain> + process environment
//!     → secrets.rs
//!     → Secrets (optional values, checked at point of use)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - Optional sections have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod secrets;
pub mod validation;

pub use loader::ConfigError;
pub use schema::ChainConfig;
pub use schema::CompilerConfig;
pub use schema::TransactionConfig;
pub use secrets::Secrets;
