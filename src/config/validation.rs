//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the fork endpoint is a well-formed URL
//! - Check token and router tables hold valid addresses
//! - Validate value ranges (gas limits > 0, timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ChainConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use alloy::primitives::Address;

use crate::config::schema::ChainConfig;

/// A single semantic problem found in a chain configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending key (e.g. "tokens.weth").
    pub field: String,
    /// Human readable description.
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed chain configuration.
pub fn validate_config(config: &ChainConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.url.localhost.trim().is_empty() {
        errors.push(ValidationError::new("url.localhost", "must not be empty"));
    } else if url::Url::parse(&config.url.localhost).is_err() {
        errors.push(ValidationError::new(
            "url.localhost",
            format!("'{}' is not a valid URL", config.url.localhost),
        ));
    }

    // Remote RPC and explorer may be blank for fork-only chains; they are
    // checked again when actually used.
    if !config.url.rpc.is_empty() && !config.url.rpc.starts_with("http") {
        errors.push(ValidationError::new("url.rpc", "must be an http(s) URL prefix"));
    }

    for (section, table) in [("tokens", &config.tokens), ("routers", &config.routers)] {
        for (name, address) in table {
            if address.parse::<Address>().is_err() {
                errors.push(ValidationError::new(
                    format!("{section}.{name}"),
                    format!("'{address}' is not a valid address"),
                ));
            }
        }
    }

    let tx = &config.transactions;
    if tx.transfer_gas_limit == 0 {
        errors.push(ValidationError::new("transactions.transfer_gas_limit", "must be > 0"));
    }
    if tx.deploy_gas_limit == 0 {
        errors.push(ValidationError::new("transactions.deploy_gas_limit", "must be > 0"));
    }
    if tx.receipt_timeout_secs == 0 {
        errors.push(ValidationError::new("transactions.receipt_timeout_secs", "must be > 0"));
    }
    if tx.receipt_poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "transactions.receipt_poll_interval_ms",
            "must be > 0",
        ));
    }
    if config.rpc.timeout_secs == 0 {
        errors.push(ValidationError::new("rpc.timeout_secs", "must be > 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
