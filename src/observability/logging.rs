//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Honour `RUST_LOG`, falling back to a crate-level default
//!
//! # Design Decisions
//! - Logs go to stderr so command output on stdout stays a single line
//! - Level configurable via environment

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "evm_toolbelt=info";

/// Install the global subscriber. Safe to call more than once.
pub fn init(verbose: bool) {
    let default = if verbose { "evm_toolbelt=debug" } else { DEFAULT_FILTER };

    let result = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
