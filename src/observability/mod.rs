//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → logging.rs (subscriber, filter, stderr writer)
//! ```
//!
//! # Design Decisions
//! - Structured fields instead of formatted messages where practical
//! - Secrets never appear in events; RPC URLs are redacted

pub mod logging;
