//! This crate exposes account and token operations of the Hedera ledger as a
//! small JSON REST service. Each request carries its own operator credentials
//! and network selector and is turned into exactly one ledger transaction.

pub mod types; // Request-scoped commands and receipt summaries.
pub mod api; // HTTP router, handlers and request/response bodies.
pub mod validation; // Required-field and network checks.
pub mod ledger; // Ledger trait, SDK and simulated backends, key handling.
pub mod error; // API error type and the uniform error body.
pub mod config; // Defines and loads service configuration.

// Re-export commonly used types and configurations for easier access.
pub use types::*;
pub use config::Config;
pub use error::ApiError;
