//! Ledger Module
//!
//! This module is the seam between the HTTP handlers and the ledger SDK.
//! Every handler talks to a [`Ledger`], one method per operation:
//! - `HederaLedger` (feature `hedera`): builds a client per request and
//!   submits real transactions through the Hedera SDK
//! - `SimulatedLedger`: an in-process ledger used for local runs and tests
//!
//! Backends are picked once at startup from configuration via [`connect`].

pub mod keys;
mod simulated;
#[cfg(feature = "hedera")]
mod sdk;


pub use simulated::{
    AccountInfo, SimulatedLedger, Submission, TokenInfo, TransactionKind, MAX_TOKEN_SUPPLY,
};
#[cfg(feature = "hedera")]
pub use sdk::HederaLedger;

use crate::{
    config::{LedgerBackend, LedgerConfig},
    AccountCreate, AccountUpdate, CreatedAccount, CreatedToken, Network, Operator, Submitted,
    SupplyChange, TokenAssociation, TokenCreate, TokenDelete, TokenTransfer, TokenUpdate,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors raised while building, signing or submitting a transaction.
///
/// The display text is forwarded to API callers verbatim.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Error surfaced by the SDK itself.
    #[error("{0}")]
    Sdk(String),

    /// Input that could not be turned into an SDK value (ids, keys, times).
    #[error("failed to parse {what}: `{value}`")]
    InvalidInput { what: &'static str, value: String },

    /// The ledger processed the transaction and refused it.
    #[error("transaction {transaction_id} failed with status {status}")]
    Status {
        transaction_id: String,
        status: &'static str,
    },

    /// The receipt came back without the identifier the operation assigns.
    #[error("receipt is missing {0}")]
    MissingReceiptField(&'static str),

    #[error("ledger backend `{0}` is not available in this build")]
    Unavailable(&'static str),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

pub const TINYBARS_PER_HBAR: i64 = 100_000_000;

/// Convert a whole or fractional hbar amount to tinybars.
///
/// Negative, non-finite and out-of-range amounts are rejected.
pub fn hbar_to_tinybars(hbar: f64) -> LedgerResult<i64> {
    let tinybars = (hbar * TINYBARS_PER_HBAR as f64).round();
    if !tinybars.is_finite() || tinybars < 0.0 || tinybars >= i64::MAX as f64 {
        return Err(LedgerError::InvalidInput {
            what: "hbar amount",
            value: hbar.to_string(),
        });
    }
    Ok(tinybars as i64)
}

/// One ledger operation per method.
///
/// Implementations build a client for `network` with `operator` as payer,
/// construct exactly one transaction, submit it and wait for its receipt.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn create_account(
        &self,
        network: Network,
        operator: &Operator,
        request: &AccountCreate,
    ) -> LedgerResult<CreatedAccount>;

    async fn update_account(
        &self,
        network: Network,
        operator: &Operator,
        request: &AccountUpdate,
    ) -> LedgerResult<Submitted>;

    async fn create_token(
        &self,
        network: Network,
        operator: &Operator,
        request: &TokenCreate,
    ) -> LedgerResult<CreatedToken>;

    async fn mint_token(
        &self,
        network: Network,
        operator: &Operator,
        request: &SupplyChange,
    ) -> LedgerResult<Submitted>;

    async fn burn_token(
        &self,
        network: Network,
        operator: &Operator,
        request: &SupplyChange,
    ) -> LedgerResult<Submitted>;

    async fn transfer_token(
        &self,
        network: Network,
        operator: &Operator,
        request: &TokenTransfer,
    ) -> LedgerResult<Submitted>;

    async fn associate_token(
        &self,
        network: Network,
        operator: &Operator,
        request: &TokenAssociation,
    ) -> LedgerResult<Submitted>;

    async fn dissociate_token(
        &self,
        network: Network,
        operator: &Operator,
        request: &TokenAssociation,
    ) -> LedgerResult<Submitted>;

    /// Signed by the operator only; no admin-key signature is added.
    async fn update_token(
        &self,
        network: Network,
        operator: &Operator,
        request: &TokenUpdate,
    ) -> LedgerResult<Submitted>;

    async fn delete_token(
        &self,
        network: Network,
        operator: &Operator,
        request: &TokenDelete,
    ) -> LedgerResult<Submitted>;
}

/// Build the configured ledger backend.
pub fn connect(config: &LedgerConfig) -> LedgerResult<Arc<dyn Ledger>> {
    match config.backend {
        LedgerBackend::Simulated => {
            info!("Using simulated ledger backend");
            Ok(Arc::new(SimulatedLedger::new()))
        }
        #[cfg(feature = "hedera")]
        LedgerBackend::Hedera => {
            info!("Using Hedera SDK ledger backend");
            Ok(Arc::new(HederaLedger::new()))
        }
        #[cfg(not(feature = "hedera"))]
        LedgerBackend::Hedera => Err(LedgerError::Unavailable("hedera")),
    }
}
