//! API Module
//!
//! This module handles the REST API for account and token operations.
//! Handlers validate request fields, submit one ledger transaction each and
//! answer with a JSON summary or a `{status, message, code}` error body.

mod accounts;
pub mod dto;
mod server;
mod tokens;

pub use server::{router, AppState, Server, API_VERSIONS};
