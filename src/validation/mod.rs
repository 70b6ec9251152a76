//! Request Validation Module
//!
//! This module checks request fields before anything reaches the ledger.
//! Required fields are checked one at a time in a fixed order and the first
//! missing one ends the request, so a caller only ever sees one validation
//! error. Also resolves the network selector.

mod validator;
pub use validator::{check_present, fields, optional, require, Field, Presence, Validator};
