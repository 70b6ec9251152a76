//! API error types
//!
//! Every failure leaves the service as the same JSON shape:
//! `{"status": <http status>, "message": <text>, "code": <code>}`.

use crate::ledger::LedgerError;
use crate::validation::Field;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

/// The ledger operation a request was performing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    AddAccount,
    UpdateAccount,
    AddToken,
    MintToken,
    BurnToken,
    TransferToken,
    AssociateToken,
    DissociateToken,
    UpdateToken,
    RemoveToken,
}

impl Operation {
    /// Error code reported when the ledger rejects this operation.
    pub fn error_code(&self) -> &'static str {
        match self {
            Operation::AddAccount => "add-account-error",
            Operation::UpdateAccount => "update-account-error",
            Operation::AddToken => "add-token-error",
            Operation::MintToken => "mint-token-error",
            Operation::BurnToken => "burn-token-error",
            Operation::TransferToken => "transfer-token-error",
            Operation::AssociateToken => "associate-token-error",
            Operation::DissociateToken => "dissociate-token-error",
            Operation::UpdateToken => "update-token-error",
            Operation::RemoveToken => "remove-token-error",
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    /// A required field was absent or empty.
    #[error("{} is required", .0.label)]
    MissingField(Field),

    /// A field was present but not acceptable.
    #[error("{message}")]
    InvalidField { field: Field, message: String },

    /// The body was not JSON of the expected shape.
    #[error("Invalid request body: {0}")]
    Body(String),

    /// The ledger layer failed; its message is forwarded as is.
    #[error("{source}")]
    Ledger {
        operation: Operation,
        #[source]
        source: LedgerError,
    },
}

impl ApiError {
    pub fn ledger(operation: Operation, source: LedgerError) -> Self {
        ApiError::Ledger { operation, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            // Missing and invalid fields are reported as 500, not 400.
            ApiError::MissingField(_) | ApiError::InvalidField { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Body(_) => StatusCode::BAD_REQUEST,
            ApiError::Ledger { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> String {
        match self {
            ApiError::MissingField(field) | ApiError::InvalidField { field, .. } => {
                field.error_code()
            }
            ApiError::Body(_) => "body-error".to_string(),
            ApiError::Ledger { operation, .. } => operation.error_code().to_string(),
        }
    }
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            status: status.as_u16(),
            message: self.to_string(),
            code: self.code(),
        };

        match &self {
            ApiError::Ledger { .. } => error!("{}: {}", body.code, body.message),
            _ => warn!("Rejected request: {} ({})", body.message, body.code),
        }

        (status, Json(body)).into_response()
    }
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;
