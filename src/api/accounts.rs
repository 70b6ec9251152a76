//! Account handlers.

use super::dto::{
    parse_body, CreateAccountRequest, CreateAccountResponse, UpdateAccountRequest,
    UpdateAccountResponse, SUCCESS,
};
use super::server::AppState;
use crate::{
    error::{ApiError, ApiResult, Operation},
    validation::{fields, optional, require},
    AccountCreate, AccountUpdate,
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use tracing::info;

/// `POST /accounts`
///
/// Creates an account funded from the operator, keyed with a freshly
/// generated key pair that is handed back to the caller.
pub async fn create_account(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<CreateAccountResponse>> {
    let request: CreateAccountRequest = parse_body(
        &body,
        &[],
        &[
            fields::NETWORK,
            fields::ACCOUNT_ID,
            fields::USER_PRIVATE_KEY,
            fields::INITIAL_BALANCE,
        ],
    )?;

    let network = state.validator.network(request.network)?;
    let operator = state
        .validator
        .operator(request.account_id, request.user_private_key)?;
    let initial_balance = require(request.initial_balance, fields::INITIAL_BALANCE)?;

    info!(
        "Creating account on {} funded by {} with {} hbar",
        network, operator.account_id, initial_balance
    );
    let created = state
        .ledger
        .create_account(network, &operator, &AccountCreate { initial_balance })
        .await
        .map_err(|e| ApiError::ledger(Operation::AddAccount, e))?;
    info!(
        "Created account {} in {}",
        created.account_id, created.transaction_id
    );

    Ok(Json(CreateAccountResponse {
        status: SUCCESS,
        new_account_id: created.account_id,
        new_private_key: created.private_key,
        new_public_key: created.public_key,
    }))
}

/// `PUT /accounts/:id/update`
///
/// The account in the path is also the operator: it pays for and signs
/// its own update.
pub async fn update_account(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<UpdateAccountResponse>> {
    let request: UpdateAccountRequest = parse_body(
        &body,
        &[(fields::ACCOUNT_ID.name, account_id.as_str())],
        &[fields::NETWORK, fields::ACCOUNT_ID, fields::USER_PRIVATE_KEY],
    )?;

    let network = state.validator.network(request.network)?;
    let operator = state
        .validator
        .operator(Some(account_id), request.user_private_key)?;

    let update = AccountUpdate {
        account_id: operator.account_id.clone(),
        new_key: optional(request.new_key),
        auto_renew_period: optional(request.auto_renew_period),
        expiration_time: optional(request.expiration_time),
        memo: optional(request.memo),
    };

    info!("Updating account {} on {}", update.account_id, network);
    let submitted = state
        .ledger
        .update_account(network, &operator, &update)
        .await
        .map_err(|e| ApiError::ledger(Operation::UpdateAccount, e))?;

    Ok(Json(UpdateAccountResponse {
        status: SUCCESS,
        account_id: update.account_id,
        transaction_id: submitted.transaction_id,
    }))
}
