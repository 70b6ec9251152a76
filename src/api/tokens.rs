//! Token handlers.
//!
//! Each handler checks its required fields in a fixed order (network,
//! operator, then the operation's own fields), builds one command and hands
//! it to the ledger. Optional fields are passed on only when present;
//! `freezeDefault` is passed on whenever it is sent, `false` included.

use super::dto::{
    parse_body, AssociateRequest, AssociateResponse, CreateTokenRequest, CreateTokenResponse,
    DeleteTokenRequest, DeleteTokenResponse, DissociateRequest, DissociateResponse,
    SupplyRequest, SupplyResponse, TransferRequest, TransferResponse, UpdateTokenRequest,
    UpdateTokenResponse, SUCCESS,
};
use super::server::AppState;
use crate::{
    error::{ApiError, ApiResult, Operation},
    validation::{fields, optional, require},
    Metadata, Network, Operator, SupplyChange, TokenAssociation, TokenCreate, TokenDelete,
    TokenTransfer, TokenUpdate,
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use tracing::info;

/// `POST /tokens`
pub async fn create_token(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<CreateTokenResponse>> {
    let request: CreateTokenRequest = parse_body(
        &body,
        &[],
        &[
            fields::NETWORK,
            fields::ACCOUNT_ID,
            fields::USER_PRIVATE_KEY,
            fields::TOKEN_NAME,
            fields::TOKEN_SYMBOL,
            fields::INITIAL_SUPPLY,
        ],
    )?;

    let network = state.validator.network(request.network)?;
    let operator = state
        .validator
        .operator(request.account_id, request.user_private_key)?;
    let name = require(request.token_name, fields::TOKEN_NAME)?;
    let symbol = require(request.token_symbol, fields::TOKEN_SYMBOL)?;
    let initial_supply = require(request.initial_supply, fields::INITIAL_SUPPLY)?;

    let keys = request.keys.present();
    let command = TokenCreate {
        name,
        symbol,
        initial_supply,
        decimals: optional(request.decimals),
        max_supply: optional(request.max_supply),
        freeze_default: request.freeze_default,
        keys: keys.to_token_keys(),
        auto_renew_account: optional(request.auto_renew_account),
        auto_renew_period: optional(request.auto_renew_period),
        expiration_time: optional(request.expiration_time),
        memo: optional(request.memo),
        token_type: request.token_type.unwrap_or_default(),
    };

    info!(
        "Creating token {} ({}) on {} with treasury {}",
        command.name, command.symbol, network, operator.account_id
    );
    let created = state
        .ledger
        .create_token(network, &operator, &command)
        .await
        .map_err(|e| ApiError::ledger(Operation::AddToken, e))?;
    info!("Created token {} in {}", created.token_id, created.transaction_id);

    Ok(Json(CreateTokenResponse {
        status: SUCCESS,
        token_id: created.token_id,
        token_name: command.name,
        token_symbol: command.symbol,
        initial_supply: command.initial_supply,
        decimals: command.decimals,
        max_supply: command.max_supply,
        freeze_default: command.freeze_default,
        keys,
        auto_renew_account: command.auto_renew_account,
        auto_renew_period: command.auto_renew_period,
        expiration_time: command.expiration_time,
        memo: command.memo,
        token_type: command.token_type,
        transaction_id: created.transaction_id,
    }))
}

/// Validated mint or burn, ready for the ledger.
struct SupplyCommand {
    network: Network,
    operator: Operator,
    change: SupplyChange,
    amount: Option<u64>,
    metadata: Option<Metadata>,
}

impl SupplyCommand {
    fn validate(state: &AppState, token_id: String, body: &Bytes) -> ApiResult<Self> {
        let request: SupplyRequest = parse_body(
            body,
            &[(fields::TOKEN_ID.name, token_id.as_str())],
            &[
                fields::NETWORK,
                fields::ACCOUNT_ID,
                fields::USER_PRIVATE_KEY,
                fields::TOKEN_ID,
                fields::SUPPLY_KEY,
            ],
        )?;

        let network = state.validator.network(request.network)?;
        let operator = state
            .validator
            .operator(request.account_id, request.user_private_key)?;
        let token_id = require(Some(token_id), fields::TOKEN_ID)?;
        let supply_key = require(request.supply_key, fields::SUPPLY_KEY)?;

        let amount = optional(request.amount);
        let metadata = optional(request.metadata);
        let change = SupplyChange {
            token_id,
            supply_key,
            amount,
            metadata: metadata.as_ref().map(Metadata::entries).unwrap_or_default(),
        };

        Ok(Self {
            network,
            operator,
            change,
            amount,
            metadata,
        })
    }

    fn into_response(self, transaction_id: String) -> SupplyResponse {
        SupplyResponse {
            status: SUCCESS,
            token_id: self.change.token_id,
            amount: self.amount,
            metadata: self.metadata,
            transaction_id,
        }
    }
}

/// `POST /tokens/:id/mint`
pub async fn mint_token(
    State(state): State<AppState>,
    Path(token_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<SupplyResponse>> {
    let command = SupplyCommand::validate(&state, token_id, &body)?;

    info!("Minting token {} on {}", command.change.token_id, command.network);
    let submitted = state
        .ledger
        .mint_token(command.network, &command.operator, &command.change)
        .await
        .map_err(|e| ApiError::ledger(Operation::MintToken, e))?;

    Ok(Json(command.into_response(submitted.transaction_id)))
}

/// `POST /tokens/:id/burn`
///
/// For NFTs, `metadata` names the serials to burn.
pub async fn burn_token(
    State(state): State<AppState>,
    Path(token_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<SupplyResponse>> {
    let command = SupplyCommand::validate(&state, token_id, &body)?;

    info!("Burning token {} on {}", command.change.token_id, command.network);
    let submitted = state
        .ledger
        .burn_token(command.network, &command.operator, &command.change)
        .await
        .map_err(|e| ApiError::ledger(Operation::BurnToken, e))?;

    Ok(Json(command.into_response(submitted.transaction_id)))
}

/// `POST /tokens/:id/transfer`
///
/// Moves `amount` units, and any NFT serials listed in `metadata`, from
/// the operator to `toAccountId`.
pub async fn transfer_token(
    State(state): State<AppState>,
    Path(token_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<TransferResponse>> {
    let request: TransferRequest = parse_body(
        &body,
        &[(fields::TOKEN_ID.name, token_id.as_str())],
        &[
            fields::NETWORK,
            fields::ACCOUNT_ID,
            fields::USER_PRIVATE_KEY,
            fields::TOKEN_ID,
            fields::TO_ACCOUNT_ID,
        ],
    )?;

    let network = state.validator.network(request.network)?;
    let operator = state
        .validator
        .operator(request.account_id, request.user_private_key)?;
    let token_id = require(Some(token_id), fields::TOKEN_ID)?;
    let to_account_id = require(request.to_account_id, fields::TO_ACCOUNT_ID)?;

    let amount = optional(request.amount);
    let metadata = optional(request.metadata);
    let transfer = TokenTransfer {
        token_id,
        to_account_id,
        amount,
        serials: metadata.as_ref().map(Metadata::entries).unwrap_or_default(),
    };

    info!(
        "Transferring token {} from {} to {} on {}",
        transfer.token_id, operator.account_id, transfer.to_account_id, network
    );
    let submitted = state
        .ledger
        .transfer_token(network, &operator, &transfer)
        .await
        .map_err(|e| ApiError::ledger(Operation::TransferToken, e))?;

    Ok(Json(TransferResponse {
        status: SUCCESS,
        token_id: transfer.token_id,
        amount,
        to_account_id: transfer.to_account_id,
        metadata,
        transaction_id: submitted.transaction_id,
    }))
}

/// `POST /tokens/:id/associate`
pub async fn associate_token(
    State(state): State<AppState>,
    Path(token_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<AssociateResponse>> {
    let request: AssociateRequest = parse_body(
        &body,
        &[(fields::TOKEN_ID.name, token_id.as_str())],
        &[
            fields::NETWORK,
            fields::ACCOUNT_ID,
            fields::USER_PRIVATE_KEY,
            fields::TOKEN_ID,
            fields::ACCOUNT_ID_TO_ASSOCIATE,
            fields::ASSOCIATE_KEY,
        ],
    )?;

    let network = state.validator.network(request.network)?;
    let operator = state
        .validator
        .operator(request.account_id, request.user_private_key)?;
    let token_id = require(Some(token_id), fields::TOKEN_ID)?;
    let account_id = require(request.account_id_to_associate, fields::ACCOUNT_ID_TO_ASSOCIATE)?;
    let account_key = require(request.associate_key, fields::ASSOCIATE_KEY)?;

    let association = TokenAssociation {
        token_id,
        account_id,
        account_key,
    };

    info!(
        "Associating {} with token {} on {}",
        association.account_id, association.token_id, network
    );
    let submitted = state
        .ledger
        .associate_token(network, &operator, &association)
        .await
        .map_err(|e| ApiError::ledger(Operation::AssociateToken, e))?;

    Ok(Json(AssociateResponse {
        status: SUCCESS,
        token_id: association.token_id,
        account_id_to_associate: association.account_id,
        transaction_id: submitted.transaction_id,
    }))
}

/// `POST /tokens/:id/dissociate`
pub async fn dissociate_token(
    State(state): State<AppState>,
    Path(token_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<DissociateResponse>> {
    let request: DissociateRequest = parse_body(
        &body,
        &[(fields::TOKEN_ID.name, token_id.as_str())],
        &[
            fields::NETWORK,
            fields::ACCOUNT_ID,
            fields::USER_PRIVATE_KEY,
            fields::TOKEN_ID,
            fields::ACCOUNT_ID_TO_DISSOCIATE,
            fields::DISSOCIATE_KEY,
        ],
    )?;

    let network = state.validator.network(request.network)?;
    let operator = state
        .validator
        .operator(request.account_id, request.user_private_key)?;
    let token_id = require(Some(token_id), fields::TOKEN_ID)?;
    let account_id =
        require(request.account_id_to_dissociate, fields::ACCOUNT_ID_TO_DISSOCIATE)?;
    let account_key = require(request.dissociate_key, fields::DISSOCIATE_KEY)?;

    let association = TokenAssociation {
        token_id,
        account_id,
        account_key,
    };

    info!(
        "Dissociating {} from token {} on {}",
        association.account_id, association.token_id, network
    );
    let submitted = state
        .ledger
        .dissociate_token(network, &operator, &association)
        .await
        .map_err(|e| ApiError::ledger(Operation::DissociateToken, e))?;

    Ok(Json(DissociateResponse {
        status: SUCCESS,
        token_id: association.token_id,
        account_id_to_dissociate: association.account_id,
        transaction_id: submitted.transaction_id,
    }))
}

/// `PUT /tokens/:id/update`
///
/// Signed by the operator alone, so the operator key must be the token's
/// admin key.
pub async fn update_token(
    State(state): State<AppState>,
    Path(token_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<UpdateTokenResponse>> {
    let request: UpdateTokenRequest = parse_body(
        &body,
        &[(fields::TOKEN_ID.name, token_id.as_str())],
        &[fields::NETWORK, fields::ACCOUNT_ID, fields::USER_PRIVATE_KEY, fields::TOKEN_ID],
    )?;

    let network = state.validator.network(request.network)?;
    let operator = state
        .validator
        .operator(request.account_id, request.user_private_key)?;
    let token_id = require(Some(token_id), fields::TOKEN_ID)?;

    let keys = request.keys.present();
    let update = TokenUpdate {
        token_id,
        name: optional(request.token_name),
        symbol: optional(request.token_symbol),
        keys: keys.to_token_keys(),
        auto_renew_account: optional(request.auto_renew_account),
        auto_renew_period: optional(request.auto_renew_period),
        expiration_time: optional(request.expiration_time),
        memo: optional(request.memo),
    };

    info!("Updating token {} on {}", update.token_id, network);
    let submitted = state
        .ledger
        .update_token(network, &operator, &update)
        .await
        .map_err(|e| ApiError::ledger(Operation::UpdateToken, e))?;

    Ok(Json(UpdateTokenResponse {
        status: SUCCESS,
        token_id: update.token_id,
        token_name: update.name,
        token_symbol: update.symbol,
        keys,
        auto_renew_account: update.auto_renew_account,
        auto_renew_period: update.auto_renew_period,
        expiration_time: update.expiration_time,
        memo: update.memo,
        transaction_id: submitted.transaction_id,
    }))
}

/// `DELETE /tokens/:id/delete`
pub async fn delete_token(
    State(state): State<AppState>,
    Path(token_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<DeleteTokenResponse>> {
    let request: DeleteTokenRequest = parse_body(
        &body,
        &[(fields::TOKEN_ID.name, token_id.as_str())],
        &[
            fields::NETWORK,
            fields::ACCOUNT_ID,
            fields::USER_PRIVATE_KEY,
            fields::TOKEN_ID,
            fields::ADMIN_KEY,
        ],
    )?;

    let network = state.validator.network(request.network)?;
    let operator = state
        .validator
        .operator(request.account_id, request.user_private_key)?;
    let token_id = require(Some(token_id), fields::TOKEN_ID)?;
    let admin_key = require(request.admin_key, fields::ADMIN_KEY)?;

    let delete = TokenDelete {
        token_id,
        admin_key,
    };

    info!("Deleting token {} on {}", delete.token_id, network);
    let submitted = state
        .ledger
        .delete_token(network, &operator, &delete)
        .await
        .map_err(|e| ApiError::ledger(Operation::RemoveToken, e))?;

    Ok(Json(DeleteTokenResponse {
        status: SUCCESS,
        token_id: delete.token_id,
        transaction_id: submitted.transaction_id,
    }))
}
