//! Request and response bodies.
//!
//! Request bodies make every field optional: presence is decided on the raw
//! JSON object, in a fixed order, so that the first missing field is the one
//! reported. Response bodies leave out optional fields that were not sent.

use crate::{
    error::ApiError,
    validation::{check_present, optional, Field},
    Metadata, TokenKeys, TokenType,
};
use axum::body::Bytes;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

pub const SUCCESS: &str = "success";

/// Parse a JSON object body.
///
/// `path` parameters are merged into the object, the `required` fields are
/// checked for presence in order, and only then is the object read as `T`.
/// An empty body reads as `{}`.
pub fn parse_body<T: DeserializeOwned>(
    body: &Bytes,
    path: &[(&str, &str)],
    required: &[Field],
) -> Result<T, ApiError> {
    let mut object = if body.iter().all(u8::is_ascii_whitespace) {
        Map::new()
    } else {
        match serde_json::from_slice(body).map_err(|e| ApiError::Body(e.to_string()))? {
            Value::Object(object) => object,
            _ => return Err(ApiError::Body("expected a JSON object".to_string())),
        }
    };
    for (name, value) in path {
        object.insert(name.to_string(), Value::String(value.to_string()));
    }

    check_present(&object, required)?;
    serde_json::from_value(Value::Object(object)).map_err(|e| ApiError::Body(e.to_string()))
}

/// Optional role keys shared by token create and update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleKeyFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kyc_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeze_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wipe_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supply_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_schedule_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_key: Option<String>,
}

impl RoleKeyFields {
    /// Drop empty keys.
    pub fn present(self) -> Self {
        Self {
            admin_key: optional(self.admin_key),
            kyc_key: optional(self.kyc_key),
            freeze_key: optional(self.freeze_key),
            wipe_key: optional(self.wipe_key),
            supply_key: optional(self.supply_key),
            fee_schedule_key: optional(self.fee_schedule_key),
            pause_key: optional(self.pause_key),
        }
    }

    pub fn to_token_keys(&self) -> TokenKeys {
        TokenKeys {
            admin: self.admin_key.clone(),
            kyc: self.kyc_key.clone(),
            freeze: self.freeze_key.clone(),
            wipe: self.wipe_key.clone(),
            supply: self.supply_key.clone(),
            fee_schedule: self.fee_schedule_key.clone(),
            pause: self.pause_key.clone(),
        }
    }
}

// ============ Accounts ============

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub network: Option<String>,
    pub account_id: Option<String>,
    pub user_private_key: Option<String>,
    /// Hbar, fractions allowed.
    pub initial_balance: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountResponse {
    pub status: &'static str,
    pub new_account_id: String,
    pub new_private_key: String,
    pub new_public_key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub network: Option<String>,
    pub user_private_key: Option<String>,
    pub new_key: Option<String>,
    pub auto_renew_period: Option<i64>,
    pub expiration_time: Option<i64>,
    pub memo: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountResponse {
    pub status: &'static str,
    pub account_id: String,
    pub transaction_id: String,
}

// ============ Tokens ============

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenRequest {
    pub network: Option<String>,
    pub account_id: Option<String>,
    pub user_private_key: Option<String>,
    pub token_name: Option<String>,
    pub token_symbol: Option<String>,
    pub initial_supply: Option<u64>,
    pub decimals: Option<u32>,
    pub max_supply: Option<u64>,
    pub freeze_default: Option<bool>,
    #[serde(flatten)]
    pub keys: RoleKeyFields,
    pub auto_renew_account: Option<String>,
    pub auto_renew_period: Option<i64>,
    pub expiration_time: Option<i64>,
    pub memo: Option<String>,
    pub token_type: Option<TokenType>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenResponse {
    pub status: &'static str,
    pub token_id: String,
    pub token_name: String,
    pub token_symbol: String,
    pub initial_supply: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_supply: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeze_default: Option<bool>,
    #[serde(flatten)]
    pub keys: RoleKeyFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_renew_account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_renew_period: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub token_type: TokenType,
    pub transaction_id: String,
}

/// Body of both mint and burn.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyRequest {
    pub network: Option<String>,
    pub account_id: Option<String>,
    pub user_private_key: Option<String>,
    pub amount: Option<u64>,
    pub metadata: Option<Metadata>,
    pub supply_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyResponse {
    pub status: &'static str,
    pub token_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    pub transaction_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub network: Option<String>,
    pub account_id: Option<String>,
    pub user_private_key: Option<String>,
    pub amount: Option<u64>,
    pub to_account_id: Option<String>,
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    pub status: &'static str,
    pub token_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    pub to_account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    pub transaction_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociateRequest {
    pub network: Option<String>,
    pub account_id: Option<String>,
    pub user_private_key: Option<String>,
    pub account_id_to_associate: Option<String>,
    pub associate_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociateResponse {
    pub status: &'static str,
    pub token_id: String,
    pub account_id_to_associate: String,
    pub transaction_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DissociateRequest {
    pub network: Option<String>,
    pub account_id: Option<String>,
    pub user_private_key: Option<String>,
    pub account_id_to_dissociate: Option<String>,
    pub dissociate_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DissociateResponse {
    pub status: &'static str,
    pub token_id: String,
    pub account_id_to_dissociate: String,
    pub transaction_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTokenRequest {
    pub network: Option<String>,
    pub account_id: Option<String>,
    pub user_private_key: Option<String>,
    pub token_name: Option<String>,
    pub token_symbol: Option<String>,
    #[serde(flatten)]
    pub keys: RoleKeyFields,
    pub auto_renew_account: Option<String>,
    pub auto_renew_period: Option<i64>,
    pub expiration_time: Option<i64>,
    pub memo: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTokenResponse {
    pub status: &'static str,
    pub token_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_symbol: Option<String>,
    #[serde(flatten)]
    pub keys: RoleKeyFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_renew_account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_renew_period: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub transaction_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTokenRequest {
    pub network: Option<String>,
    pub account_id: Option<String>,
    pub user_private_key: Option<String>,
    pub admin_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTokenResponse {
    pub status: &'static str,
    pub token_id: String,
    pub transaction_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::fields;

    const ACCOUNT_FIELDS: [Field; 4] = [
        fields::NETWORK,
        fields::ACCOUNT_ID,
        fields::USER_PRIVATE_KEY,
        fields::INITIAL_BALANCE,
    ];

    #[test]
    fn test_empty_body_reads_as_empty_object() {
        let request: CreateAccountRequest =
            parse_body(&Bytes::from_static(b"  \n"), &[], &[]).unwrap();
        assert!(request.network.is_none());
        assert!(request.initial_balance.is_none());

        let result = parse_body::<CreateAccountRequest>(&Bytes::new(), &[], &ACCOUNT_FIELDS);
        assert!(matches!(result, Err(ApiError::MissingField(fields::NETWORK))));
    }

    #[test]
    fn test_malformed_body_is_a_body_error() {
        let result =
            parse_body::<CreateAccountRequest>(&Bytes::from_static(b"{\"network\":"), &[], &[]);
        assert!(matches!(result, Err(ApiError::Body(_))));

        let result = parse_body::<CreateAccountRequest>(&Bytes::from_static(b"[1]"), &[], &[]);
        assert!(matches!(result, Err(ApiError::Body(_))));
    }

    #[test]
    fn test_missing_field_reported_before_type_error() {
        let body = Bytes::from_static(br#"{"initialBalance":"abc"}"#);
        let result = parse_body::<CreateAccountRequest>(&body, &[], &ACCOUNT_FIELDS);
        assert!(matches!(result, Err(ApiError::MissingField(fields::NETWORK))));

        let body = Bytes::from_static(
            br#"{"network":"testnet","accountId":"0.0.1001","userPrivateKey":"k","initialBalance":"abc"}"#,
        );
        let result = parse_body::<CreateAccountRequest>(&body, &[], &ACCOUNT_FIELDS);
        assert!(matches!(result, Err(ApiError::Body(_))));
    }

    #[test]
    fn test_fractional_initial_balance() {
        let body = Bytes::from_static(
            br#"{"network":"testnet","accountId":"0.0.1001","userPrivateKey":"k","initialBalance":1.5}"#,
        );
        let request: CreateAccountRequest = parse_body(&body, &[], &ACCOUNT_FIELDS).unwrap();
        assert_eq!(request.initial_balance, Some(1.5));
    }

    #[test]
    fn test_path_parameters_count_as_present() {
        let body = Bytes::from_static(br#"{"network":"testnet"}"#);
        let result = parse_body::<SupplyRequest>(
            &body,
            &[("tokenId", "0.0.2002")],
            &[fields::NETWORK, fields::TOKEN_ID, fields::SUPPLY_KEY],
        );
        assert!(matches!(result, Err(ApiError::MissingField(fields::SUPPLY_KEY))));
    }

    #[test]
    fn test_flattened_role_keys() {
        let request: CreateTokenRequest = parse_body(
            &Bytes::from_static(
                br#"{"tokenName":"T","adminKey":"abc","feeScheduleKey":"","tokenType":"NonFungibleUnique"}"#,
            ),
            &[],
            &[],
        )
        .unwrap();
        let keys = request.keys.present();
        assert_eq!(keys.admin_key.as_deref(), Some("abc"));
        assert_eq!(keys.fee_schedule_key, None);
        assert_eq!(request.token_type, Some(TokenType::NonFungibleUnique));
    }

    #[test]
    fn test_response_omits_unset_fields() {
        let response = SupplyResponse {
            status: SUCCESS,
            token_id: "0.0.2002".to_string(),
            amount: Some(5),
            metadata: None,
            transaction_id: "0.0.1001@1.000000001".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["tokenId"], "0.0.2002");
        assert_eq!(json["amount"], 5);
        assert!(json.get("metadata").is_none());
    }
}
