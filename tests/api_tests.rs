//! HTTP-level tests for the account and token routes
//!
//! Drives the full router in-process against the simulated ledger.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use hashgate::{
    api::{router, AppState},
    ledger::{keys::KeyPair, SimulatedLedger, TransactionKind, TINYBARS_PER_HBAR},
    validation::Validator,
    Network, TokenType,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const OPERATOR_ID: &str = "0.0.1001";

struct Harness {
    app: Router,
    ledger: SimulatedLedger,
    operator: KeyPair,
}

impl Harness {
    fn new() -> Self {
        Self::with_validator(Validator::new(false))
    }

    fn with_validator(validator: Validator) -> Self {
        let ledger = SimulatedLedger::new();
        let app = router(AppState::new(Arc::new(ledger.clone()), validator));
        Self {
            app,
            ledger,
            operator: KeyPair::generate(),
        }
    }

    /// Body carrying the shared operator fields plus `extra`.
    fn body(&self, extra: Value) -> Value {
        let mut body = json!({
            "network": "testnet",
            "accountId": OPERATOR_ID,
            "userPrivateKey": self.operator.private_key(),
        });
        if let (Some(body), Value::Object(extra)) = (body.as_object_mut(), extra) {
            body.extend(extra);
        }
        body
    }

    async fn send(&self, method: Method, uri: &str, body: Body) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .unwrap();
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn call(&self, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(method, uri, Body::from(body.to_string())).await
    }

    /// Create a fungible token with the operator as admin and `supply` as supply key.
    async fn create_token(&self, supply: &KeyPair) -> String {
        let (status, json) = self
            .call(
                Method::POST,
                "/api/tokens",
                self.body(json!({
                    "tokenName": "Gate Token",
                    "tokenSymbol": "GATE",
                    "initialSupply": 1000,
                    "decimals": 2,
                    "adminKey": self.operator.public_key(),
                    "supplyKey": supply.public_key(),
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", json);
        json["tokenId"].as_str().unwrap().to_string()
    }

    async fn create_account(&self) -> (String, String) {
        let (status, json) = self
            .call(
                Method::POST,
                "/api/accounts",
                self.body(json!({ "initialBalance": 10 })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", json);
        (
            json["newAccountId"].as_str().unwrap().to_string(),
            json["newPrivateKey"].as_str().unwrap().to_string(),
        )
    }
}

/// Remove each required field in turn and check the reported code.
async fn assert_each_field_required(
    harness: &Harness,
    method: Method,
    uri: &str,
    body: Value,
    required: &[&str],
) {
    for field in required {
        let mut partial = body.clone();
        partial.as_object_mut().unwrap().remove(*field);

        let (status, json) = harness.call(method.clone(), uri, partial).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{} {}", uri, field);
        assert_eq!(json["status"], 500);
        assert_eq!(json["code"], format!("{}-error", field), "{} {}", uri, field);
        assert!(json["message"].as_str().unwrap().ends_with("is required"));
    }
}

#[tokio::test]
async fn test_create_account_returns_new_credentials() {
    let harness = Harness::new();

    let (status, json) = harness
        .call(
            Method::POST,
            "/api/accounts",
            harness.body(json!({ "initialBalance": 10 })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");
    assert!(json["newAccountId"].as_str().unwrap().starts_with("0.0."));
    assert!(!json["newPrivateKey"].as_str().unwrap().is_empty());
    assert!(!json["newPublicKey"].as_str().unwrap().is_empty());

    let account = harness
        .ledger
        .account_info(json["newAccountId"].as_str().unwrap())
        .await
        .unwrap();
    assert_eq!(account.balance, 10 * TINYBARS_PER_HBAR as u64);
    assert_eq!(account.public_key, json["newPublicKey"]);
}

#[tokio::test]
async fn test_burn_without_supply_key() {
    let harness = Harness::new();

    let (status, json) = harness
        .call(
            Method::POST,
            "/api/tokens/0.0.2002/burn",
            harness.body(json!({ "amount": 5 })),
        )
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json,
        json!({
            "status": 500,
            "message": "Supply Key is required",
            "code": "supplyKey-error",
        })
    );
}

#[tokio::test]
async fn test_every_required_field_is_reported() {
    let harness = Harness::new();
    let key = KeyPair::generate().private_key();

    assert_each_field_required(
        &harness,
        Method::POST,
        "/api/accounts",
        harness.body(json!({ "initialBalance": 10 })),
        &["network", "accountId", "userPrivateKey", "initialBalance"],
    )
    .await;

    assert_each_field_required(
        &harness,
        Method::PUT,
        "/api/accounts/0.0.1001/update",
        harness.body(json!({ "memo": "hello" })),
        &["network", "userPrivateKey"],
    )
    .await;

    assert_each_field_required(
        &harness,
        Method::POST,
        "/api/tokens",
        harness.body(json!({
            "tokenName": "Gate Token",
            "tokenSymbol": "GATE",
            "initialSupply": 1000,
        })),
        &["network", "accountId", "userPrivateKey", "tokenName", "tokenSymbol", "initialSupply"],
    )
    .await;

    for action in ["mint", "burn"] {
        assert_each_field_required(
            &harness,
            Method::POST,
            &format!("/api/tokens/0.0.2002/{}", action),
            harness.body(json!({ "amount": 5, "supplyKey": key })),
            &["network", "accountId", "userPrivateKey", "supplyKey"],
        )
        .await;
    }

    assert_each_field_required(
        &harness,
        Method::POST,
        "/api/tokens/0.0.2002/transfer",
        harness.body(json!({ "amount": 5, "toAccountId": "0.0.1002" })),
        &["network", "accountId", "userPrivateKey", "toAccountId"],
    )
    .await;

    assert_each_field_required(
        &harness,
        Method::POST,
        "/api/tokens/0.0.2002/associate",
        harness.body(json!({ "accountIdToAssociate": "0.0.1002", "associateKey": key })),
        &["network", "accountId", "userPrivateKey", "accountIdToAssociate", "associateKey"],
    )
    .await;

    assert_each_field_required(
        &harness,
        Method::POST,
        "/api/tokens/0.0.2002/dissociate",
        harness.body(json!({ "accountIdToDissociate": "0.0.1002", "dissociateKey": key })),
        &["network", "accountId", "userPrivateKey", "accountIdToDissociate", "dissociateKey"],
    )
    .await;

    assert_each_field_required(
        &harness,
        Method::PUT,
        "/api/tokens/0.0.2002/update",
        harness.body(json!({ "tokenName": "Renamed" })),
        &["network", "accountId", "userPrivateKey"],
    )
    .await;

    assert_each_field_required(
        &harness,
        Method::DELETE,
        "/api/tokens/0.0.2002/delete",
        harness.body(json!({ "adminKey": key })),
        &["network", "accountId", "userPrivateKey", "adminKey"],
    )
    .await;

    // Nothing reached the ledger.
    assert!(harness.ledger.submissions().await.is_empty());
}

#[tokio::test]
async fn test_first_missing_field_wins() {
    let harness = Harness::new();

    let (_, json) = harness.call(Method::POST, "/api/tokens", json!({})).await;
    assert_eq!(json["code"], "network-error");

    let (_, json) = harness
        .call(
            Method::POST,
            "/api/tokens",
            json!({ "network": "testnet", "tokenName": "" , "initialSupply": 0 }),
        )
        .await;
    assert_eq!(json["code"], "accountId-error");
    assert_eq!(json["message"], "Account ID is required");
}

#[tokio::test]
async fn test_mint_and_burn_echo_token_id() {
    let harness = Harness::new();
    let supply = KeyPair::generate();
    let token_id = harness.create_token(&supply).await;

    let (status, json) = harness
        .call(
            Method::POST,
            &format!("/api/tokens/{}/mint", token_id),
            harness.body(json!({ "amount": 50, "supplyKey": supply.private_key() })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["status"], "success");
    assert_eq!(json["tokenId"], token_id);
    assert_eq!(json["amount"], 50);
    assert!(json["transactionId"].as_str().unwrap().starts_with(OPERATOR_ID));

    let (status, json) = harness
        .call(
            Method::POST,
            &format!("/api/tokens/{}/burn", token_id),
            harness.body(json!({ "amount": 30, "supplyKey": supply.private_key() })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["tokenId"], token_id);

    let info = harness.ledger.token_info(&token_id).await.unwrap();
    assert_eq!(info.total_supply, 1020);
}

#[tokio::test]
async fn test_unknown_network_runs_on_testnet() {
    let harness = Harness::new();

    let mut body = harness.body(json!({ "initialBalance": 1 }));
    body["network"] = json!("foo");
    let (status, _) = harness.call(Method::POST, "/api/accounts", body).await;
    assert_eq!(status, StatusCode::OK);

    let mut body = harness.body(json!({ "initialBalance": 1 }));
    body["network"] = json!("mainnet");
    let (status, _) = harness.call(Method::POST, "/api/accounts", body).await;
    assert_eq!(status, StatusCode::OK);

    let networks: Vec<Network> = harness
        .ledger
        .submissions()
        .await
        .iter()
        .map(|submission| submission.network)
        .collect();
    assert_eq!(networks, vec![Network::Testnet, Network::Mainnet]);
}

#[tokio::test]
async fn test_strict_network_rejects_unknown_name() {
    let harness = Harness::with_validator(Validator::new(true));

    let mut body = harness.body(json!({ "initialBalance": 1 }));
    body["network"] = json!("foo");
    let (status, json) = harness.call(Method::POST, "/api/accounts", body).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "network-error");
    assert!(harness.ledger.submissions().await.is_empty());
}

#[tokio::test]
async fn test_ledger_failures_use_operation_code() {
    let harness = Harness::new();
    let supply = KeyPair::generate();

    let (status, json) = harness
        .call(
            Method::POST,
            "/api/tokens/0.0.9999/mint",
            harness.body(json!({ "amount": 5, "supplyKey": supply.private_key() })),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["status"], 500);
    assert_eq!(json["code"], "mint-token-error");
    assert!(json["message"].as_str().unwrap().contains("INVALID_TOKEN_ID"));

    let mut body = harness.body(json!({ "initialBalance": 10 }));
    body["userPrivateKey"] = json!("not-a-key");
    let (status, json) = harness.call(Method::POST, "/api/accounts", body).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "add-account-error");
}

#[tokio::test]
async fn test_token_lifecycle() {
    let harness = Harness::new();
    let supply = KeyPair::generate();
    let token_id = harness.create_token(&supply).await;
    let (holder_id, holder_key) = harness.create_account().await;

    // Transfer before association is refused by the ledger.
    let (status, json) = harness
        .call(
            Method::POST,
            &format!("/api/tokens/{}/transfer", token_id),
            harness.body(json!({ "amount": 5, "toAccountId": holder_id })),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "transfer-token-error");

    let (status, json) = harness
        .call(
            Method::POST,
            &format!("/api/tokens/{}/associate", token_id),
            harness.body(json!({ "accountIdToAssociate": holder_id, "associateKey": holder_key })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["accountIdToAssociate"], holder_id);

    let (status, json) = harness
        .call(
            Method::POST,
            &format!("/api/tokens/{}/transfer", token_id),
            harness.body(json!({ "amount": 5, "toAccountId": holder_id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["toAccountId"], holder_id);
    assert_eq!(json["amount"], 5);
    assert_eq!(
        harness.ledger.token_balance(&token_id, &holder_id).await,
        Some(5)
    );

    // A holder with a balance cannot dissociate.
    let (status, json) = harness
        .call(
            Method::POST,
            &format!("/api/tokens/{}/dissociate", token_id),
            harness.body(json!({ "accountIdToDissociate": holder_id, "dissociateKey": holder_key })),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "dissociate-token-error");

    let (status, json) = harness
        .call(
            Method::PUT,
            &format!("/api/tokens/{}/update", token_id),
            harness.body(json!({ "tokenName": "Renamed", "memo": "v2" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["tokenName"], "Renamed");
    assert!(json.get("tokenSymbol").is_none());

    let (status, json) = harness
        .call(
            Method::DELETE,
            &format!("/api/tokens/{}/delete", token_id),
            harness.body(json!({ "adminKey": harness.operator.private_key() })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["tokenId"], token_id);

    let info = harness.ledger.token_info(&token_id).await.unwrap();
    assert_eq!(info.name, "Renamed");
    assert!(info.deleted);

    let (_, json) = harness
        .call(
            Method::POST,
            &format!("/api/tokens/{}/mint", token_id),
            harness.body(json!({ "amount": 1, "supplyKey": supply.private_key() })),
        )
        .await;
    assert_eq!(json["code"], "mint-token-error");
    assert!(json["message"].as_str().unwrap().contains("TOKEN_WAS_DELETED"));

    let kinds: Vec<TransactionKind> = harness
        .ledger
        .submissions()
        .await
        .iter()
        .map(|submission| submission.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TransactionKind::TokenCreate,
            TransactionKind::AccountCreate,
            TransactionKind::TokenAssociate,
            TransactionKind::TokenTransfer,
            TransactionKind::TokenUpdate,
            TransactionKind::TokenDelete,
        ]
    );
}

#[tokio::test]
async fn test_update_account_signed_by_itself() {
    let harness = Harness::new();
    let (account_id, private_key) = harness.create_account().await;

    let (status, json) = harness
        .call(
            Method::PUT,
            &format!("/api/v1/accounts/{}/update", account_id),
            json!({
                "network": "testnet",
                "userPrivateKey": private_key,
                "memo": "primary",
                "autoRenewPeriod": 7_776_000,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["status"], "success");
    assert_eq!(json["accountId"], account_id);
    assert!(json["transactionId"].as_str().unwrap().starts_with(&account_id));

    let account = harness.ledger.account_info(&account_id).await.unwrap();
    assert_eq!(account.memo.as_deref(), Some("primary"));
    assert_eq!(account.auto_renew_period, Some(7_776_000));

    // Someone else's key is refused.
    let (_, json) = harness
        .call(
            Method::PUT,
            &format!("/api/accounts/{}/update", account_id),
            json!({ "network": "testnet", "userPrivateKey": harness.operator.private_key() }),
        )
        .await;
    assert_eq!(json["code"], "update-account-error");
}

#[tokio::test]
async fn test_versioned_prefix_and_fallbacks() {
    let harness = Harness::new();

    let (status, json) = harness
        .call(
            Method::POST,
            "/api/v1/accounts",
            harness.body(json!({ "initialBalance": 3 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");

    let (status, json) = harness
        .send(Method::POST, "/api/accounts", Body::from("{\"network\":"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "body-error");

    // An empty body is an empty object.
    let (status, json) = harness
        .send(Method::POST, "/api/v1/tokens", Body::empty())
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "network-error");

    let (status, _) = harness.call(Method::POST, "/api/v2/accounts", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = harness.send(Method::GET, "/health", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");

    let (status, _) = harness.send(Method::GET, "/", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_fractional_hbar_and_late_type_errors() {
    let harness = Harness::new();

    let (status, json) = harness
        .call(
            Method::POST,
            "/api/accounts",
            harness.body(json!({ "initialBalance": 1.5 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    let account = harness
        .ledger
        .account_info(json["newAccountId"].as_str().unwrap())
        .await
        .unwrap();
    assert_eq!(account.balance, 150_000_000);

    // A missing field is reported ahead of a mistyped one.
    let (status, json) = harness
        .call(Method::POST, "/api/accounts", json!({ "initialBalance": "abc" }))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "network-error");

    let (status, json) = harness
        .call(
            Method::POST,
            "/api/accounts",
            harness.body(json!({ "initialBalance": "abc" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "body-error");
}

#[tokio::test]
async fn test_huge_amounts_fail_cleanly() {
    let harness = Harness::new();
    let supply = KeyPair::generate();
    let token_id = harness.create_token(&supply).await;

    let (status, json) = harness
        .call(
            Method::POST,
            &format!("/api/tokens/{}/transfer", token_id),
            harness.body(json!({
                "amount": u64::MAX,
                "toAccountId": OPERATOR_ID,
                "metadata": ["1"],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "transfer-token-error");

    let (status, json) = harness
        .call(
            Method::POST,
            "/api/tokens",
            harness.body(json!({
                "tokenName": "Huge",
                "tokenSymbol": "HUGE",
                "initialSupply": u64::MAX,
                "supplyKey": supply.public_key(),
            })),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "add-token-error");
    assert!(json["message"].as_str().unwrap().contains("INVALID_TOKEN_INITIAL_SUPPLY"));

    let (status, json) = harness
        .call(
            Method::POST,
            "/api/tokens",
            harness.body(json!({
                "tokenName": "Full",
                "tokenSymbol": "FULL",
                "initialSupply": i64::MAX,
                "supplyKey": supply.public_key(),
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    let full_id = json["tokenId"].as_str().unwrap().to_string();

    let (status, json) = harness
        .call(
            Method::POST,
            &format!("/api/tokens/{}/mint", full_id),
            harness.body(json!({ "amount": 1, "supplyKey": supply.private_key() })),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "mint-token-error");
    assert!(json["message"].as_str().unwrap().contains("TOKEN_MAX_SUPPLY_REACHED"));
}

#[tokio::test]
async fn test_update_token_rejects_malformed_role_key() {
    let harness = Harness::new();
    let supply = KeyPair::generate();
    let token_id = harness.create_token(&supply).await;

    let (status, json) = harness
        .call(
            Method::PUT,
            &format!("/api/tokens/{}/update", token_id),
            harness.body(json!({ "kycKey": "garbage" })),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "update-token-error");
    assert_eq!(json["message"], "failed to parse public key: `garbage`");
}

#[tokio::test]
async fn test_nft_mint_burn_and_transfer() {
    let harness = Harness::new();
    let supply = KeyPair::generate();

    let (status, json) = harness
        .call(
            Method::POST,
            "/api/tokens",
            harness.body(json!({
                "tokenName": "Gate Art",
                "tokenSymbol": "GART",
                "initialSupply": 1,
                "supplyKey": supply.public_key(),
                "tokenType": "NonFungibleUnique",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["tokenType"], "NonFungibleUnique");
    let token_id = json["tokenId"].as_str().unwrap().to_string();

    let (status, json) = harness
        .call(
            Method::POST,
            &format!("/api/tokens/{}/mint", token_id),
            harness.body(json!({
                "metadata": ["ipfs://one", "ipfs://two"],
                "supplyKey": supply.private_key(),
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["metadata"], json!(["ipfs://one", "ipfs://two"]));
    assert!(json.get("amount").is_none());
    assert_eq!(harness.ledger.token_info(&token_id).await.unwrap().total_supply, 2);

    // A single string is one entry.
    let (status, json) = harness
        .call(
            Method::POST,
            &format!("/api/tokens/{}/burn", token_id),
            harness.body(json!({ "metadata": "1", "supplyKey": supply.private_key() })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["metadata"], "1");
    assert_eq!(harness.ledger.token_info(&token_id).await.unwrap().total_supply, 1);
    assert_eq!(harness.ledger.nft_owner(&token_id, 1).await, None);

    let (holder_id, holder_key) = harness.create_account().await;
    let (status, _) = harness
        .call(
            Method::POST,
            &format!("/api/tokens/{}/associate", token_id),
            harness.body(json!({ "accountIdToAssociate": holder_id, "associateKey": holder_key })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = harness
        .call(
            Method::POST,
            &format!("/api/tokens/{}/transfer", token_id),
            harness.body(json!({ "toAccountId": holder_id, "metadata": ["2"] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["metadata"], json!(["2"]));
    assert_eq!(json["toAccountId"], holder_id);
    assert_eq!(harness.ledger.nft_owner(&token_id, 2).await, Some(holder_id.clone()));
    assert_eq!(harness.ledger.token_balance(&token_id, &holder_id).await, Some(1));
}

#[tokio::test]
async fn test_create_token_echoes_false_freeze_default_and_alias() {
    let harness = Harness::new();

    let (status, json) = harness
        .call(
            Method::POST,
            "/api/tokens",
            harness.body(json!({
                "tokenName": "Plain",
                "tokenSymbol": "PLN",
                "initialSupply": 5,
                "freezeDefault": false,
                "tokenType": "FungibleUnique",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["freezeDefault"], false);
    assert_eq!(json["tokenType"], "FungibleCommon");

    let info = harness
        .ledger
        .token_info(json["tokenId"].as_str().unwrap())
        .await
        .unwrap();
    assert_eq!(info.token_type, TokenType::FungibleCommon);
}
