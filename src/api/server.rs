//! API Server Module
//!
//! This module wires the account and token handlers into an axum router and
//! serves it over HTTP. The same routing table is mounted once per API
//! version prefix, so `/api/tokens` and `/api/v1/tokens` are the same
//! handler.

use super::{accounts, tokens};
use crate::{config::Config, ledger::Ledger, validation::Validator};
use axum::{
    extract::Request,
    http::header,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Prefixes the routing table is mounted under.
pub const API_VERSIONS: [&str; 2] = ["/api", "/api/v1"];

/// Shared application state that is accessible across all request handlers
///
/// - `validator`: network selection and required-field policy
/// - `ledger`: the backend every operation is submitted to
#[derive(Clone)]
pub struct AppState {
    pub(crate) validator: Arc<Validator>,
    pub(crate) ledger: Arc<dyn Ledger>,
}

impl AppState {
    pub fn new(ledger: Arc<dyn Ledger>, validator: Validator) -> Self {
        Self {
            validator: Arc::new(validator),
            ledger,
        }
    }
}

/// The main API server struct
///
/// Encapsulates the server configuration and application state.
pub struct Server {
    config: Config,
    state: AppState,
}

impl Server {
    /// Creates a new API server instance
    ///
    /// # Arguments
    /// * `config` - Server configuration (host, port, network policy)
    /// * `ledger` - The ledger backend requests are submitted to
    pub fn new(config: Config, ledger: Arc<dyn Ledger>) -> Self {
        let validator = Validator::new(config.network.strict);
        let state = AppState::new(ledger, validator);
        Self { config, state }
    }

    /// Starts the API server and begins listening for incoming requests
    ///
    /// # Returns
    /// `Ok(())` when the server shuts down, or an error if binding fails
    pub async fn start(self) -> anyhow::Result<()> {
        let app = router(self.state);

        let addr = format!("{}:{}", self.config.api.host, self.config.api.port);
        info!("API server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Build the full application router.
///
/// Unmatched routes fall through to axum's default 404.
pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/", get(index))
        .route("/health", get(health));

    for prefix in API_VERSIONS {
        app = app.nest(prefix, routes());
    }

    app.layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
        let user_agent = request
            .headers()
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("-");
        tracing::info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path(),
            user_agent = %user_agent,
        )
    }))
    .with_state(state)
}

/// One routing table, mounted under every prefix in [`API_VERSIONS`].
fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(accounts::create_account))
        .route("/accounts/:id/update", put(accounts::update_account))
        .route("/tokens", post(tokens::create_token))
        .route("/tokens/:id/mint", post(tokens::mint_token))
        .route("/tokens/:id/burn", post(tokens::burn_token))
        .route("/tokens/:id/transfer", post(tokens::transfer_token))
        .route("/tokens/:id/associate", post(tokens::associate_token))
        .route("/tokens/:id/dissociate", post(tokens::dissociate_token))
        .route("/tokens/:id/update", put(tokens::update_token))
        .route("/tokens/:id/delete", delete(tokens::delete_token))
}

async fn index() -> &'static str {
    "Hello World! This is the Hedera Tools project."
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
