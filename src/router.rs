//! Router construction and shared application state.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use jsonwebtoken::DecodingKey;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::AgentConfig;
use crate::handlers;
use crate::ledger::LedgerClient;
use crate::nlu::IntentResolver;

/// Shared per-process state. Everything inside is immutable after startup,
/// so requests can run with arbitrary parallelism.
pub struct AgentState {
    pub config: AgentConfig,
    pub resolver: IntentResolver,
    pub ledger: LedgerClient,
    pub public_key: Option<DecodingKey>,
}

impl AgentState {
    pub fn new(config: AgentConfig, public_key: Option<DecodingKey>) -> Self {
        Self {
            resolver: IntentResolver::new(&config),
            ledger: LedgerClient::new(&config),
            public_key,
            config,
        }
    }
}

/// Build the full axum router with all routes and middleware.
pub fn build_router(state: Arc<AgentState>) -> Router {
    Router::new()
        .route("/chat", post(handlers::chat::chat))
        .route("/ready", get(handlers::health::ready))
        .route("/version", get(handlers::health::version))
        .route("/", get(handlers::health::discovery))
        .route("/ui", get(handlers::ui::ui))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
