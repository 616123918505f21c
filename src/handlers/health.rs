//! Liveness, version, and discovery endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::router::AgentState;

/// GET /ready — static liveness marker.
pub async fn ready() -> &'static str {
    "ok"
}

/// GET /version — configured version string, plain text.
pub async fn version(State(state): State<Arc<AgentState>>) -> String {
    state.config.version.clone()
}

/// GET / — discovery document.
pub async fn discovery(State(state): State<Arc<AgentState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "bank-agent",
        "version": state.config.version,
        "endpoints": ["/ready", "/version", "/chat", "/ui"],
        "message": "Try GET /ready or POST /chat with a Bearer token.",
    }))
}
