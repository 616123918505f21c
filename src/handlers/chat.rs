//! POST /chat — the orchestration core.
//!
//! auth context → intent resolution → transaction build/validate →
//! downstream dispatch → formatted reply. Validation failures terminate the
//! request before any network call.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::auth;
use crate::error::AgentError;
use crate::nlu::Intent;
use crate::reply::{self, ChatReply};
use crate::router::AgentState;
use crate::transaction::build_transaction;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's natural-language request.
    pub message: String,
    /// Optional session id; accepted but unused, the exchange is stateless.
    #[serde(default)]
    pub session_id: Option<String>,
}

pub async fn chat(
    State(state): State<Arc<AgentState>>,
    headers: HeaderMap,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AgentError> {
    let bearer = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let ctx = auth::load_context(bearer, state.public_key.as_ref())?;

    let account_id = ctx
        .claims
        .acct
        .clone()
        .ok_or_else(|| AgentError::BadRequest("token missing account id".into()))?;
    let display_name = ctx.claims.user.clone().unwrap_or_else(|| "there".into());

    let entities = state.resolver.resolve(&req.message).await;
    info!(intent = %entities.intent, "resolved chat intent");

    let chat_reply = match entities.intent {
        Intent::CheckBalance => {
            let balance = state.ledger.get_balance(&account_id, &ctx.bearer).await?;
            reply::balance_reply(&display_name, balance)
        }
        Intent::Transfer | Intent::Deposit => {
            let tx = build_transaction(&entities, &account_id, &state.config)?;
            state.ledger.post_transaction(&tx, &ctx.bearer).await?;
            match entities.intent {
                Intent::Transfer => reply::transfer_reply(&tx),
                _ => reply::deposit_reply(&tx),
            }
        }
        Intent::Unknown => reply::help_reply(&entities),
    };

    Ok(Json(chat_reply))
}
