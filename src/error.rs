//! Error taxonomy for the chat pipeline.
//!
//! Validation failures are detected before any network call; downstream
//! failures carry the upstream status and body verbatim so callers can see
//! what the ledger actually said. Unknown intent is not an error — it is a
//! terminal state handled in the chat handler.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    /// Missing or undecodable bearer credential.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Missing account claim, invalid amount, or malformed account/routing.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Downstream non-success status or timeout, upstream detail preserved.
    #[error("upstream error ({status}): {body}")]
    BadGateway { status: u16, body: String },

    #[error("internal: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AgentError {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::BadGateway { .. } => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AgentError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
