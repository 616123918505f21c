//! bank_agent — conversational front-end for the bank's ledger services.
//!
//! Configuration is read from env vars once at startup; see
//! `config::AgentConfig` for the full surface.

use std::sync::Arc;

use anyhow::Context;
use bank_agent::config::AgentConfig;
use bank_agent::router::{build_router, AgentState};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AgentConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{},tower_http=info", config.log_level).into()),
        )
        .init();

    let public_key = config.load_public_key();
    if public_key.is_none() {
        tracing::warn!("running WITHOUT JWT verification — tokens are decoded unverified");
    }

    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AgentState::new(config, public_key));
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind to {bind_addr}"))?;
    tracing::info!("bank_agent listening on {bind_addr}");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
