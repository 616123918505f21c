//! bank_agent — conversational front-end for the bank's ledger services.
//!
//! A single POST /chat endpoint turns a free-text request into one of three
//! intents (balance check, deposit, transfer), validates the extracted
//! entities against domain constraints, and dispatches an idempotent
//! transaction to the downstream balance-reader and ledger-writer services.
//!
//! Pipeline per request:
//!
//! ```text
//! bearer header ──► auth::load_context
//! message       ──► IntentResolver (remote NLU, falls back to rules)
//!               ──► transaction::build_transaction
//!               ──► LedgerClient (GET /balances, POST /transactions)
//!               ──► reply::ChatReply
//! ```
//!
//! All state is request-scoped; the only process-wide data is the immutable
//! [`config::AgentConfig`] built once at startup.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod nlu;
pub mod reply;
pub mod router;
pub mod transaction;

pub use config::AgentConfig;
pub use error::AgentError;
