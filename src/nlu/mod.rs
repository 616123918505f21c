//! Intent extraction — the two-tier resolution strategy.
//!
//! Extractors implement [`IntentExtractor`]; the [`IntentResolver`] is an
//! ordered-fallback combinator over them. The remote generative-model
//! extractor runs first when enabled and configured; any failure there
//! (misconfiguration, network error, malformed model output) is absorbed and
//! the deterministic rule-based extractor runs instead. Exactly one extractor
//! completes per request, and the caller never sees a degraded-mode error.

pub mod remote;
pub mod rules;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::AgentConfig;
use self::remote::RemoteModelExtractor;
use self::rules::RuleBasedExtractor;

/// The caller's classified goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    CheckBalance,
    Deposit,
    Transfer,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::CheckBalance => "check_balance",
            Intent::Deposit => "deposit",
            Intent::Transfer => "transfer",
            Intent::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Intent {
    fn from(s: &str) -> Self {
        match s {
            "check_balance" => Intent::CheckBalance,
            "deposit" => Intent::Deposit,
            "transfer" => Intent::Transfer,
            _ => Intent::Unknown,
        }
    }
}

/// Structured candidate produced by whichever extractor ran.
/// Immutable once produced; unmatched fields stay absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    pub intent: Intent,
    /// Currency minor units (cents).
    pub amount: Option<i64>,
    pub to_account: Option<String>,
    pub from_account: Option<String>,
    pub from_routing: Option<String>,
}

impl ExtractedEntities {
    pub fn unknown() -> Self {
        Self {
            intent: Intent::Unknown,
            amount: None,
            to_account: None,
            from_account: None,
            from_routing: None,
        }
    }
}

/// Errors internal to an extraction attempt. Never surfaced to the caller;
/// the resolver logs them and falls back.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("remote model not configured")]
    NotConfigured,
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("model returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("malformed model output: {0}")]
    MalformedOutput(String),
}

/// An intent-extraction strategy. Adding a variant never touches the
/// transaction builder.
#[async_trait]
pub trait IntentExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<ExtractedEntities, ExtractError>;
}

/// Ordered-fallback combinator: remote model first (when usable), then the
/// deterministic rule-based extractor, which is total.
pub struct IntentResolver {
    remote: Option<RemoteModelExtractor>,
    rules: RuleBasedExtractor,
}

impl IntentResolver {
    pub fn new(config: &AgentConfig) -> Self {
        let remote = config
            .remote_nlu
            .is_usable()
            .then(|| RemoteModelExtractor::new(config.remote_nlu.clone()));
        Self {
            remote,
            rules: RuleBasedExtractor::new(config),
        }
    }

    /// Resolve intent and entities for a user message. Total — remote
    /// failures degrade classification quality, never the request.
    pub async fn resolve(&self, text: &str) -> ExtractedEntities {
        if let Some(remote) = &self.remote {
            match remote.extract(text).await {
                Ok(entities) => return entities,
                Err(e) => {
                    tracing::warn!("remote NLU failed, falling back to rules: {e}");
                }
            }
        }
        // Rule-based extraction is infallible.
        self.rules
            .extract(text)
            .await
            .unwrap_or_else(|_| ExtractedEntities::unknown())
    }
}
