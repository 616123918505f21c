//! Deterministic rule-based extractor.
//!
//! Pattern matching over currency amounts, 10-digit account numbers and
//! 9-digit routing numbers, plus keyword-based intent classification with
//! first-match-wins precedence (balance > deposit > transfer). This is the
//! fallback tier of the resolution strategy and must never fail.

use async_trait::async_trait;
use regex::Regex;

use super::{ExtractError, ExtractedEntities, Intent, IntentExtractor};
use crate::config::AgentConfig;

/// Ordered (keywords, intent) rules. Evaluated top to bottom; the first rule
/// with any keyword contained in the text wins, so "check balance and
/// transfer $5" classifies as a balance check.
const INTENT_RULES: &[(&[&str], Intent)] = &[
    (
        &[
            "balance",
            "how much do i have",
            "what's my balance",
            "check balance",
        ],
        Intent::CheckBalance,
    ),
    (&["deposit", "add money", "cash in"], Intent::Deposit),
    (&["transfer", "send", "pay"], Intent::Transfer),
];

pub struct RuleBasedExtractor {
    amount_re: Regex,
    account_re: Regex,
    routing_re: Regex,
    local_routing: String,
    default_external_account: String,
    default_external_routing: String,
}

impl RuleBasedExtractor {
    pub fn new(config: &AgentConfig) -> Self {
        Self {
            // Optional currency marker, then a decimal with up to two
            // fractional digits. First match in the text wins.
            amount_re: Regex::new(r"\$?\s*([0-9]+(?:\.[0-9]{1,2})?)").expect("amount regex"),
            account_re: Regex::new(r"account\s*(\d{10})").expect("account regex"),
            routing_re: Regex::new(r"routing\s*(\d{9})").expect("routing regex"),
            local_routing: config.local_routing.clone(),
            default_external_account: config.default_external_account.clone(),
            default_external_routing: config.default_external_routing.clone(),
        }
    }

    fn classify(&self, text: &str) -> Intent {
        for (keywords, intent) in INTENT_RULES {
            if keywords.iter().any(|kw| text.contains(kw)) {
                return *intent;
            }
        }
        Intent::Unknown
    }

    fn parse(&self, text: &str) -> ExtractedEntities {
        let t = text.to_lowercase();
        let t = t.trim();

        let amount = self
            .amount_re
            .captures(t)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .map(|v| (v * 100.0).round() as i64);

        // First occurrence: recipient in transfers, may be a source in deposits.
        let to_account = self
            .account_re
            .captures(t)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());

        let mut from_routing = self
            .routing_re
            .captures(t)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());

        let intent = self.classify(t);

        let mut from_account = None;
        if intent == Intent::Deposit {
            // Deposits must originate externally. Default unspecified source
            // details, and never let the bank's own routing number through.
            from_account = Some(self.default_external_account.clone());
            match &from_routing {
                Some(r) if *r != self.local_routing => {}
                _ => from_routing = Some(self.default_external_routing.clone()),
            }
        }

        ExtractedEntities {
            intent,
            amount,
            to_account,
            from_account,
            from_routing,
        }
    }
}

#[async_trait]
impl IntentExtractor for RuleBasedExtractor {
    async fn extract(&self, text: &str) -> Result<ExtractedEntities, ExtractError> {
        Ok(self.parse(text))
    }
}
