//! Transaction building and validation.
//!
//! The per-intent state machine that turns extracted entities plus the
//! caller's authorization context into a canonical ledger transaction.
//! Validation happens entirely here, before any network call. Transfers are
//! intra-bank by construction, so both legs carry the local routing number;
//! deposits must originate externally, so a source routing equal to the local
//! routing number is rewritten to the configured external default even if the
//! extractor proposed it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::nlu::{ExtractedEntities, Intent};

/// The ledger wire format. Field names match the ledger-writer API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// Positive amount in currency minor units.
    pub amount: i64,
    /// Idempotency token, fresh per build. Downstream dedupes on it.
    pub uuid: Uuid,
    pub from_account_num: String,
    pub from_routing_num: String,
    pub to_account_num: String,
    pub to_routing_num: String,
}

fn is_account_number(s: &str) -> bool {
    s.len() == 10 && s.bytes().all(|b| b.is_ascii_digit())
}

/// Build a validated transaction for a `Transfer` or `Deposit` intent.
///
/// `CheckBalance` and `Unknown` short-circuit in the chat handler and never
/// reach this function. Any violation fails with `BadRequest` and a message
/// naming the violation.
pub fn build_transaction(
    entities: &ExtractedEntities,
    caller_account: &str,
    config: &AgentConfig,
) -> Result<TransactionRequest, AgentError> {
    let amount = match entities.amount {
        Some(a) if a > 0 => a,
        _ => {
            return Err(AgentError::BadRequest(
                "please specify a positive amount".into(),
            ))
        }
    };

    let tx = match entities.intent {
        Intent::Transfer => {
            let to_account = entities
                .to_account
                .as_deref()
                .filter(|a| is_account_number(a))
                .ok_or_else(|| {
                    AgentError::BadRequest(
                        "please provide a valid 10-digit recipient account".into(),
                    )
                })?;
            TransactionRequest {
                amount,
                uuid: Uuid::new_v4(),
                from_account_num: caller_account.to_string(),
                from_routing_num: config.local_routing.clone(),
                to_account_num: to_account.to_string(),
                to_routing_num: config.local_routing.clone(),
            }
        }
        Intent::Deposit => {
            let from_account = entities
                .from_account
                .clone()
                .unwrap_or_else(|| config.default_external_account.clone());
            // External-origin invariant, re-asserted regardless of extractor.
            let from_routing = match entities.from_routing.clone() {
                Some(r) if r != config.local_routing => r,
                _ => config.default_external_routing.clone(),
            };
            TransactionRequest {
                amount,
                uuid: Uuid::new_v4(),
                from_account_num: from_account,
                from_routing_num: from_routing,
                to_account_num: caller_account.to_string(),
                to_routing_num: config.local_routing.clone(),
            }
        }
        Intent::CheckBalance | Intent::Unknown => {
            return Err(AgentError::BadRequest(format!(
                "no transaction for intent {}",
                entities.intent
            )))
        }
    };

    Ok(tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    fn entities(intent: Intent) -> ExtractedEntities {
        ExtractedEntities {
            intent,
            amount: Some(2500),
            to_account: Some("1234567890".into()),
            from_account: None,
            from_routing: None,
        }
    }

    const CALLER: &str = "9999999999";

    // ── Transfer ─────────────────────────────────────────────────

    #[test]
    fn transfer_uses_local_routing_on_both_legs() {
        let cfg = test_config();
        let tx = build_transaction(&entities(Intent::Transfer), CALLER, &cfg).unwrap();
        assert_eq!(tx.amount, 2500);
        assert_eq!(tx.from_account_num, CALLER);
        assert_eq!(tx.from_routing_num, cfg.local_routing);
        assert_eq!(tx.to_account_num, "1234567890");
        assert_eq!(tx.to_routing_num, cfg.local_routing);
    }

    #[test]
    fn transfer_rejects_missing_recipient() {
        let mut e = entities(Intent::Transfer);
        e.to_account = None;
        let err = build_transaction(&e, CALLER, &test_config()).unwrap_err();
        assert!(matches!(err, AgentError::BadRequest(_)));
    }

    #[test]
    fn transfer_rejects_short_recipient() {
        let mut e = entities(Intent::Transfer);
        e.to_account = Some("12345".into());
        let err = build_transaction(&e, CALLER, &test_config()).unwrap_err();
        assert!(err.to_string().contains("10-digit"));
    }

    #[test]
    fn transfer_rejects_non_numeric_recipient() {
        let mut e = entities(Intent::Transfer);
        e.to_account = Some("12345678ab".into());
        assert!(build_transaction(&e, CALLER, &test_config()).is_err());
    }

    // ── Amount validation ────────────────────────────────────────

    #[test]
    fn missing_amount_is_rejected() {
        let mut e = entities(Intent::Transfer);
        e.amount = None;
        let err = build_transaction(&e, CALLER, &test_config()).unwrap_err();
        assert!(err.to_string().contains("positive amount"));
    }

    #[test]
    fn zero_and_negative_amounts_are_rejected() {
        for amount in [0, -100] {
            let mut e = entities(Intent::Deposit);
            e.amount = Some(amount);
            assert!(build_transaction(&e, CALLER, &test_config()).is_err());
        }
    }

    // ── Deposit ──────────────────────────────────────────────────

    #[test]
    fn deposit_defaults_to_configured_external_source() {
        let cfg = test_config();
        let mut e = entities(Intent::Deposit);
        e.from_account = None;
        e.from_routing = None;
        let tx = build_transaction(&e, CALLER, &cfg).unwrap();
        assert_eq!(tx.from_account_num, cfg.default_external_account);
        assert_eq!(tx.from_routing_num, cfg.default_external_routing);
        assert_eq!(tx.to_account_num, CALLER);
        assert_eq!(tx.to_routing_num, cfg.local_routing);
    }

    #[test]
    fn deposit_never_originates_from_local_routing() {
        let cfg = test_config();
        let mut e = entities(Intent::Deposit);
        e.from_routing = Some(cfg.local_routing.clone());
        let tx = build_transaction(&e, CALLER, &cfg).unwrap();
        assert_eq!(tx.from_routing_num, cfg.default_external_routing);
        assert_ne!(tx.from_routing_num, cfg.local_routing);
    }

    #[test]
    fn deposit_keeps_explicit_external_source() {
        let mut e = entities(Intent::Deposit);
        e.from_account = Some("2223334444".into());
        e.from_routing = Some("123456789".into());
        let tx = build_transaction(&e, CALLER, &test_config()).unwrap();
        assert_eq!(tx.from_account_num, "2223334444");
        assert_eq!(tx.from_routing_num, "123456789");
    }

    // ── Idempotency token ────────────────────────────────────────

    #[test]
    fn each_build_gets_a_fresh_idempotency_token() {
        let e = entities(Intent::Transfer);
        let a = build_transaction(&e, CALLER, &test_config()).unwrap();
        let b = build_transaction(&e, CALLER, &test_config()).unwrap();
        assert_ne!(a.uuid, b.uuid);
    }

    // ── Wire format ──────────────────────────────────────────────

    #[test]
    fn serializes_with_ledger_field_names() {
        let tx = build_transaction(&entities(Intent::Transfer), CALLER, &test_config()).unwrap();
        let json = serde_json::to_value(&tx).unwrap();
        for key in [
            "amount",
            "uuid",
            "fromAccountNum",
            "fromRoutingNum",
            "toAccountNum",
            "toRoutingNum",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
    }
}
