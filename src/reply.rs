//! Response formatting — pure functions from pipeline outcome to the reply.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::nlu::{ExtractedEntities, Intent};
use crate::transaction::TransactionRequest;

pub const HELP_TEXT: &str = "I can help you check your balance, deposit, or transfer money. \
Try: 'What's my balance?', 'Deposit $50', or 'Transfer $25 to account 1234567890'.";

/// The /chat response body. Discarded after serialization.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    pub intent: Intent,
    pub details: serde_json::Value,
}

/// Render minor units as `$<whole>.<two-digit fraction>`, negatives with a
/// leading `-`.
pub fn format_cents(amount_cents: i64) -> String {
    let sign = if amount_cents < 0 { "-" } else { "" };
    let cents = amount_cents.unsigned_abs();
    format!("{sign}${}.{:02}", cents / 100, cents % 100)
}

pub fn balance_reply(display_name: &str, balance_cents: i64) -> ChatReply {
    ChatReply {
        reply: format!(
            "Hi {display_name}, your current balance is {}.",
            format_cents(balance_cents)
        ),
        intent: Intent::CheckBalance,
        details: json!({ "balance_cents": balance_cents }),
    }
}

pub fn transfer_reply(tx: &TransactionRequest) -> ChatReply {
    ChatReply {
        reply: format!(
            "Transferred {} to account {}.",
            format_cents(tx.amount),
            tx.to_account_num
        ),
        intent: Intent::Transfer,
        details: json!({ "to_account": tx.to_account_num, "amount_cents": tx.amount }),
    }
}

pub fn deposit_reply(tx: &TransactionRequest) -> ChatReply {
    ChatReply {
        reply: format!("Deposited {} into your account.", format_cents(tx.amount)),
        intent: Intent::Deposit,
        details: json!({ "amount_cents": tx.amount }),
    }
}

/// Unknown intent: fixed help text plus the raw extraction for caller-side
/// debugging.
pub fn help_reply(entities: &ExtractedEntities) -> ChatReply {
    ChatReply {
        reply: HELP_TEXT.to_string(),
        intent: Intent::Unknown,
        details: json!({ "nlu": entities }),
    }
}
