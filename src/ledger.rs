//! Downstream dispatch to the balance-reader and ledger-writer services.
//!
//! Single-shot calls with bounded timeouts; no retry, no backoff. A
//! non-success upstream status or a timeout is surfaced as
//! [`AgentError::BadGateway`] carrying the upstream status and body verbatim.

use std::time::Duration;

use tracing::debug;

use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::transaction::TransactionRequest;

const BALANCE_TIMEOUT: Duration = Duration::from_secs(10);
const TRANSACTION_TIMEOUT: Duration = Duration::from_secs(15);

pub struct LedgerClient {
    client: reqwest::Client,
    balances_addr: String,
    transactions_addr: String,
}

fn transport_error(e: reqwest::Error) -> AgentError {
    // Timeouts and connection failures have no upstream status to preserve.
    AgentError::BadGateway {
        status: 502,
        body: e.to_string(),
    }
}

impl LedgerClient {
    pub fn new(config: &AgentConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            balances_addr: config.balances_addr.clone(),
            transactions_addr: config.transactions_addr.clone(),
        }
    }

    /// Fetch the caller's balance in minor units. Tolerates either a
    /// JSON-encoded or plain-text integer body.
    pub async fn get_balance(&self, account_id: &str, bearer: &str) -> Result<i64, AgentError> {
        let url = format!("http://{}/balances/{}", self.balances_addr, account_id);
        debug!("fetching balance: {url}");

        let response = self
            .client
            .get(&url)
            .header("Authorization", bearer)
            .timeout(BALANCE_TIMEOUT)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if status.as_u16() != 200 {
            return Err(AgentError::BadGateway {
                status: status.as_u16(),
                body: format!("balance fetch failed: {body}"),
            });
        }

        parse_balance(&body).ok_or_else(|| AgentError::BadGateway {
            status: status.as_u16(),
            body: format!("balance response was not an integer: {body}"),
        })
    }

    /// Submit a transaction to the ledger writer. 200/201 are success.
    pub async fn post_transaction(
        &self,
        tx: &TransactionRequest,
        bearer: &str,
    ) -> Result<(), AgentError> {
        let url = format!("http://{}/transactions", self.transactions_addr);
        debug!("posting transaction {} to {url}", tx.uuid);

        let response = self
            .client
            .post(&url)
            .header("Authorization", bearer)
            .timeout(TRANSACTION_TIMEOUT)
            .json(tx)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !matches!(status.as_u16(), 200 | 201) {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::BadGateway {
                status: status.as_u16(),
                body: format!("transaction failed: {body}"),
            });
        }
        Ok(())
    }
}

fn parse_balance(body: &str) -> Option<i64> {
    serde_json::from_str::<i64>(body)
        .ok()
        .or_else(|| body.trim().parse::<i64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_integer_body() {
        assert_eq!(parse_balance("12345"), Some(12345));
    }

    #[test]
    fn parses_plaintext_integer_body() {
        assert_eq!(parse_balance("  12345\n"), Some(12345));
    }

    #[test]
    fn parses_negative_balance() {
        assert_eq!(parse_balance("-250"), Some(-250));
    }

    #[test]
    fn rejects_non_integer_body() {
        assert_eq!(parse_balance("{\"balance\": 1}"), None);
        assert_eq!(parse_balance("oops"), None);
    }
}
