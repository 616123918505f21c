//! Remote generative-model extractor.
//!
//! Sends the user message with a fixed instruction prompt to a
//! `generateContent`-style endpoint and parses the strict-JSON reply. Every
//! failure mode here (HTTP, API status, empty candidates, malformed JSON) is
//! an [`ExtractError`] that the resolver absorbs — this tier can only improve
//! classification, never break a request.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{ExtractError, ExtractedEntities, Intent, IntentExtractor};
use crate::config::RemoteNluConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const SYSTEM_PROMPT: &str = "You are a banking assistant. Extract intent and entities from the \
user's message. Return ONLY valid compact JSON with keys: intent (one of check_balance, deposit, \
transfer, unknown), amount_cents (integer or null), to_account (10 digits or null), from_account \
(10 digits or null), from_routing (9 digits or null).";

pub struct RemoteModelExtractor {
    config: RemoteNluConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ModelRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ModelResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

/// The strict-JSON contract the prompt demands from the model.
#[derive(Debug, Deserialize)]
struct WireEntities {
    #[serde(default)]
    intent: Option<String>,
    #[serde(default)]
    amount_cents: Option<i64>,
    #[serde(default)]
    to_account: Option<String>,
    #[serde(default)]
    from_account: Option<String>,
    #[serde(default)]
    from_routing: Option<String>,
}

impl RemoteModelExtractor {
    pub fn new(config: RemoteNluConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn request_url(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model,
            self.config.api_key.as_deref().unwrap_or_default(),
        )
    }

    async fn send(&self, text: &str) -> Result<String, ExtractError> {
        let body = ModelRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: format!("{SYSTEM_PROMPT}\n\nMessage: {text}\nJSON:"),
                }],
            }],
        };

        let response = self
            .client
            .post(self.request_url())
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;
        debug!("remote NLU response status: {status}");

        if !status.is_success() {
            return Err(ExtractError::Api {
                status: status.as_u16(),
                body: response_text,
            });
        }

        let parsed: ModelResponse = serde_json::from_str(&response_text)
            .map_err(|e| ExtractError::MalformedOutput(e.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| ExtractError::MalformedOutput("no candidates in response".into()))
    }
}

/// Strip markdown code fences some models wrap JSON in.
fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

fn parse_entities(raw: &str) -> Result<ExtractedEntities, ExtractError> {
    let wire: WireEntities = serde_json::from_str(strip_fences(raw))
        .map_err(|e| ExtractError::MalformedOutput(e.to_string()))?;
    Ok(ExtractedEntities {
        intent: wire.intent.as_deref().map(Intent::from).unwrap_or(Intent::Unknown),
        amount: wire.amount_cents,
        to_account: wire.to_account,
        from_account: wire.from_account,
        from_routing: wire.from_routing,
    })
}

#[async_trait]
impl IntentExtractor for RemoteModelExtractor {
    async fn extract(&self, text: &str) -> Result<ExtractedEntities, ExtractError> {
        if !self.config.is_usable() {
            return Err(ExtractError::NotConfigured);
        }
        let raw = self.send(text).await?;
        parse_entities(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_strict_json_output() {
        let raw = r#"{"intent":"transfer","amount_cents":2500,"to_account":"1234567890","from_account":null,"from_routing":null}"#;
        let e = parse_entities(raw).expect("parse");
        assert_eq!(e.intent, Intent::Transfer);
        assert_eq!(e.amount, Some(2500));
        assert_eq!(e.to_account.as_deref(), Some("1234567890"));
        assert!(e.from_account.is_none());
    }

    #[test]
    fn parses_fenced_output() {
        let raw = "```json\n{\"intent\":\"deposit\",\"amount_cents\":500}\n```";
        let e = parse_entities(raw).expect("parse");
        assert_eq!(e.intent, Intent::Deposit);
        assert_eq!(e.amount, Some(500));
    }

    #[test]
    fn unknown_intent_string_maps_to_unknown() {
        let e = parse_entities(r#"{"intent":"buy_stocks"}"#).expect("parse");
        assert_eq!(e.intent, Intent::Unknown);
    }

    #[test]
    fn missing_intent_key_maps_to_unknown() {
        let e = parse_entities(r#"{"amount_cents":100}"#).expect("parse");
        assert_eq!(e.intent, Intent::Unknown);
        assert_eq!(e.amount, Some(100));
    }

    #[test]
    fn prose_output_is_malformed() {
        let err = parse_entities("I think the user wants a transfer.").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedOutput(_)));
    }

    #[test]
    fn request_url_embeds_model_and_key() {
        let extractor = RemoteModelExtractor::new(RemoteNluConfig {
            enabled: true,
            api_key: Some("k123".into()),
            model: "gemini-1.5-pro".into(),
            endpoint: "https://example.test/v1beta/models/".into(),
        });
        assert_eq!(
            extractor.request_url(),
            "https://example.test/v1beta/models/gemini-1.5-pro:generateContent?key=k123"
        );
    }
}
