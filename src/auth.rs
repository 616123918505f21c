//! Authorization context loading from the bearer credential.
//!
//! The token is verified against the configured RS256 public key when one is
//! available. When the key is missing or verification fails, the payload is
//! decoded WITHOUT signature verification and the degradation is logged —
//! downstream services are expected to verify the same token themselves.
//! Only a token whose payload cannot be decoded at all is rejected.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::error::AgentError;

/// Claims carried by the bank's identity tokens.
#[derive(Debug, Deserialize)]
pub struct TokenClaims {
    /// Account identifier, opaque numeric string.
    pub acct: Option<String>,
    /// Display name for greeting the caller.
    pub user: Option<String>,
}

/// Per-request authorization context. Never persisted.
#[derive(Debug)]
pub struct AuthContext {
    pub claims: TokenClaims,
    /// The raw `Bearer ...` header value, forwarded to downstream services.
    pub bearer: String,
}

/// Decode the bearer header into an [`AuthContext`].
///
/// Fails with `Unauthorized` when the header is absent/empty or the token
/// payload is undecodable. A missing account claim is NOT rejected here; the
/// chat handler maps that to `BadRequest`.
pub fn load_context(
    bearer_header: Option<&str>,
    public_key: Option<&DecodingKey>,
) -> Result<AuthContext, AgentError> {
    let bearer = match bearer_header {
        Some(h) if !h.trim().is_empty() => h.to_string(),
        _ => {
            return Err(AgentError::Unauthorized(
                "missing Authorization bearer token".into(),
            ))
        }
    };

    let token = strip_bearer_scheme(&bearer);

    if let Some(key) = public_key {
        let mut validation = Validation::new(Algorithm::RS256);
        // Downstream services perform their own audience checks.
        validation.validate_aud = false;
        match jsonwebtoken::decode::<TokenClaims>(token, key, &validation) {
            Ok(data) => {
                return Ok(AuthContext {
                    claims: data.claims,
                    bearer,
                })
            }
            Err(e) => {
                tracing::warn!("JWT verification failed, decoding without verification: {e}");
            }
        }
    }

    let claims = decode_unverified(token)
        .ok_or_else(|| AgentError::Unauthorized("invalid token".into()))?;
    Ok(AuthContext { claims, bearer })
}

fn strip_bearer_scheme(header: &str) -> &str {
    let trimmed = header.trim();
    match trimmed.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("bearer ") => trimmed[7..].trim_start(),
        _ => trimmed,
    }
}

/// Last-resort decode: split the compact form and parse the payload segment.
fn decode_unverified(token: &str) -> Option<TokenClaims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}
