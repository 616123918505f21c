//! Process-wide configuration, read from env vars once at startup.
//!
//! Env surface:
//!   LOCAL_ROUTING_NUM        — this bank's routing number (default: 883745000)
//!   PUB_KEY_PATH             — JWT RS256 public key PEM (default: /tmp/.ssh/publickey)
//!   BALANCES_API_ADDR        — balance reader host:port (default: balancereader:8080)
//!   TRANSACTIONS_API_ADDR    — ledger writer host:port (default: ledgerwriter:8080)
//!   DEFAULT_EXTERNAL_ACCOUNT — deposit source fallback (default: 1111111111)
//!   DEFAULT_EXTERNAL_ROUTING — deposit routing fallback (default: 222222222)
//!   USE_REMOTE_NLU           — enable the generative-model extractor (default: false)
//!   REMOTE_NLU_API_KEY       — remote model API key (required when enabled)
//!   REMOTE_NLU_MODEL         — model id (default: gemini-1.5-pro)
//!   REMOTE_NLU_ENDPOINT      — generateContent base URL (default: hosted API)
//!   VERSION                  — reported version string (default: v0.1.0)
//!   LOG_LEVEL                — default tracing filter level (default: info)
//!   BIND_ADDR                — listen address (default: 0.0.0.0:8080)

use jsonwebtoken::DecodingKey;

/// Connection parameters for the optional remote intent model.
#[derive(Debug, Clone)]
pub struct RemoteNluConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
}

impl RemoteNluConfig {
    /// Minimally configured means enabled with credentials present.
    pub fn is_usable(&self) -> bool {
        self.enabled && self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// Immutable configuration passed explicitly into each component constructor.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub local_routing: String,
    pub balances_addr: String,
    pub transactions_addr: String,
    pub default_external_account: String,
    pub default_external_routing: String,
    pub remote_nlu: RemoteNluConfig,
    pub version: String,
    pub log_level: String,
    pub bind_addr: String,
    pub pub_key_path: String,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_flag(key: &str) -> bool {
    matches!(
        std::env::var(key).unwrap_or_default().to_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

impl AgentConfig {
    pub fn from_env() -> Self {
        Self {
            local_routing: env_or("LOCAL_ROUTING_NUM", "883745000"),
            balances_addr: env_or("BALANCES_API_ADDR", "balancereader:8080"),
            transactions_addr: env_or("TRANSACTIONS_API_ADDR", "ledgerwriter:8080"),
            default_external_account: env_or("DEFAULT_EXTERNAL_ACCOUNT", "1111111111"),
            default_external_routing: env_or("DEFAULT_EXTERNAL_ROUTING", "222222222"),
            remote_nlu: RemoteNluConfig {
                enabled: env_flag("USE_REMOTE_NLU"),
                api_key: std::env::var("REMOTE_NLU_API_KEY").ok(),
                model: env_or("REMOTE_NLU_MODEL", "gemini-1.5-pro"),
                endpoint: env_or(
                    "REMOTE_NLU_ENDPOINT",
                    "https://generativelanguage.googleapis.com/v1beta/models",
                ),
            },
            version: env_or("VERSION", "v0.1.0"),
            log_level: env_or("LOG_LEVEL", "info"),
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:8080"),
            pub_key_path: env_or("PUB_KEY_PATH", "/tmp/.ssh/publickey"),
        }
    }

    /// Load the RS256 public key for verified JWT decoding.
    ///
    /// A missing or unparseable key is not fatal — the auth loader then runs
    /// in unverified-decode mode, which is logged on every request.
    pub fn load_public_key(&self) -> Option<DecodingKey> {
        let pem = match std::fs::read(&self.pub_key_path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("public key not found at {}: {e}", self.pub_key_path);
                return None;
            }
        };
        match DecodingKey::from_rsa_pem(&pem) {
            Ok(key) => Some(key),
            Err(e) => {
                tracing::warn!("public key at {} is not valid PEM: {e}", self.pub_key_path);
                None
            }
        }
    }
}

/// Config for tests — local routing and defaults match the documented env
/// defaults, downstream addrs point nowhere until a test overrides them.
#[cfg(test)]
pub fn test_config() -> AgentConfig {
    AgentConfig {
        local_routing: "883745000".into(),
        balances_addr: "127.0.0.1:1".into(),
        transactions_addr: "127.0.0.1:1".into(),
        default_external_account: "1111111111".into(),
        default_external_routing: "222222222".into(),
        remote_nlu: RemoteNluConfig {
            enabled: false,
            api_key: None,
            model: "test".into(),
            endpoint: "http://127.0.0.1:1".into(),
        },
        version: "v0.0.0-test".into(),
        log_level: "debug".into(),
        bind_addr: "127.0.0.1:0".into(),
        pub_key_path: "/nonexistent".into(),
    }
}
