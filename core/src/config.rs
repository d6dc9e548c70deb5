use serde::{Deserialize, Serialize};

/// Environment variable that overrides `jwt_secret` from the config file.
pub const SECRET_ENV_VAR: &str = "CALLDESK_JWT_SECRET";

const DEFAULT_TOKEN_TTL_SECONDS: u64 = 12 * 3600;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DeskConfigFile {
    #[serde(default)]
    jwt_secret: Option<String>,
    #[serde(default)]
    token_ttl_seconds: Option<u64>,
    #[serde(default)]
    db_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DeskConfig {
    /// HS256 signing key for bearer tokens. Never compiled in.
    pub jwt_secret: String,
    pub token_ttl_seconds: u64,
    pub db_path: String,
}

impl DeskConfig {
    /// Load from a JSON config file, letting the environment supply the secret.
    /// In tests, use DeskConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let file: DeskConfigFile = serde_json::from_str(&content)?;
        Self::resolve(file, std::env::var(SECRET_ENV_VAR).ok())
    }

    /// Build from the environment alone, for running without a config file.
    pub fn from_env() -> anyhow::Result<Self> {
        let file = DeskConfigFile {
            jwt_secret: None,
            token_ttl_seconds: None,
            db_path: None,
        };
        Self::resolve(file, std::env::var(SECRET_ENV_VAR).ok())
    }

    fn resolve(file: DeskConfigFile, env_secret: Option<String>) -> anyhow::Result<Self> {
        let jwt_secret = env_secret
            .filter(|s| !s.is_empty())
            .or(file.jwt_secret.filter(|s| !s.is_empty()))
            .ok_or_else(|| {
                anyhow::anyhow!("No token secret configured: set jwt_secret or {SECRET_ENV_VAR}")
            })?;
        Ok(Self {
            jwt_secret,
            token_ttl_seconds: file.token_ttl_seconds.unwrap_or(DEFAULT_TOKEN_TTL_SECONDS),
            db_path: file.db_path.unwrap_or_else(|| "calldesk.db".to_string()),
        })
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            jwt_secret: "test-only-secret".into(),
            token_ttl_seconds: 3600,
            db_path: ":memory:".into(),
        }
    }
}
