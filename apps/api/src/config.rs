use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL backing the document store. `None` runs on the in-memory store.
    pub database_url: Option<String>,
    /// Redis backing the session revocation list. `None` keeps it in memory.
    pub redis_url: Option<String>,
    pub gemini_api_key: String,
    /// HS256 key used to sign and verify session cookies.
    pub session_secret: String,
    /// HS256 key shared with the identity provider for identity tokens.
    pub identity_jwt_secret: String,
    pub app_env: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            redis_url: optional_env("REDIS_URL"),
            gemini_api_key: require_env("GOOGLE_GENERATIVE_AI_API_KEY")?,
            session_secret: require_env("SESSION_SECRET")?,
            identity_jwt_secret: require_env("IDENTITY_JWT_SECRET")?,
            app_env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Session cookies carry `Secure` only in production.
    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            database_url: None,
            redis_url: None,
            gemini_api_key: "test-key".to_string(),
            session_secret: "test-session-secret".to_string(),
            identity_jwt_secret: "test-identity-secret".to_string(),
            app_env: "development".to_string(),
            port: 8080,
            rust_log: "debug".to_string(),
        }
    }
}
