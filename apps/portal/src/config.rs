use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

/// Portal configuration loaded from environment variables.
/// Fails at startup if the backend URL is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    /// Bearer token handed to the HTTP layer by `main`; never read ambiently.
    pub api_token: Option<String>,
    pub http_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let api_url = require_env("PORTAL_API_URL")?;
        let api_url = Url::parse(&api_url)
            .with_context(|| format!("PORTAL_API_URL '{api_url}' is not an absolute URL"))?;

        let http_timeout = std::env::var("PORTAL_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .context("PORTAL_HTTP_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Config {
            api_url,
            api_token: std::env::var("PORTAL_API_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            http_timeout: Duration::from_secs(http_timeout),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
