//! Configuration loaded from environment variables.
//!
//! Server-level settings come from the environment. Provider credentials
//! (OpenAI, Twilio, SMTP) additionally check the persisted settings table
//! first, so a deployment can rotate them from the dashboard without a
//! restart of the environment; see [`credential`].

use std::env;
use std::net::SocketAddr;

use database::{setting, Database};

/// Dashboard web server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Public base URL of this deployment (webhooks, email deep links).
    pub public_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `BIND_ADDR` | Server bind address | `127.0.0.1:8080` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:frontdesk.db?mode=rwc` |
    /// | `PUBLIC_URL` | Public base URL | `http://127.0.0.1:8080` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url =
            env::var("SQLITE_PATH").unwrap_or_else(|_| "sqlite:frontdesk.db?mode=rwc".to_string());

        let public_url = env::var("PUBLIC_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            addr,
            database_url,
            public_url,
        })
    }
}

/// A provider credential: settings-table value first, environment fallback.
pub async fn credential(db: &Database, setting_key: &str, env_var: &str) -> Option<String> {
    match setting::get_setting(db.pool(), setting_key).await {
        Ok(Some(value)) if !value.trim().is_empty() => return Some(value),
        Ok(_) => {}
        Err(e) => tracing::warn!("Failed to read setting {}: {}", setting_key, e),
    }
    env::var(env_var).ok().filter(|v| !v.trim().is_empty())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid BIND_ADDR format")]
    InvalidAddr,
}
