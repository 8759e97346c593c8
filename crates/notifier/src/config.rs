//! SMTP configuration.

use secrecy::{ExposeSecret, SecretString};
use std::env;

use crate::error::NotifierError;

/// Configuration for the SMTP sender.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP relay host.
    pub host: String,
    /// SMTP port (default: 587, STARTTLS).
    pub port: u16,
    /// SMTP username; also the From address.
    pub username: String,
    /// SMTP password.
    password: SecretString,
}

impl SmtpConfig {
    /// Create a configuration with explicit values.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Required:
    /// - `SMTP_USERNAME` - sender email address
    /// - `SMTP_PASSWORD` - SMTP password
    ///
    /// Optional (with defaults):
    /// - `SMTP_HOST` - Default: smtp.gmail.com
    /// - `SMTP_PORT` - Default: 587
    pub fn from_env() -> Result<Self, NotifierError> {
        let username = env::var("SMTP_USERNAME").map_err(|_| {
            NotifierError::Configuration("SMTP_USERNAME environment variable not set".into())
        })?;
        let password = env::var("SMTP_PASSWORD").map_err(|_| {
            NotifierError::Configuration("SMTP_PASSWORD environment variable not set".into())
        })?;
        let host = env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string());
        let port = env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(587);

        Ok(Self {
            host,
            port,
            username,
            password: SecretString::from(password),
        })
    }

    /// The SMTP password.
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_config() {
        let config = SmtpConfig::new("smtp.example.com", 2525, "bot@example.com", "hunter2");
        assert_eq!(config.host, "smtp.example.com");
        assert_eq!(config.port, 2525);
        assert_eq!(config.password(), "hunter2");
    }
}
