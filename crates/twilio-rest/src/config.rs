//! Twilio client configuration.

use crate::error::TwilioError;

/// Configuration for the Twilio REST client.
///
/// # Environment Variables
///
/// | Variable | Required | Default | Description |
/// |----------|----------|---------|-------------|
/// | `TWILIO_ACCOUNT_SID` | Yes | - | Account SID used for auth and URL paths |
/// | `TWILIO_AUTH_TOKEN` | Yes | - | API auth token (basic auth password) |
/// | `TWILIO_API_URL` | No | `https://api.twilio.com` | Override for tests |
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    /// Account SID (`AC...`).
    pub account_sid: String,
    /// Auth token paired with the account SID.
    pub auth_token: String,
    /// API base URL, without a trailing slash.
    pub api_url: String,
}

const DEFAULT_API_URL: &str = "https://api.twilio.com";

impl TwilioConfig {
    /// Create a config from explicit credentials.
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, TwilioError> {
        let account_sid = std::env::var("TWILIO_ACCOUNT_SID").map_err(|_| {
            TwilioError::Configuration("TWILIO_ACCOUNT_SID environment variable not set".into())
        })?;
        let auth_token = std::env::var("TWILIO_AUTH_TOKEN").map_err(|_| {
            TwilioError::Configuration("TWILIO_AUTH_TOKEN environment variable not set".into())
        })?;
        let api_url = std::env::var("TWILIO_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            account_sid,
            auth_token,
            api_url,
        })
    }

    /// Set a custom API base URL (for tests).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_url() {
        let config = TwilioConfig::new("AC123", "secret");
        assert_eq!(config.api_url, "https://api.twilio.com");
        assert_eq!(config.account_sid, "AC123");
    }

    #[test]
    fn test_with_api_url_strips_trailing_slash() {
        let config = TwilioConfig::new("AC123", "secret").with_api_url("http://localhost:4000/");
        assert_eq!(config.api_url, "http://localhost:4000");
    }
}
