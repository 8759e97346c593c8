//! Twilio client error types.

use thiserror::Error;

/// Errors that can occur talking to the Twilio REST API.
#[derive(Debug, Error)]
pub enum TwilioError {
    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// HTTP transport failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status.
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },
}
