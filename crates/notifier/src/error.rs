//! Notifier error types.

use thiserror::Error;

/// Errors from building or sending a notification email.
#[derive(Debug, Error)]
pub enum NotifierError {
    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A recipient or sender address failed to parse.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// SMTP transport setup failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// SMTP send failure.
    #[error("send error: {0}")]
    Send(String),
}
