//! Error types for brain operations.

use thiserror::Error;

/// Errors that can occur during brain processing.
#[derive(Debug, Error)]
pub enum BrainError {
    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network failure talking to the backing API.
    #[error("network error: {0}")]
    Network(String),

    /// The backing API rejected the request or returned garbage.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),
}
