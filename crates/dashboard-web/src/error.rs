//! Error types for the dashboard API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors that can occur in the dashboard API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] database::DatabaseError),

    /// Billing error.
    #[error("Billing error: {0}")]
    Billing(#[from] billing::BillingError),

    /// Telephony provider API error.
    #[error("Twilio error: {0}")]
    Twilio(#[from] twilio_rest::TwilioError),

    /// Bad request from the client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A provider integration is not configured for this deployment.
    #[error("Not configured: {0}")]
    NotConfigured(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Database(database::DatabaseError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            ApiError::Database(database::DatabaseError::AlreadyExists { .. }) => {
                (StatusCode::CONFLICT, self.to_string())
            }
            ApiError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            ApiError::Billing(err) => {
                tracing::error!("Billing error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            ApiError::Twilio(err) => {
                tracing::error!("Twilio error: {}", err);
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotConfigured(what) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("{} is not configured", what),
            ),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
