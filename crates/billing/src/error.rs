//! Billing error types.

use thiserror::Error;

/// Errors from call finalization.
#[derive(Debug, Error)]
pub enum BillingError {
    /// Storage failure.
    #[error("database error: {0}")]
    Database(#[from] database::DatabaseError),
}
