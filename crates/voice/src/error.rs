//! Voice pipeline error types.

use thiserror::Error;

/// Errors from the voice pipeline's fallible edges.
///
/// The webhook turn path itself never surfaces these to the provider; they
/// exist for the call-control seam and for callers outside the turn loop.
#[derive(Debug, Error)]
pub enum VoiceError {
    /// Storage failure.
    #[error("database error: {0}")]
    Database(#[from] database::DatabaseError),

    /// Telephony provider API failure.
    #[error("twilio error: {0}")]
    Twilio(#[from] twilio_rest::TwilioError),
}
