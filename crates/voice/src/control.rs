//! Call control trait and implementations.

use async_trait::async_trait;
use twilio_rest::TwilioClient;

use crate::error::VoiceError;

/// Trait for in-call provider actions.
///
/// Abstracted so the turn controller can be tested without a live Twilio
/// account. Recording start is best-effort on the greeting turn; the caller
/// logs failures and carries on.
#[async_trait]
pub trait CallControl: Send + Sync {
    /// Start recording the given call.
    async fn start_recording(&self, call_sid: &str) -> Result<(), VoiceError>;
}

/// Call control that does nothing.
///
/// Used in tests and in deployments without Twilio credentials.
#[derive(Debug, Clone, Default)]
pub struct NoOpCallControl;

#[async_trait]
impl CallControl for NoOpCallControl {
    async fn start_recording(&self, _call_sid: &str) -> Result<(), VoiceError> {
        Ok(())
    }
}

/// Call control backed by the Twilio REST API.
#[derive(Debug, Clone)]
pub struct TwilioCallControl {
    client: TwilioClient,
}

impl TwilioCallControl {
    /// Create call control from a Twilio client.
    pub fn new(client: TwilioClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CallControl for TwilioCallControl {
    async fn start_recording(&self, call_sid: &str) -> Result<(), VoiceError> {
        self.client.start_recording(call_sid).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_succeeds() {
        let control = NoOpCallControl;
        assert!(control.start_recording("CA123").await.is_ok());
    }
}
