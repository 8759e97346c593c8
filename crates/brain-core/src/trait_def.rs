//! The Brain trait definition.

use async_trait::async_trait;

use crate::chat::{ChatReply, ChatRequest};
use crate::error::BrainError;

/// Trait for AI reply generation.
///
/// Implementations are stateless per request: the full conversation is
/// carried in the [`ChatRequest`], read back from the persisted transcript
/// by the caller. This keeps the webhook path restart-safe.
#[async_trait]
pub trait Brain: Send + Sync {
    /// Generate one reply for the conversation so far.
    async fn generate(&self, request: ChatRequest) -> Result<ChatReply, BrainError>;

    /// Human-readable implementation name, for logging.
    fn name(&self) -> &str;

    /// Whether the brain is ready to serve requests.
    ///
    /// Default implementation returns true.
    async fn is_ready(&self) -> bool {
        true
    }
}
