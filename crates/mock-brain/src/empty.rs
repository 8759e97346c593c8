//! Empty brain - always returns an empty reply.

use async_trait::async_trait;
use brain_core::{Brain, BrainError, ChatReply, ChatRequest};

/// A brain that always returns an empty reply.
///
/// Exercises the turn controller's canned-substitution path (an empty AI
/// reply must never result in silence on the call).
#[derive(Debug, Clone, Default)]
pub struct EmptyBrain;

#[async_trait]
impl Brain for EmptyBrain {
    async fn generate(&self, _request: ChatRequest) -> Result<ChatReply, BrainError> {
        Ok(ChatReply::text(""))
    }

    fn name(&self) -> &str {
        "EmptyBrain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_empty() {
        let brain = EmptyBrain;
        let reply = brain.generate(ChatRequest::new("", vec![])).await.unwrap();
        assert!(reply.is_empty());
    }
}
