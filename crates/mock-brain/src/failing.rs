//! Failing brain - always errors.

use async_trait::async_trait;
use brain_core::{Brain, BrainError, ChatReply, ChatRequest};

/// A brain that always fails.
///
/// Exercises the turn controller's transient-error path (spoken apology,
/// conversation continues).
#[derive(Debug, Clone)]
pub struct FailingBrain {
    message: String,
}

impl FailingBrain {
    /// Create a failing brain with a default error message.
    pub fn new() -> Self {
        Self {
            message: "simulated failure".to_string(),
        }
    }

    /// Create a failing brain with a custom error message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for FailingBrain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Brain for FailingBrain {
    async fn generate(&self, _request: ChatRequest) -> Result<ChatReply, BrainError> {
        Err(BrainError::ProcessingFailed(self.message.clone()))
    }

    fn name(&self) -> &str {
        "FailingBrain"
    }

    async fn is_ready(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_fails() {
        let brain = FailingBrain::with_message("boom");
        let result = brain.generate(ChatRequest::new("", vec![])).await;
        match result {
            Err(BrainError::ProcessingFailed(msg)) => assert_eq!(msg, "boom"),
            _ => panic!("Expected ProcessingFailed"),
        }
    }
}
