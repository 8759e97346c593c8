//! Echo brain implementation - echoes the caller back.

use async_trait::async_trait;
use brain_core::{Brain, BrainError, ChatReply, ChatRequest};

/// A simple brain that echoes the caller's last utterance.
///
/// Useful for testing the turn flow without any AI processing.
#[derive(Debug, Clone, Default)]
pub struct EchoBrain {
    /// Optional prefix to add before the echo.
    prefix: Option<String>,
}

impl EchoBrain {
    /// Create a new EchoBrain with no prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new EchoBrain with a custom prefix.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mock_brain::EchoBrain;
    ///
    /// let brain = EchoBrain::with_prefix("You said: ");
    /// // Will reply with "You said: <caller utterance>"
    /// ```
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

#[async_trait]
impl Brain for EchoBrain {
    async fn generate(&self, request: ChatRequest) -> Result<ChatReply, BrainError> {
        let text = request.last_user_text().unwrap_or_default();
        let reply = match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, text),
            None => text.to_string(),
        };

        Ok(ChatReply::text(reply))
    }

    fn name(&self) -> &str {
        "EchoBrain"
    }
}
