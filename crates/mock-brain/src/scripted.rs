//! Scripted brain - replies from a fixed queue.

use std::collections::VecDeque;

use async_trait::async_trait;
use brain_core::{Brain, BrainError, ChatReply, ChatRequest};
use tokio::sync::Mutex;

/// A brain that returns pre-scripted replies in order.
///
/// When the script runs out it keeps returning the last reply, so a long
/// test conversation doesn't need an exact turn count.
pub struct ScriptedBrain {
    replies: Mutex<VecDeque<String>>,
    last: Mutex<String>,
}

impl ScriptedBrain {
    /// Create a scripted brain from a list of replies.
    pub fn new(replies: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            last: Mutex::new(String::new()),
        }
    }
}

#[async_trait]
impl Brain for ScriptedBrain {
    async fn generate(&self, _request: ChatRequest) -> Result<ChatReply, BrainError> {
        let mut replies = self.replies.lock().await;
        match replies.pop_front() {
            Some(reply) => {
                *self.last.lock().await = reply.clone();
                Ok(ChatReply::text(reply))
            }
            None => Ok(ChatReply::text(self.last.lock().await.clone())),
        }
    }

    fn name(&self) -> &str {
        "ScriptedBrain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ChatRequest {
        ChatRequest::new("", vec![])
    }

    #[tokio::test]
    async fn test_replies_in_order() {
        let brain = ScriptedBrain::new(["one", "two"]);

        assert_eq!(brain.generate(request()).await.unwrap().text, "one");
        assert_eq!(brain.generate(request()).await.unwrap().text, "two");
    }

    #[tokio::test]
    async fn test_repeats_last_when_exhausted() {
        let brain = ScriptedBrain::new(["only"]);

        assert_eq!(brain.generate(request()).await.unwrap().text, "only");
        assert_eq!(brain.generate(request()).await.unwrap().text, "only");
    }
}
