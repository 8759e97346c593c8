//! OpenAiBrain implementation using the OpenAI API.

use brain_core::{async_trait, Brain, BrainError, ChatReply, ChatRequest, Role};
use reqwest::Client;
use tracing::{debug, info};

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::OpenAiBrainConfig;

/// A brain implementation that uses OpenAI's Chat Completions API.
///
/// Stateless per request: the full conversation arrives in every
/// [`ChatRequest`], rebuilt from the persisted transcript by the caller.
pub struct OpenAiBrain {
    client: Client,
    config: OpenAiBrainConfig,
}

impl OpenAiBrain {
    /// Create a new OpenAiBrain with the given configuration.
    pub fn new(config: OpenAiBrainConfig) -> Result<Self, BrainError> {
        let client = Client::builder().build().map_err(|e| {
            BrainError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        info!("OpenAiBrain initialized with model: {}", config.model);

        Ok(Self { client, config })
    }

    /// Create an OpenAiBrain from environment variables.
    ///
    /// See [`OpenAiBrainConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, BrainError> {
        let config = OpenAiBrainConfig::from_env()?;
        Self::new(config)
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAiBrainConfig {
        &self.config
    }

    /// Build the messages array for a chat completion request.
    fn build_messages(&self, request: &ChatRequest) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(request.turns.len() + 1);

        if !request.system_prompt.is_empty() {
            messages.push(ChatMessage::system(request.system_prompt.clone()));
        }

        for turn in &request.turns {
            messages.push(match turn.role {
                Role::User => ChatMessage::user(turn.text.clone()),
                Role::Assistant => ChatMessage::assistant(turn.text.clone()),
            });
        }

        messages
    }

    /// Make a chat completion request to the OpenAI API.
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<ChatCompletionResponse, BrainError> {
        let url = format!("{}/v1/chat/completions", self.config.api_url);

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!("Sending request to OpenAI API: {:?}", request);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| BrainError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            // Try to parse as API error
            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
                return Err(BrainError::ProcessingFailed(format!(
                    "API error ({}): {}",
                    status.as_u16(),
                    api_error.error.message
                )));
            }

            return Err(BrainError::ProcessingFailed(format!(
                "API error ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            BrainError::ProcessingFailed(format!("Failed to parse response: {}", e))
        })?;

        debug!("Received response from OpenAI API");

        Ok(completion)
    }
}

#[async_trait]
impl Brain for OpenAiBrain {
    async fn generate(&self, request: ChatRequest) -> Result<ChatReply, BrainError> {
        let messages = self.build_messages(&request);
        let completion = self.chat_completion(messages).await?;

        // A null/absent choice becomes an empty reply; the turn controller
        // substitutes its canned line rather than speaking nothing.
        let text = completion.first_text().unwrap_or_default().to_string();

        Ok(ChatReply::text(text))
    }

    fn name(&self) -> &str {
        "OpenAiBrain"
    }

    async fn is_ready(&self) -> bool {
        !self.config.api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brain_core::ChatTurn;

    fn test_brain() -> OpenAiBrain {
        let config = OpenAiBrainConfig::builder().api_key("test-key").build();
        OpenAiBrain::new(config).unwrap()
    }

    #[test]
    fn test_build_messages_includes_system_prompt() {
        let brain = test_brain();
        let request = ChatRequest::new(
            "You are a receptionist.",
            vec![
                ChatTurn::assistant("Hello, I am Ada."),
                ChatTurn::user("I need help"),
            ],
        );

        let messages = brain.build_messages(&request);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, "You are a receptionist.");
        assert_eq!(messages[1].role, "assistant");
        assert_eq!(messages[2].role, "user");
    }

    #[test]
    fn test_build_messages_empty_system_prompt() {
        let brain = test_brain();
        let request = ChatRequest::new("", vec![ChatTurn::user("hi")]);

        let messages = brain.build_messages(&request);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");
    }

    #[tokio::test]
    async fn test_is_ready_requires_key() {
        let brain = test_brain();
        assert!(brain.is_ready().await);

        let empty = OpenAiBrain::new(OpenAiBrainConfig::default()).unwrap();
        assert!(!empty.is_ready().await);
    }
}
