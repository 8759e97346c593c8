//! Chat request/response types shared by all brains.

use serde::{Deserialize, Serialize};

/// Who spoke a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The caller.
    User,
    /// The agent.
    Assistant,
}

impl Role {
    /// The wire/storage string for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Parse a stored role string. Unknown strings default to `User`.
    pub fn parse(s: &str) -> Role {
        match s {
            "assistant" => Role::Assistant,
            _ => Role::User,
        }
    }
}

/// One prior turn of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Speaker.
    pub role: Role,
    /// Spoken text.
    pub text: String,
}

impl ChatTurn {
    /// A caller turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// An agent turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// A request for one generated reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// System prompt (agent prompt plus any document context).
    pub system_prompt: String,
    /// Conversation so far, oldest first. The final turn is the caller's
    /// latest utterance.
    pub turns: Vec<ChatTurn>,
}

impl ChatRequest {
    /// Build a request from a system prompt and conversation turns.
    pub fn new(system_prompt: impl Into<String>, turns: Vec<ChatTurn>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            turns,
        }
    }

    /// The caller's latest utterance, if any.
    pub fn last_user_text(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == Role::User)
            .map(|t| t.text.as_str())
    }
}

/// A generated reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Reply text. May be empty when the model returns nothing; callers
    /// decide what to substitute.
    pub text: String,
}

impl ChatReply {
    /// Build a reply from text.
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Whether the reply has no usable content.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}
