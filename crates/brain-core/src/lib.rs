//! Core trait and types for brain implementations.
//!
//! This crate provides the shared interface for the AI text-generation
//! collaborators used by the voice turn controller. It defines:
//!
//! - [`Brain`] - The trait that all brain implementations must implement
//! - [`ChatRequest`] / [`ChatReply`] - Request/response types for one turn
//! - [`BrainError`] - Error types for brain operations
//!
//! # Example
//!
//! ```rust
//! use brain_core::{Brain, BrainError, ChatReply, ChatRequest};
//! use async_trait::async_trait;
//!
//! struct MyBrain;
//!
//! #[async_trait]
//! impl Brain for MyBrain {
//!     async fn generate(&self, request: ChatRequest) -> Result<ChatReply, BrainError> {
//!         Ok(ChatReply::text("Hello!"))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "MyBrain"
//!     }
//! }
//! ```

mod chat;
mod error;
mod trait_def;

pub use chat::{ChatReply, ChatRequest, ChatTurn, Role};
pub use error::BrainError;
pub use trait_def::Brain;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
