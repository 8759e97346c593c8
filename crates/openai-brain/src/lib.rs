//! OpenAI-based brain implementation.
//!
//! Implements [`brain_core::Brain`] against the OpenAI Chat Completions
//! API. The voice turn controller hands it the agent's system prompt and
//! the persisted transcript; it returns one reply per call.

mod api_types;
mod brain;
mod config;

pub use brain::OpenAiBrain;
pub use config::OpenAiBrainConfig;
