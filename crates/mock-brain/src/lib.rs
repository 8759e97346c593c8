//! Mock brain implementations for testing.
//!
//! These let the turn controller be exercised without any AI backend:
//!
//! - [`EchoBrain`] - replies with the caller's last utterance
//! - [`ScriptedBrain`] - replies from a fixed queue, in order
//! - [`EmptyBrain`] - always returns an empty reply
//! - [`FailingBrain`] - always fails, for transient-error paths

mod echo;
mod empty;
mod failing;
mod scripted;

pub use echo::EchoBrain;
pub use empty::EmptyBrain;
pub use failing::FailingBrain;
pub use scripted::ScriptedBrain;
