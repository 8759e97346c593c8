//! Post-call email notifications.
//!
//! On a call-completion callback the [`CallNotifier`] waits out a short
//! grace period (late transcript writes), reads the final transcript, and
//! emails the agent's owner when the agent has notifications enabled. The
//! [`EmailSender`] seam keeps SMTP out of the tests.

mod config;
mod error;
mod notify;
mod sender;

pub use config::SmtpConfig;
pub use error::NotifierError;
pub use notify::CallNotifier;
pub use sender::{EmailSender, MockSender, SentEmail, SmtpSender};
