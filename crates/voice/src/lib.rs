//! The conversation core: everything between an inbound telephony webhook
//! and the TwiML document sent back.
//!
//! The flow for each webhook turn:
//!
//! 1. [`resolve`] picks the agent (explicit id, DTMF digit, destination
//!    number, or IVR menu fallback)
//! 2. [`TurnController`] classifies the turn into an explicit [`TurnState`]
//!    and dispatches it, talking to the [`Brain`](brain_core::Brain) and the
//!    [`Ledger`]
//! 3. The result is always a [`VoiceResponse`](twilio_rest::VoiceResponse) -
//!    the webhook path never fails outward, because the provider hangs up
//!    or retries unpredictably on error responses
//!
//! The [`Ledger`] is the one place storage errors are logged and swallowed;
//! everything below it returns typed `Result`s.

mod control;
mod error;
mod ledger;
mod prompt;
mod resolver;
mod turn;

pub use control::{CallControl, NoOpCallControl, TwilioCallControl};
pub use error::VoiceError;
pub use ledger::{Ledger, DEFAULT_ACTIVE_AGENT_ID};
pub use prompt::build_system_prompt;
pub use resolver::{resolve, Resolution};
pub use turn::{TurnController, TurnInput, TurnState};
