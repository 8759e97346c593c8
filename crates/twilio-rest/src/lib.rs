//! Twilio REST client and TwiML builder.
//!
//! Two halves, matching the two directions of the provider integration:
//!
//! - [`TwilioClient`] - outbound REST calls (start a call recording,
//!   provision phone numbers)
//! - [`VoiceResponse`] - the TwiML markup every webhook turn responds with

mod client;
mod config;
mod error;
pub mod twiml;

pub use client::{AvailablePhoneNumber, IncomingPhoneNumber, Recording, TwilioClient};
pub use config::TwilioConfig;
pub use error::TwilioError;
pub use twiml::{Gather, VoiceResponse};
