//! Application state shared across handlers.

use std::sync::Arc;

use database::Database;
use notifier::CallNotifier;
use twilio_rest::TwilioClient;
use voice::{Ledger, TurnController};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Conversation turn controller.
    pub controller: Arc<TurnController>,
    /// Post-call notifier, when SMTP is configured.
    pub notifier: Option<Arc<CallNotifier>>,
    /// Twilio REST client, when credentials are configured.
    pub twilio: Option<TwilioClient>,
    /// Public base URL of this deployment.
    pub public_url: String,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        db: Database,
        controller: Arc<TurnController>,
        notifier: Option<Arc<CallNotifier>>,
        twilio: Option<TwilioClient>,
        public_url: impl Into<String>,
    ) -> Self {
        Self {
            db,
            controller,
            notifier,
            twilio,
            public_url: public_url.into(),
        }
    }

    /// The call ledger behind the turn controller.
    pub fn ledger(&self) -> &Ledger {
        self.controller.ledger()
    }
}
