//! The post-call notification routine.

use std::sync::Arc;
use std::time::Duration;

use database::{agent, call, transcript, Database};
use tracing::{debug, info, warn};

use crate::sender::EmailSender;

/// Sends the owner of an agent an email after each completed call.
pub struct CallNotifier {
    db: Database,
    sender: Arc<dyn EmailSender>,
    dashboard_url: String,
    grace: Duration,
}

impl CallNotifier {
    /// Create a notifier. `dashboard_url` is the base URL deep links point
    /// into, without a trailing slash.
    pub fn new(db: Database, sender: Arc<dyn EmailSender>, dashboard_url: impl Into<String>) -> Self {
        Self {
            db,
            sender,
            dashboard_url: dashboard_url.into().trim_end_matches('/').to_string(),
            grace: Duration::from_secs(5),
        }
    }

    /// Override the grace period waited before reading the transcript.
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Notify about a completed call. Returns whether an email went out.
    ///
    /// Every failure here is logged and swallowed; a lost notification
    /// must never affect call handling or billing.
    pub async fn notify_call_completed(&self, call_sid: &str) -> bool {
        // Give straggling transcript writes a moment to land.
        if !self.grace.is_zero() {
            tokio::time::sleep(self.grace).await;
        }

        let pool = self.db.pool();

        let call = match call::get_call(pool, call_sid).await {
            Ok(call) => call,
            Err(e) => {
                warn!("Notifier could not load call {}: {}", call_sid, e);
                return false;
            }
        };
        let agent_id = match call.agent_id {
            Some(agent_id) => agent_id,
            None => {
                debug!("Call {} has no agent, skipping notification", call_sid);
                return false;
            }
        };
        let agent = match agent::get_agent(pool, agent_id).await {
            Ok(agent) => agent,
            Err(e) => {
                warn!("Notifier could not load agent {}: {}", agent_id, e);
                return false;
            }
        };

        if !agent.email_after_call {
            debug!("Agent {} has notifications disabled", agent.id);
            return false;
        }
        let recipient = match agent.notification_email.as_deref() {
            Some(email) if !email.trim().is_empty() => email.trim().to_string(),
            _ => {
                debug!("Agent {} has no notification address", agent.id);
                return false;
            }
        };

        let entries = match transcript::get_entries(pool, call_sid).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Notifier could not load transcript for {}: {}", call_sid, e);
                return false;
            }
        };
        if entries.is_empty() {
            debug!("Call {} has an empty transcript, skipping", call_sid);
            return false;
        }
        let transcript_text = entries
            .iter()
            .map(|entry| format!("{}: {}", entry.role, entry.text))
            .collect::<Vec<_>>()
            .join("\n");

        let subject = format!("Call summary: {} spoke with {}", agent.name, call.from_number);
        let duration_line = match call.duration_secs {
            Some(secs) => format!("Duration: {} seconds.\n", secs),
            None => String::new(),
        };
        let body = format!(
            "Your agent {} just finished a call with {}.\n\n\
             Transcript:\n{}\n\n\
             {}Details: {}/calls/{}\n",
            agent.name, call.from_number, transcript_text, duration_line, self.dashboard_url, call_sid
        );

        match self.sender.send(&recipient, &subject, &body).await {
            Ok(()) => {
                info!("Sent call summary for {} to {}", call_sid, recipient);
                true
            }
            Err(e) => {
                warn!("Failed to send call summary for {}: {}", call_sid, e);
                false
            }
        }
    }
}
