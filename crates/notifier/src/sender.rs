//! Email sender trait and implementations.

use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::config::SmtpConfig;
use crate::error::NotifierError;

/// Trait for sending a notification email.
///
/// Abstracted so the notifier can be tested without an SMTP relay.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send a plain-text email.
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifierError>;
}

/// Sender backed by a pooled SMTP connection.
pub struct SmtpSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpSender {
    /// Create a sender with the given configuration.
    pub fn new(config: SmtpConfig) -> Result<Self, NotifierError> {
        let creds = Credentials::new(config.username.clone(), config.password().to_string());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| NotifierError::Transport(e.to_string()))?
            .port(config.port)
            .credentials(creds)
            .build();

        info!(host = %config.host, port = config.port, "Created SMTP sender");

        Ok(Self {
            transport,
            from_address: config.username,
        })
    }
}

#[async_trait]
impl EmailSender for SmtpSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifierError> {
        let from = self
            .from_address
            .parse()
            .map_err(|e| NotifierError::InvalidAddress(format!("From: {}", e)))?;
        let to_addr = to
            .parse()
            .map_err(|e| NotifierError::InvalidAddress(format!("To '{}': {}", to, e)))?;

        let message = Message::builder()
            .from(from)
            .to(to_addr)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| NotifierError::Send(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotifierError::Send(e.to_string()))?;

        info!(to = %to, subject = %subject, "Notification email sent");
        Ok(())
    }
}

/// One email captured by [`MockSender`].
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Sender that records emails instead of delivering them.
#[derive(Clone, Default)]
pub struct MockSender {
    sent: Arc<Mutex<Vec<SentEmail>>>,
    fail: bool,
}

impl MockSender {
    /// A sender that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender that rejects everything.
    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    /// The emails sent so far.
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for MockSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifierError> {
        if self.fail {
            return Err(NotifierError::Send("simulated failure".to_string()));
        }
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_sender_records() {
        let sender = MockSender::new();
        sender.send("a@b.com", "Hi", "Body").await.unwrap();
        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@b.com");
    }

    #[tokio::test]
    async fn test_failing_sender_errors() {
        let sender = MockSender::failing();
        assert!(sender.send("a@b.com", "Hi", "Body").await.is_err());
        assert!(sender.sent().is_empty());
    }
}
