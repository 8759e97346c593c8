//! Frontdesk web server.
//!
//! Serves the two telephony webhook endpoints (`/voice`, `/voice/status`)
//! and the JSON API the dashboard UI consumes.

mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use brain_core::Brain;
use database::Database;
use notifier::{CallNotifier, SmtpConfig, SmtpSender};
use openai_brain::{OpenAiBrain, OpenAiBrainConfig};
use tracing::{info, warn};
use twilio_rest::{TwilioClient, TwilioConfig};
use voice::{CallControl, Ledger, NoOpCallControl, TurnController, TwilioCallControl};

use crate::config::{credential, Config};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting dashboard web server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // AI brain (required)
    let openai_key = credential(&db, "openai_api_key", "OPENAI_API_KEY")
        .await
        .ok_or("OpenAI API key not configured (settings table or OPENAI_API_KEY)")?;
    let brain: Arc<dyn Brain> = Arc::new(OpenAiBrain::new(
        OpenAiBrainConfig::builder().api_key(openai_key).build(),
    )?);

    // Twilio client (optional; recording and number provisioning are
    // skipped without it)
    let twilio_sid = credential(&db, "twilio_account_sid", "TWILIO_ACCOUNT_SID").await;
    let twilio_token = credential(&db, "twilio_auth_token", "TWILIO_AUTH_TOKEN").await;
    let twilio = match (twilio_sid, twilio_token) {
        (Some(sid), Some(token)) => Some(TwilioClient::new(TwilioConfig::new(sid, token))),
        _ => {
            warn!("Twilio credentials not configured, recording and provisioning disabled");
            None
        }
    };
    let control: Arc<dyn CallControl> = match twilio.clone() {
        Some(client) => Arc::new(TwilioCallControl::new(client)),
        None => Arc::new(NoOpCallControl),
    };

    // Post-call notifier (optional; summaries are skipped without SMTP)
    let smtp_user = credential(&db, "smtp_username", "SMTP_USERNAME").await;
    let smtp_pass = credential(&db, "smtp_password", "SMTP_PASSWORD").await;
    let notifier = match (smtp_user, smtp_pass) {
        (Some(username), Some(password)) => {
            let smtp = SmtpConfig::new(
                std::env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
                std::env::var("SMTP_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(587),
                username,
                password,
            );
            let sender = SmtpSender::new(smtp)?;
            Some(Arc::new(CallNotifier::new(
                db.clone(),
                Arc::new(sender),
                config.public_url.clone(),
            )))
        }
        _ => {
            warn!("SMTP credentials not configured, call summaries disabled");
            None
        }
    };

    // Build application state
    let controller = Arc::new(TurnController::new(Ledger::new(db.clone()), brain, control));
    let state = AppState::new(db, controller, notifier, twilio, config.public_url.clone());

    // Build router
    let app = routes::router().with_state(state);

    // Start server
    info!(addr = %config.addr, "Dashboard web server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
