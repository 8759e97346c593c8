//! Route handlers for the dashboard web server.

pub mod agents;
pub mod calls;
pub mod health;
pub mod phone_numbers;
pub mod settings;
pub mod stats;
pub mod status;
pub mod users;
pub mod voice;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Telephony webhooks
        .route("/voice", post(voice::voice_webhook))
        .route("/voice/status", post(status::status_webhook))
        // Health check and overview stats
        .route("/health", get(health::health))
        .route("/api/stats", get(stats::stats))
        // Agents
        .route("/api/agents", get(agents::list).post(agents::create))
        .route(
            "/api/agents/:id",
            get(agents::get_one).put(agents::update).delete(agents::remove),
        )
        .route(
            "/api/agents/:id/documents",
            get(agents::list_documents).post(agents::add_document),
        )
        .route("/api/documents/:id", delete(agents::remove_document))
        // Users
        .route("/api/users", get(users::list).post(users::create))
        .route(
            "/api/users/:id",
            get(users::get_one).put(users::update).delete(users::remove),
        )
        .route("/api/users/:id/transactions", get(users::transactions))
        .route("/api/users/:id/credits", post(users::top_up))
        // Phone numbers
        .route(
            "/api/phone-numbers",
            get(phone_numbers::list).post(phone_numbers::create),
        )
        .route("/api/phone-numbers/provision", post(phone_numbers::provision))
        .route("/api/phone-numbers/:id", delete(phone_numbers::remove))
        .route("/api/phone-numbers/:id/bind", post(phone_numbers::bind))
        .route("/api/phone-numbers/:id/unbind", post(phone_numbers::unbind))
        // Calls
        .route("/api/calls", get(calls::list))
        .route("/api/calls/:sid", get(calls::get_one))
        // Settings and the active-agent pointer
        .route("/api/active-agent", get(settings::get_active_agent))
        .route("/api/active-agent", put(settings::set_active_agent))
        .route(
            "/api/settings/:key",
            get(settings::get_one)
                .put(settings::set_one)
                .delete(settings::remove),
        )
}
