//! The call-status webhook.
//!
//! Twilio posts here when a call changes state. On completion the call is
//! finalized (billing) and the post-call notifier is kicked off. The
//! response is a bare `OK` with a 200 status no matter what happened;
//! the provider neither needs nor parses a body, and a non-2xx would only
//! make it retry.

use axum::extract::State;
use axum::Form;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::state::AppState;

/// The form body Twilio posts on a status change.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusForm {
    pub call_sid: String,
    pub call_status: Option<String>,
    pub call_duration: Option<String>,
    pub recording_url: Option<String>,
}

/// Handle a call-status callback.
pub async fn status_webhook(State(state): State<AppState>, Form(form): Form<StatusForm>) -> &'static str {
    let status = form.call_status.as_deref().unwrap_or("");
    debug!(call_sid = %form.call_sid, status = %status, "Status webhook");

    match status {
        "completed" => {
            let duration_secs = form
                .call_duration
                .as_deref()
                .and_then(|d| d.parse().ok())
                .unwrap_or(0);

            if let Err(e) = billing::finalize_call(
                &state.db,
                &form.call_sid,
                duration_secs,
                status,
                form.recording_url.as_deref(),
            )
            .await
            {
                warn!("Failed to finalize call {}: {}", form.call_sid, e);
            }

            if let Some(notifier) = state.notifier.clone() {
                let call_sid = form.call_sid.clone();
                tokio::spawn(async move {
                    notifier.notify_call_completed(&call_sid).await;
                });
            }
        }
        // Calls that never connected get their terminal status recorded
        // but are never billed.
        "failed" | "busy" | "no-answer" | "canceled" => {
            if let Err(e) =
                database::call::complete_call(state.db.pool(), &form.call_sid, 0, status, None, None)
                    .await
            {
                warn!("Failed to record {} call {}: {}", status, form.call_sid, e);
            }
        }
        _ => {}
    }

    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::voice::tests::{test_state, turn_form};
    use crate::routes::voice::{voice_webhook, VoiceQuery};
    use axum::extract::Query;
    use database::agent::{create_agent, NewAgent};
    use database::user::{create_user, NewUser};
    use database::{call, user};

    fn status_form(call_sid: &str, status: &str, duration: &str) -> StatusForm {
        StatusForm {
            call_sid: call_sid.to_string(),
            call_status: Some(status.to_string()),
            call_duration: Some(duration.to_string()),
            recording_url: Some("http://rec".to_string()),
        }
    }

    #[tokio::test]
    async fn test_full_call_lifecycle_bills_the_owner() {
        let state = test_state().await;
        let owner = create_user(
            state.db.pool(),
            &NewUser {
                email: "owner@example.com".to_string(),
                password_hash: "hash".to_string(),
                name: "Owner".to_string(),
                role: "customer".to_string(),
                assigned_agent_id: None,
                plan: "STARTER".to_string(),
            },
        )
        .await
        .unwrap();
        let mut new = NewAgent::named("Ava");
        new.user_id = Some(owner.id);
        create_agent(state.db.pool(), &new).await.unwrap();

        // Greeting turn, then one speech turn.
        voice_webhook(
            State(state.clone()),
            Query(VoiceQuery { agent_id: None }),
            Form(turn_form("CA123")),
        )
        .await;
        let mut second = turn_form("CA123");
        second.speech_result = Some("hi".to_string());
        voice_webhook(
            State(state.clone()),
            Query(VoiceQuery { agent_id: Some(1) }),
            Form(second),
        )
        .await;

        // Completion callback: 61 seconds bills 2 STARTER minutes.
        let reply =
            status_webhook(State(state.clone()), Form(status_form("CA123", "completed", "61")))
                .await;
        assert_eq!(reply, "OK");

        let finished = call::get_call(state.db.pool(), "CA123").await.unwrap();
        assert_eq!(finished.status, "completed");
        assert_eq!(finished.duration_secs, Some(61));
        assert_eq!(finished.cost, Some(0.50));
        assert_eq!(finished.recording_url.as_deref(), Some("http://rec"));

        let owner = user::get_user(state.db.pool(), owner.id).await.unwrap();
        assert_eq!(owner.credits_balance, -0.50);
        assert_eq!(owner.usage_minutes_used, 2);
    }

    #[tokio::test]
    async fn test_non_terminal_status_is_ignored() {
        let state = test_state().await;
        create_agent(state.db.pool(), &NewAgent::named("Ava"))
            .await
            .unwrap();
        voice_webhook(
            State(state.clone()),
            Query(VoiceQuery { agent_id: None }),
            Form(turn_form("CA123")),
        )
        .await;

        let reply =
            status_webhook(State(state.clone()), Form(status_form("CA123", "ringing", "0"))).await;
        assert_eq!(reply, "OK");

        let row = call::get_call(state.db.pool(), "CA123").await.unwrap();
        assert_eq!(row.status, "in-progress");
        assert!(row.ended_at.is_none());
    }

    #[tokio::test]
    async fn test_failed_call_records_status_without_billing() {
        let state = test_state().await;
        create_agent(state.db.pool(), &NewAgent::named("Ava"))
            .await
            .unwrap();
        voice_webhook(
            State(state.clone()),
            Query(VoiceQuery { agent_id: None }),
            Form(turn_form("CA123")),
        )
        .await;

        let reply =
            status_webhook(State(state.clone()), Form(status_form("CA123", "busy", "0"))).await;
        assert_eq!(reply, "OK");

        let row = call::get_call(state.db.pool(), "CA123").await.unwrap();
        assert_eq!(row.status, "busy");
        assert_eq!(row.cost, None);
        assert!(row.ended_at.is_some());
    }

    #[tokio::test]
    async fn test_unknown_call_still_returns_ok() {
        let state = test_state().await;
        let reply =
            status_webhook(State(state), Form(status_form("CA_nope", "completed", "30"))).await;
        assert_eq!(reply, "OK");
    }
}
