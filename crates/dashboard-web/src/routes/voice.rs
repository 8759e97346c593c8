//! The primary conversation webhook.
//!
//! Twilio posts here on every turn of a call. The response is always TwiML
//! with a 200 status; an error response mid-call makes the provider hang up
//! or retry unpredictably, so everything that can go wrong is absorbed into
//! the spoken conversation by the turn controller.

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Form;
use serde::Deserialize;
use tracing::debug;
use voice::TurnInput;

use crate::state::AppState;

/// Query parameters on the webhook URL.
#[derive(Debug, Deserialize)]
pub struct VoiceQuery {
    /// Agent id carried over from a previous turn's action URL.
    #[serde(rename = "agentId")]
    pub agent_id: Option<i64>,
}

/// The form body Twilio posts on each turn.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VoiceForm {
    pub call_sid: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub direction: Option<String>,
    pub speech_result: Option<String>,
    pub digits: Option<String>,
}

/// Handle one conversation turn.
pub async fn voice_webhook(
    State(state): State<AppState>,
    Query(query): Query<VoiceQuery>,
    Form(form): Form<VoiceForm>,
) -> impl IntoResponse {
    debug!(
        call_sid = %form.call_sid,
        agent_id = ?query.agent_id,
        has_speech = form.speech_result.is_some(),
        digits = ?form.digits,
        "Voice webhook turn"
    );

    let input = TurnInput {
        call_sid: form.call_sid,
        from: form.from.unwrap_or_default(),
        to: form.to,
        direction: form.direction.unwrap_or_else(|| "inbound".to_string()),
        speech: form.speech_result,
        digits: form.digits,
        agent_id: query.agent_id,
    };

    let twiml = state.controller.handle(&input).await.to_xml();
    ([(header::CONTENT_TYPE, "text/xml")], twiml)
}
