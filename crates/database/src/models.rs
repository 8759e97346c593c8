//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A configured voice agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Agent {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning user, if any. Unowned agents are admin-managed and unbilled.
    pub user_id: Option<i64>,
    /// Display name, spoken in the synthesized greeting and the IVR menu.
    pub name: String,
    /// System prompt text.
    pub prompt: String,
    /// Optional configured greeting; a default is synthesized when unset.
    pub first_sentence: Option<String>,
    /// Voice ID used for speech synthesis.
    pub voice: String,
    /// Voice gender.
    pub gender: String,
    /// Maximum call duration in minutes before the agent hangs up.
    pub max_call_duration_mins: i64,
    /// Seconds to wait for caller speech before the provider re-invokes us.
    pub max_wait_secs: i64,
    /// Free-form company information appended to the prompt.
    pub company_info: Option<String>,
    /// Whether to email a transcript when a call completes.
    pub email_after_call: bool,
    /// Recipient for the post-call email.
    pub notification_email: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// A knowledge document attached to an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AgentDocument {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning agent.
    pub agent_id: i64,
    /// Document name.
    pub name: String,
    /// Extracted text content.
    pub content: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// A provisioned phone number, optionally bound to an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PhoneNumber {
    /// Auto-incrementing ID.
    pub id: i64,
    /// E.164 number string, unique.
    pub number: String,
    /// Friendly name shown in the dashboard.
    pub friendly_name: String,
    /// Bound agent, if any. At most one number per agent.
    pub agent_id: Option<i64>,
    /// Creation timestamp.
    pub created_at: String,
}

/// One telephone call leg, keyed by the provider's call SID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Call {
    /// Provider call SID (opaque, globally unique per call attempt).
    pub sid: String,
    /// Agent that handled the call.
    pub agent_id: Option<i64>,
    /// Call direction ("inbound" / "outbound").
    pub direction: String,
    /// Caller number.
    pub from_number: String,
    /// Called number.
    pub to_number: String,
    /// Start time, epoch milliseconds. Set once, on first upsert.
    pub started_at: i64,
    /// End time, epoch milliseconds. Set at completion.
    pub ended_at: Option<i64>,
    /// Duration in seconds, set at completion.
    pub duration_secs: Option<i64>,
    /// "in-progress", "completed", "failed", "busy" or "no-answer".
    pub status: String,
    /// Recording reference, if recording was started.
    pub recording_url: Option<String>,
    /// Billed cost, set at completion.
    pub cost: Option<f64>,
}

/// One role-tagged line of conversation text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TranscriptEntry {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Call this entry belongs to.
    pub call_sid: String,
    /// "user" or "assistant".
    pub role: String,
    /// Spoken text.
    pub text: String,
    /// Append time, epoch milliseconds.
    pub created_at: i64,
}

/// A dashboard user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Unique email address.
    pub email: String,
    /// Hashed credential.
    pub password_hash: String,
    /// Display name.
    pub name: String,
    /// "admin" or "staff".
    pub role: String,
    /// Staff users are scoped to exactly one agent.
    pub assigned_agent_id: Option<i64>,
    /// Billing plan ID ("STARTER", "PRO", "ENTERPRISE").
    pub plan: String,
    /// Credit balance in dollars. May go negative; no floor is enforced.
    pub credits_balance: f64,
    /// Cumulative minutes of call time used this cycle.
    pub usage_minutes_used: i64,
    /// Active password-reset token, if any.
    pub reset_token: Option<String>,
    /// Reset token expiry, epoch milliseconds.
    pub reset_token_expires_at: Option<i64>,
    /// Creation timestamp.
    pub created_at: String,
}

/// An immutable billing ledger row. Negative amounts are debits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    /// Auto-incrementing ID.
    pub id: i64,
    /// User charged or credited.
    pub user_id: i64,
    /// Signed amount in dollars.
    pub amount: f64,
    /// Transaction type (e.g. "call_usage", "top_up").
    pub tx_type: String,
    /// Human-readable description.
    pub description: String,
    /// Creation timestamp.
    pub created_at: String,
}
