//! Call ledger - soft-failure persistence for the webhook path.
//!
//! Every operation here catches and logs its own storage errors and returns
//! a safe default instead of propagating. The telephony webhook must never
//! 500 mid-conversation; durability of the conversational UX wins over
//! strict error visibility. The underlying `database` functions return
//! typed `Result`s, so error handling is concentrated at this boundary
//! rather than scattered through the turn controller.

use database::models::{Call, TranscriptEntry};
use database::{call, setting, transcript, Database};
use tracing::warn;

/// Agent id used when the active-agent setting has never been written.
pub const DEFAULT_ACTIVE_AGENT_ID: i64 = 1;

const ACTIVE_AGENT_KEY: &str = "active_agent_id";

/// Soft-failure wrapper over call and transcript storage.
#[derive(Clone)]
pub struct Ledger {
    db: Database,
}

impl Ledger {
    /// Create a ledger over a database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// The underlying database handle.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// The persisted "default agent" pointer.
    ///
    /// Falls back to [`DEFAULT_ACTIVE_AGENT_ID`] when the setting is unset
    /// or unreadable.
    pub async fn active_agent_id(&self) -> i64 {
        match setting::get_setting(self.db.pool(), ACTIVE_AGENT_KEY).await {
            Ok(Some(value)) => value.parse().unwrap_or_else(|_| {
                warn!("Unparseable active agent id {:?}, using default", value);
                DEFAULT_ACTIVE_AGENT_ID
            }),
            Ok(None) => DEFAULT_ACTIVE_AGENT_ID,
            Err(e) => {
                warn!("Failed to read active agent id: {}", e);
                DEFAULT_ACTIVE_AGENT_ID
            }
        }
    }

    /// Persist the "default agent" pointer. Returns false on failure.
    pub async fn set_active_agent_id(&self, agent_id: i64) -> bool {
        match setting::set_setting(self.db.pool(), ACTIVE_AGENT_KEY, &agent_id.to_string()).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to set active agent id: {}", e);
                false
            }
        }
    }

    /// Create or update the call row. Returns false on failure.
    pub async fn upsert_call_agent(
        &self,
        call_sid: &str,
        agent_id: i64,
        from_number: &str,
        to_number: &str,
        direction: &str,
    ) -> bool {
        match call::upsert_call_agent(
            self.db.pool(),
            call_sid,
            agent_id,
            from_number,
            to_number,
            direction,
        )
        .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to upsert call {}: {}", call_sid, e);
                false
            }
        }
    }

    /// Append a transcript entry.
    ///
    /// A missing call row is a logged no-op, not an error. Provider
    /// callbacks can arrive out of order, and dropping one line beats
    /// failing the turn.
    pub async fn append_transcript(&self, call_sid: &str, role: &str, text: &str) -> bool {
        match transcript::append_entry(self.db.pool(), call_sid, role, text).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to append transcript for call {}: {}", call_sid, e);
                false
            }
        }
    }

    /// All transcript entries for a call in spoken order. Empty on failure.
    pub async fn entries(&self, call_sid: &str) -> Vec<TranscriptEntry> {
        match transcript::get_entries(self.db.pool(), call_sid).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to read transcript for call {}: {}", call_sid, e);
                Vec::new()
            }
        }
    }

    /// The transcript as `role: text` lines, or an empty string.
    pub async fn transcript(&self, call_sid: &str) -> String {
        self.entries(call_sid)
            .await
            .iter()
            .map(|entry| format!("{}: {}", entry.role, entry.text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether any transcript entry exists for the call.
    pub async fn has_transcript(&self, call_sid: &str) -> bool {
        match transcript::count_entries(self.db.pool(), call_sid).await {
            Ok(count) => count > 0,
            Err(e) => {
                warn!("Failed to count transcript for call {}: {}", call_sid, e);
                false
            }
        }
    }

    /// The agent handling a call, if recorded.
    pub async fn call_agent_id(&self, call_sid: &str) -> Option<i64> {
        match call::get_call_agent_id(self.db.pool(), call_sid).await {
            Ok(agent_id) => agent_id,
            Err(e) => {
                warn!("Failed to read agent for call {}: {}", call_sid, e);
                None
            }
        }
    }

    /// The call row, if it exists.
    pub async fn call(&self, call_sid: &str) -> Option<Call> {
        match call::get_call(self.db.pool(), call_sid).await {
            Ok(call) => Some(call),
            Err(database::DatabaseError::NotFound { .. }) => None,
            Err(e) => {
                warn!("Failed to read call {}: {}", call_sid, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::agent::{create_agent, NewAgent};

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_active_agent_defaults_to_sentinel() {
        let ledger = Ledger::new(test_db().await);
        assert_eq!(ledger.active_agent_id().await, DEFAULT_ACTIVE_AGENT_ID);

        assert!(ledger.set_active_agent_id(7).await);
        assert_eq!(ledger.active_agent_id().await, 7);
    }

    #[tokio::test]
    async fn test_append_without_call_row_is_noop() {
        let ledger = Ledger::new(test_db().await);
        assert!(!ledger.append_transcript("CA_missing", "user", "hi").await);
        assert_eq!(ledger.transcript("CA_missing").await, "");
    }

    #[tokio::test]
    async fn test_transcript_joins_role_text_lines() {
        let ledger = Ledger::new(test_db().await);
        let agent = create_agent(ledger.db().pool(), &NewAgent::named("Ava"))
            .await
            .unwrap();
        assert!(
            ledger
                .upsert_call_agent("CA1", agent.id, "+15550001", "+15550002", "inbound")
                .await
        );
        assert!(ledger.append_transcript("CA1", "user", "hi").await);
        assert!(ledger.append_transcript("CA1", "assistant", "hello").await);

        assert_eq!(ledger.transcript("CA1").await, "user: hi\nassistant: hello");
        assert!(ledger.has_transcript("CA1").await);
        assert_eq!(ledger.call_agent_id("CA1").await, Some(agent.id));
    }

    #[tokio::test]
    async fn test_missing_call_is_none() {
        let ledger = Ledger::new(test_db().await);
        assert!(ledger.call("CA_missing").await.is_none());
        assert_eq!(ledger.call_agent_id("CA_missing").await, None);
        assert!(!ledger.has_transcript("CA_missing").await);
    }
}
