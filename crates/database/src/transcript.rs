//! Transcript entry persistence.
//!
//! Entries are append-only and read back ordered by timestamp. An append
//! for a SID with no call row is rejected with `NotFound`. The provider
//! can deliver callbacks out of order, and the caller decides whether that
//! is fatal (the webhook path treats it as a logged no-op).

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::TranscriptEntry;
use crate::now_ms;

/// Append a transcript entry stamped with the current time.
pub async fn append_entry(
    pool: &SqlitePool,
    call_sid: &str,
    role: &str,
    text: &str,
) -> Result<()> {
    append_entry_at(pool, call_sid, role, text, now_ms()).await
}

/// Append a transcript entry with an explicit timestamp.
pub async fn append_entry_at(
    pool: &SqlitePool,
    call_sid: &str,
    role: &str,
    text: &str,
    at_ms: i64,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO transcript_entries (call_sid, role, text, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(call_sid)
    .bind(role)
    .bind(text)
    .bind(at_ms)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_foreign_key_violation() {
                return DatabaseError::NotFound {
                    entity: "Call",
                    id: call_sid.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

/// Get all entries for a call, ascending by timestamp (ID as tiebreak).
pub async fn get_entries(pool: &SqlitePool, call_sid: &str) -> Result<Vec<TranscriptEntry>> {
    let entries = sqlx::query_as::<_, TranscriptEntry>(
        r#"
        SELECT id, call_sid, role, text, created_at
        FROM transcript_entries
        WHERE call_sid = ?
        ORDER BY created_at, id
        "#,
    )
    .bind(call_sid)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// Count entries for a call.
///
/// The turn controller uses this to tell a first turn (no transcript yet)
/// from a silence re-invocation; there is no explicit turn counter.
pub async fn count_entries(pool: &SqlitePool, call_sid: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM transcript_entries WHERE call_sid = ?
        "#,
    )
    .bind(call_sid)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{create_agent, NewAgent};
    use crate::call::upsert_call_agent;
    use crate::Database;

    async fn test_db_with_call(sid: &str) -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        let agent = create_agent(db.pool(), &NewAgent::named("A")).await.unwrap();
        upsert_call_agent(db.pool(), sid, agent.id, "+1", "+2", "inbound")
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_append_requires_call_row() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();

        let result = append_entry(db.pool(), "CA-none", "user", "hi").await;
        assert!(matches!(
            result,
            Err(DatabaseError::NotFound { entity: "Call", .. })
        ));
    }

    #[tokio::test]
    async fn test_entries_ordered_by_timestamp() {
        let db = test_db_with_call("CA1").await;
        let pool = db.pool();

        // Insert out of order; read-back must sort by timestamp.
        append_entry_at(pool, "CA1", "assistant", "second", 2000).await.unwrap();
        append_entry_at(pool, "CA1", "user", "first", 1000).await.unwrap();
        append_entry_at(pool, "CA1", "user", "third", 3000).await.unwrap();

        let entries = get_entries(pool, "CA1").await.unwrap();
        let texts: Vec<&str> = entries.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_count_entries() {
        let db = test_db_with_call("CA1").await;
        let pool = db.pool();

        assert_eq!(count_entries(pool, "CA1").await.unwrap(), 0);
        append_entry(pool, "CA1", "assistant", "hello").await.unwrap();
        assert_eq!(count_entries(pool, "CA1").await.unwrap(), 1);
    }
}
