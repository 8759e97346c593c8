//! Call row persistence.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Call;
use crate::now_ms;

/// Create or update the call row for a provider call SID.
///
/// The start time is set only when the row is first created; later turns
/// for the same SID refresh the routing fields without touching it. Last
/// write wins when two callbacks for one SID race.
pub async fn upsert_call_agent(
    pool: &SqlitePool,
    sid: &str,
    agent_id: i64,
    from_number: &str,
    to_number: &str,
    direction: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO calls (sid, agent_id, direction, from_number, to_number, started_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(sid) DO UPDATE SET
            agent_id = excluded.agent_id,
            direction = excluded.direction,
            from_number = excluded.from_number,
            to_number = excluded.to_number
        "#,
    )
    .bind(sid)
    .bind(agent_id)
    .bind(direction)
    .bind(from_number)
    .bind(to_number)
    .bind(now_ms())
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a call by SID.
pub async fn get_call(pool: &SqlitePool, sid: &str) -> Result<Call> {
    sqlx::query_as::<_, Call>(
        r#"
        SELECT sid, agent_id, direction, from_number, to_number, started_at,
               ended_at, duration_secs, status, recording_url, cost
        FROM calls
        WHERE sid = ?
        "#,
    )
    .bind(sid)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Call",
        id: sid.to_string(),
    })
}

/// Get the agent bound to a call, if the call exists.
pub async fn get_call_agent_id(pool: &SqlitePool, sid: &str) -> Result<Option<i64>> {
    let agent_id = sqlx::query_scalar::<_, Option<i64>>(
        r#"
        SELECT agent_id FROM calls WHERE sid = ?
        "#,
    )
    .bind(sid)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Call",
        id: sid.to_string(),
    })?;

    Ok(agent_id)
}

/// Write the completion fields on a call row.
///
/// Duration and cost are only ever set here, once, at call completion.
pub async fn complete_call(
    pool: &SqlitePool,
    sid: &str,
    duration_secs: i64,
    status: &str,
    recording_url: Option<&str>,
    cost: Option<f64>,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE calls
        SET duration_secs = ?, status = ?, recording_url = ?, cost = ?, ended_at = ?
        WHERE sid = ?
        "#,
    )
    .bind(duration_secs)
    .bind(status)
    .bind(recording_url)
    .bind(cost)
    .bind(now_ms())
    .bind(sid)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Call",
            id: sid.to_string(),
        });
    }

    Ok(())
}

/// List recent calls, newest first.
pub async fn list_calls(pool: &SqlitePool, limit: i64) -> Result<Vec<Call>> {
    let calls = sqlx::query_as::<_, Call>(
        r#"
        SELECT sid, agent_id, direction, from_number, to_number, started_at,
               ended_at, duration_secs, status, recording_url, cost
        FROM calls
        ORDER BY started_at DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(calls)
}

/// List recent calls for a single agent, newest first.
pub async fn list_calls_for_agent(
    pool: &SqlitePool,
    agent_id: i64,
    limit: i64,
) -> Result<Vec<Call>> {
    let calls = sqlx::query_as::<_, Call>(
        r#"
        SELECT sid, agent_id, direction, from_number, to_number, started_at,
               ended_at, duration_secs, status, recording_url, cost
        FROM calls
        WHERE agent_id = ?
        ORDER BY started_at DESC
        LIMIT ?
        "#,
    )
    .bind(agent_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(calls)
}
