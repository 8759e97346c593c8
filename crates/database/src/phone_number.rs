//! Phone number persistence and agent binding.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::PhoneNumber;

/// Record a provisioned number.
pub async fn create_number(
    pool: &SqlitePool,
    number: &str,
    friendly_name: &str,
) -> Result<PhoneNumber> {
    let result = sqlx::query(
        r#"
        INSERT INTO phone_numbers (number, friendly_name)
        VALUES (?, ?)
        "#,
    )
    .bind(number)
    .bind(friendly_name)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "PhoneNumber",
                    id: number.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    get_number(pool, result.last_insert_rowid()).await
}

/// Get a phone number by ID.
pub async fn get_number(pool: &SqlitePool, id: i64) -> Result<PhoneNumber> {
    sqlx::query_as::<_, PhoneNumber>(
        r#"
        SELECT id, number, friendly_name, agent_id, created_at
        FROM phone_numbers
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "PhoneNumber",
        id: id.to_string(),
    })
}

/// Look up a phone number by its E.164 string.
pub async fn get_by_number(pool: &SqlitePool, number: &str) -> Result<Option<PhoneNumber>> {
    let row = sqlx::query_as::<_, PhoneNumber>(
        r#"
        SELECT id, number, friendly_name, agent_id, created_at
        FROM phone_numbers
        WHERE number = ?
        "#,
    )
    .bind(number)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Bind a number to an agent.
///
/// An agent can have at most one number: any number currently bound to the
/// agent is detached first.
pub async fn bind_to_agent(pool: &SqlitePool, number_id: i64, agent_id: i64) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE phone_numbers
        SET agent_id = NULL
        WHERE agent_id = ?
        "#,
    )
    .bind(agent_id)
    .execute(pool)
    .await?;

    let result = sqlx::query(
        r#"
        UPDATE phone_numbers
        SET agent_id = ?
        WHERE id = ?
        "#,
    )
    .bind(agent_id)
    .bind(number_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "PhoneNumber",
            id: number_id.to_string(),
        });
    }

    Ok(())
}

/// Detach a number from whatever agent it is bound to.
pub async fn unbind(pool: &SqlitePool, number_id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE phone_numbers
        SET agent_id = NULL
        WHERE id = ?
        "#,
    )
    .bind(number_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "PhoneNumber",
            id: number_id.to_string(),
        });
    }

    Ok(())
}

/// List all numbers.
pub async fn list_numbers(pool: &SqlitePool) -> Result<Vec<PhoneNumber>> {
    let rows = sqlx::query_as::<_, PhoneNumber>(
        r#"
        SELECT id, number, friendly_name, agent_id, created_at
        FROM phone_numbers
        ORDER BY number
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Delete a number record.
pub async fn delete_number(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM phone_numbers
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "PhoneNumber",
            id: id.to_string(),
        });
    }

    Ok(())
}
