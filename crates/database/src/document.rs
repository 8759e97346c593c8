//! Agent knowledge-document persistence.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::AgentDocument;

/// Attach a document to an agent.
pub async fn add_document(
    pool: &SqlitePool,
    agent_id: i64,
    name: &str,
    content: &str,
) -> Result<AgentDocument> {
    let result = sqlx::query(
        r#"
        INSERT INTO agent_documents (agent_id, name, content)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(agent_id)
    .bind(name)
    .bind(content)
    .execute(pool)
    .await?;

    get_document(pool, result.last_insert_rowid()).await
}

/// Get a document by ID.
pub async fn get_document(pool: &SqlitePool, id: i64) -> Result<AgentDocument> {
    sqlx::query_as::<_, AgentDocument>(
        r#"
        SELECT id, agent_id, name, content, created_at
        FROM agent_documents
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "AgentDocument",
        id: id.to_string(),
    })
}

/// List documents attached to an agent.
pub async fn list_documents(pool: &SqlitePool, agent_id: i64) -> Result<Vec<AgentDocument>> {
    let docs = sqlx::query_as::<_, AgentDocument>(
        r#"
        SELECT id, agent_id, name, content, created_at
        FROM agent_documents
        WHERE agent_id = ?
        ORDER BY id
        "#,
    )
    .bind(agent_id)
    .fetch_all(pool)
    .await?;

    Ok(docs)
}

/// Delete a document.
pub async fn delete_document(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM agent_documents
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "AgentDocument",
            id: id.to_string(),
        });
    }

    Ok(())
}
