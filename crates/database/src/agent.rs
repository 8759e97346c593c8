//! Agent CRUD operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Agent;

/// Fields for a new agent. Everything except the name has a sensible default.
#[derive(Debug, Clone)]
pub struct NewAgent {
    pub user_id: Option<i64>,
    pub name: String,
    pub prompt: String,
    pub first_sentence: Option<String>,
    pub voice: String,
    pub gender: String,
    pub max_call_duration_mins: i64,
    pub max_wait_secs: i64,
    pub company_info: Option<String>,
    pub email_after_call: bool,
    pub notification_email: Option<String>,
}

impl NewAgent {
    /// A new agent with the given name and default configuration.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            user_id: None,
            name: name.into(),
            prompt: String::new(),
            first_sentence: None,
            voice: "alloy".to_string(),
            gender: "female".to_string(),
            max_call_duration_mins: 10,
            max_wait_secs: 10,
            company_info: None,
            email_after_call: false,
            notification_email: None,
        }
    }
}

/// Create a new agent and return the stored row.
pub async fn create_agent(pool: &SqlitePool, new: &NewAgent) -> Result<Agent> {
    let result = sqlx::query(
        r#"
        INSERT INTO agents
            (user_id, name, prompt, first_sentence, voice, gender,
             max_call_duration_mins, max_wait_secs, company_info,
             email_after_call, notification_email)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(new.user_id)
    .bind(&new.name)
    .bind(&new.prompt)
    .bind(&new.first_sentence)
    .bind(&new.voice)
    .bind(&new.gender)
    .bind(new.max_call_duration_mins)
    .bind(new.max_wait_secs)
    .bind(&new.company_info)
    .bind(new.email_after_call)
    .bind(&new.notification_email)
    .execute(pool)
    .await?;

    get_agent(pool, result.last_insert_rowid()).await
}

/// Get an agent by ID.
pub async fn get_agent(pool: &SqlitePool, id: i64) -> Result<Agent> {
    sqlx::query_as::<_, Agent>(
        r#"
        SELECT id, user_id, name, prompt, first_sentence, voice, gender,
               max_call_duration_mins, max_wait_secs, company_info,
               email_after_call, notification_email, created_at
        FROM agents
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Agent",
        id: id.to_string(),
    })
}

/// List all agents, ordered by ID.
///
/// The IVR menu indexes into this list 1-based, so the ordering must be
/// stable across calls.
pub async fn list_agents(pool: &SqlitePool) -> Result<Vec<Agent>> {
    let agents = sqlx::query_as::<_, Agent>(
        r#"
        SELECT id, user_id, name, prompt, first_sentence, voice, gender,
               max_call_duration_mins, max_wait_secs, company_info,
               email_after_call, notification_email, created_at
        FROM agents
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(agents)
}

/// List agents owned by a user.
pub async fn list_agents_for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Agent>> {
    let agents = sqlx::query_as::<_, Agent>(
        r#"
        SELECT id, user_id, name, prompt, first_sentence, voice, gender,
               max_call_duration_mins, max_wait_secs, company_info,
               email_after_call, notification_email, created_at
        FROM agents
        WHERE user_id = ?
        ORDER BY id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(agents)
}

/// Update an existing agent.
pub async fn update_agent(pool: &SqlitePool, agent: &Agent) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE agents
        SET user_id = ?, name = ?, prompt = ?, first_sentence = ?, voice = ?,
            gender = ?, max_call_duration_mins = ?, max_wait_secs = ?,
            company_info = ?, email_after_call = ?, notification_email = ?
        WHERE id = ?
        "#,
    )
    .bind(agent.user_id)
    .bind(&agent.name)
    .bind(&agent.prompt)
    .bind(&agent.first_sentence)
    .bind(&agent.voice)
    .bind(&agent.gender)
    .bind(agent.max_call_duration_mins)
    .bind(agent.max_wait_secs)
    .bind(&agent.company_info)
    .bind(agent.email_after_call)
    .bind(&agent.notification_email)
    .bind(agent.id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Agent",
            id: agent.id.to_string(),
        });
    }

    Ok(())
}

/// Delete an agent.
///
/// The schema detaches any bound phone number and removes attached
/// documents. Staff accounts scoped to this agent alone are deleted with
/// it, since they have nothing left to manage.
pub async fn delete_agent(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM users
        WHERE role = 'staff' AND assigned_agent_id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    let result = sqlx::query(
        r#"
        DELETE FROM agents
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Agent",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Count total agents.
pub async fn count_agents(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM agents
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
