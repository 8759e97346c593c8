//! User CRUD and billing-state mutations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::User;

/// Fields for a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub assigned_agent_id: Option<i64>,
    pub plan: String,
}

/// Create a new user and return the stored row.
pub async fn create_user(pool: &SqlitePool, new: &NewUser) -> Result<User> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (email, password_hash, name, role, assigned_agent_id, plan)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&new.email)
    .bind(&new.password_hash)
    .bind(&new.name)
    .bind(&new.role)
    .bind(new.assigned_agent_id)
    .bind(&new.plan)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "User",
                    id: new.email.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    get_user(pool, result.last_insert_rowid()).await
}

/// Get a user by ID.
pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, name, role, assigned_agent_id, plan,
               credits_balance, usage_minutes_used, reset_token,
               reset_token_expires_at, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: id.to_string(),
    })
}

/// Get a user by email.
pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, name, role, assigned_agent_id, plan,
               credits_balance, usage_minutes_used, reset_token,
               reset_token_expires_at, created_at
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: email.to_string(),
    })
}

/// Update an existing user's profile and plan fields.
pub async fn update_user(pool: &SqlitePool, user: &User) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET email = ?, password_hash = ?, name = ?, role = ?,
            assigned_agent_id = ?, plan = ?
        WHERE id = ?
        "#,
    )
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.name)
    .bind(&user.role)
    .bind(user.assigned_agent_id)
    .bind(&user.plan)
    .bind(user.id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: user.id.to_string(),
        });
    }

    Ok(())
}

/// Delete a user by ID.
pub async fn delete_user(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// List all users.
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, name, role, assigned_agent_id, plan,
               credits_balance, usage_minutes_used, reset_token,
               reset_token_expires_at, created_at
        FROM users
        ORDER BY email
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Add minutes to a user's cumulative usage counter.
pub async fn add_usage_minutes(pool: &SqlitePool, id: i64, minutes: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET usage_minutes_used = usage_minutes_used + ?
        WHERE id = ?
        "#,
    )
    .bind(minutes)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Debit a user's credit balance. The balance has no floor and may go
/// negative.
pub async fn debit_credits(pool: &SqlitePool, id: i64, amount: f64) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET credits_balance = credits_balance - ?
        WHERE id = ?
        "#,
    )
    .bind(amount)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Credit a user's balance (top-up).
pub async fn credit_credits(pool: &SqlitePool, id: i64, amount: f64) -> Result<()> {
    debit_credits(pool, id, -amount).await
}

/// Set the password-reset token, replacing any active one.
pub async fn set_reset_token(
    pool: &SqlitePool,
    id: i64,
    token: &str,
    expires_at_ms: i64,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET reset_token = ?, reset_token_expires_at = ?
        WHERE id = ?
        "#,
    )
    .bind(token)
    .bind(expires_at_ms)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Clear the password-reset token after use or expiry.
pub async fn clear_reset_token(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE users
        SET reset_token = NULL, reset_token_expires_at = NULL
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            name: "Test".to_string(),
            role: "admin".to_string(),
            assigned_agent_id: None,
            plan: "STARTER".to_string(),
        }
    }

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = test_db().await;
        create_user(db.pool(), &new_user("a@example.com")).await.unwrap();
        let result = create_user(db.pool(), &new_user("a@example.com")).await;
        assert!(matches!(result, Err(DatabaseError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_debit_below_zero() {
        let db = test_db().await;
        let user = create_user(db.pool(), &new_user("b@example.com")).await.unwrap();
        assert_eq!(user.credits_balance, 0.0);

        debit_credits(db.pool(), user.id, 1.25).await.unwrap();
        let user = get_user(db.pool(), user.id).await.unwrap();
        assert_eq!(user.credits_balance, -1.25);
    }

    #[tokio::test]
    async fn test_usage_counter() {
        let db = test_db().await;
        let user = create_user(db.pool(), &new_user("c@example.com")).await.unwrap();

        add_usage_minutes(db.pool(), user.id, 2).await.unwrap();
        add_usage_minutes(db.pool(), user.id, 3).await.unwrap();
        let user = get_user(db.pool(), user.id).await.unwrap();
        assert_eq!(user.usage_minutes_used, 5);
    }

    #[tokio::test]
    async fn test_lookup_by_email() {
        let db = test_db().await;
        let created = create_user(db.pool(), &new_user("d@example.com")).await.unwrap();
        let found = get_user_by_email(db.pool(), "d@example.com").await.unwrap();
        assert_eq!(found.id, created.id);

        let missing = get_user_by_email(db.pool(), "nobody@example.com").await;
        assert!(matches!(missing, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_reset_token_roundtrip() {
        let db = test_db().await;
        let user = create_user(db.pool(), &new_user("e@example.com")).await.unwrap();

        set_reset_token(db.pool(), user.id, "tok123", crate::now_ms() + 3_600_000)
            .await
            .unwrap();
        let user = get_user(db.pool(), user.id).await.unwrap();
        assert_eq!(user.reset_token.as_deref(), Some("tok123"));
        assert!(user.reset_token_expires_at.is_some());

        clear_reset_token(db.pool(), user.id).await.unwrap();
        let user = get_user(db.pool(), user.id).await.unwrap();
        assert!(user.reset_token.is_none());
        assert!(user.reset_token_expires_at.is_none());
    }
}
