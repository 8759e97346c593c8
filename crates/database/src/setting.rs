//! Key/value settings persistence.
//!
//! Holds the persisted "active agent" pointer and provider credentials.
//! The pointer is a settings row (not a process global) so every instance
//! of a scaled deployment reads the same value.

use sqlx::SqlitePool;

use crate::error::Result;

/// Get a setting value, `None` when unset.
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value = sqlx::query_scalar::<_, String>(
        r#"
        SELECT value FROM settings WHERE key = ?
        "#,
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(value)
}

/// Create or update a setting.
pub async fn set_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value)
        VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = datetime('now')
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete a setting.
pub async fn delete_setting(pool: &SqlitePool, key: &str) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM settings WHERE key = ?
        "#,
    )
    .bind(key)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    #[tokio::test]
    async fn test_setting_roundtrip() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        let pool = db.pool();

        assert_eq!(get_setting(pool, "active_agent_id").await.unwrap(), None);

        set_setting(pool, "active_agent_id", "7").await.unwrap();
        assert_eq!(
            get_setting(pool, "active_agent_id").await.unwrap(),
            Some("7".to_string())
        );

        set_setting(pool, "active_agent_id", "9").await.unwrap();
        assert_eq!(
            get_setting(pool, "active_agent_id").await.unwrap(),
            Some("9".to_string())
        );
    }
}
