//! Billing transaction ledger. Rows are immutable once written.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::Transaction;

/// Append a transaction row. Negative amounts are debits.
pub async fn create_transaction(
    pool: &SqlitePool,
    user_id: i64,
    amount: f64,
    tx_type: &str,
    description: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO transactions (user_id, amount, tx_type, description)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(amount)
    .bind(tx_type)
    .bind(description)
    .execute(pool)
    .await?;

    Ok(())
}

/// List transactions for a user, newest first.
pub async fn list_transactions_for_user(
    pool: &SqlitePool,
    user_id: i64,
    limit: i64,
) -> Result<Vec<Transaction>> {
    let rows = sqlx::query_as::<_, Transaction>(
        r#"
        SELECT id, user_id, amount, tx_type, description, created_at
        FROM transactions
        WHERE user_id = ?
        ORDER BY id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
