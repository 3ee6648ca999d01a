//! Credit ledger persistence.
//!
//! One integer balance per user. The debit is a single conditional
//! UPDATE, so two racing turns can both pass admission but cannot drive
//! the balance negative; at worst one of them goes undebited.

use sqlx::SqlitePool;

use crate::Result;

/// Read a user's balance, creating the ledger row with `default_balance`
/// on first access.
pub async fn get_or_init(pool: &SqlitePool, user_id: &str, default_balance: i64) -> Result<i64> {
    sqlx::query(
        r#"
        INSERT INTO credits (user_id, balance)
        VALUES (?, ?)
        ON CONFLICT(user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(default_balance)
    .execute(pool)
    .await?;

    let row: (i64,) = sqlx::query_as(
        r#"
        SELECT balance
        FROM credits
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}

/// Atomically debit `cost` if the balance covers it.
///
/// Returns true when the debit happened. A false return means a
/// concurrent turn spent the remaining balance first.
pub async fn try_debit(pool: &SqlitePool, user_id: &str, cost: i64) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE credits
        SET balance = balance - ?
        WHERE user_id = ? AND balance >= ?
        "#,
    )
    .bind(cost)
    .bind(user_id)
    .bind(cost)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_first_access_initializes_default() {
        let db = test_db().await;

        let balance = get_or_init(db.pool(), "alice", 500).await.unwrap();
        assert_eq!(balance, 500);

        // Second access does not reset
        try_debit(db.pool(), "alice", 1).await.unwrap();
        let balance = get_or_init(db.pool(), "alice", 500).await.unwrap();
        assert_eq!(balance, 499);
    }

    #[tokio::test]
    async fn test_debit_requires_cover() {
        let db = test_db().await;
        get_or_init(db.pool(), "alice", 4).await.unwrap();

        assert!(!try_debit(db.pool(), "alice", 5).await.unwrap());
        assert!(try_debit(db.pool(), "alice", 4).await.unwrap());
        assert_eq!(get_or_init(db.pool(), "alice", 500).await.unwrap(), 0);

        // Exhausted balance never goes negative
        assert!(!try_debit(db.pool(), "alice", 1).await.unwrap());
    }
}
