//! Model catalog lookups.
//!
//! The catalog tables are owned by the external sync job; the service
//! only reads them. The upsert/remove functions below are the write
//! surface that job uses; request handling never calls them.

use sqlx::SqlitePool;

use crate::models::BackendChoice;
use crate::Result;

/// List the known model (or character) names of a family, sorted.
pub async fn list_models(pool: &SqlitePool, family: BackendChoice) -> Result<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT name
        FROM model_catalog
        WHERE family = ?
        ORDER BY name
        "#,
    )
    .bind(family.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(name,)| name).collect())
}

/// Whether a model name is known for a family.
pub async fn model_exists(pool: &SqlitePool, family: BackendChoice, name: &str) -> Result<bool> {
    let row: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM model_catalog
        WHERE family = ? AND name = ?
        "#,
    )
    .bind(family.as_str())
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(row.0 > 0)
}

/// Idempotently add a catalog entry (sync-job write surface).
pub async fn upsert_model(pool: &SqlitePool, family: BackendChoice, name: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO model_catalog (family, name)
        VALUES (?, ?)
        ON CONFLICT(family, name) DO NOTHING
        "#,
    )
    .bind(family.as_str())
    .bind(name)
    .execute(pool)
    .await?;

    Ok(())
}

/// Remove a catalog entry (sync-job write surface).
pub async fn remove_model(pool: &SqlitePool, family: BackendChoice, name: &str) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM model_catalog
        WHERE family = ? AND name = ?
        "#,
    )
    .bind(family.as_str())
    .bind(name)
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
    async fn test_families_are_namespaced() {
        let db = test_db().await;

        upsert_model(db.pool(), BackendChoice::Nebius, "llama-70b")
            .await
            .unwrap();
        upsert_model(db.pool(), BackendChoice::Ollama, "llama3")
            .await
            .unwrap();
        // Upsert is idempotent
        upsert_model(db.pool(), BackendChoice::Nebius, "llama-70b")
            .await
            .unwrap();

        assert_eq!(
            list_models(db.pool(), BackendChoice::Nebius).await.unwrap(),
            vec!["llama-70b"]
        );
        assert!(model_exists(db.pool(), BackendChoice::Ollama, "llama3")
            .await
            .unwrap());
        assert!(!model_exists(db.pool(), BackendChoice::Nebius, "llama3")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_remove_model() {
        let db = test_db().await;

        upsert_model(db.pool(), BackendChoice::OpenAi, "gpt-4o-mini")
            .await
            .unwrap();
        assert!(remove_model(db.pool(), BackendChoice::OpenAi, "gpt-4o-mini")
            .await
            .unwrap());
        assert!(!remove_model(db.pool(), BackendChoice::OpenAi, "gpt-4o-mini")
            .await
            .unwrap());
    }
}
