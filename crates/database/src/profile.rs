//! Profile persistence.

use sqlx::SqlitePool;

use crate::models::Profile;
use crate::Result;

const PROFILE_COLUMNS: &str = "user_id, backend_choice, character_name, nebius_model, \
                               ollama_model, openai_model, created_at, updated_at";

/// Load a user's profile, creating it with defaults on first access.
pub async fn get_or_create(pool: &SqlitePool, user_id: &str) -> Result<Profile> {
    sqlx::query(
        r#"
        INSERT INTO profiles (user_id)
        VALUES (?)
        ON CONFLICT(user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    let query = format!(
        r#"
        SELECT {PROFILE_COLUMNS}
        FROM profiles
        WHERE user_id = ?
        "#
    );

    let profile = sqlx::query_as::<_, Profile>(&query)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(profile)
}

/// Persist a profile's backend choice and model references.
pub async fn update(pool: &SqlitePool, profile: &Profile) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE profiles
        SET backend_choice = ?,
            character_name = ?,
            nebius_model = ?,
            ollama_model = ?,
            openai_model = ?,
            updated_at = datetime('now')
        WHERE user_id = ?
        "#,
    )
    .bind(&profile.backend_choice)
    .bind(&profile.character_name)
    .bind(&profile.nebius_model)
    .bind(&profile.ollama_model)
    .bind(&profile.openai_model)
    .bind(&profile.user_id)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BackendChoice;
    use crate::Database;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_created_with_defaults() {
        let db = test_db().await;

        let profile = get_or_create(db.pool(), "alice").await.unwrap();
        assert_eq!(profile.choice(), Some(BackendChoice::Character));
        assert!(profile.character_name.is_none());
        assert!(profile.active_model().is_none());
    }

    #[tokio::test]
    async fn test_update_round_trip() {
        let db = test_db().await;

        let mut profile = get_or_create(db.pool(), "alice").await.unwrap();
        profile.backend_choice = BackendChoice::Nebius.as_str().to_string();
        profile.nebius_model = Some("llama-70b".to_string());
        update(db.pool(), &profile).await.unwrap();

        let fetched = get_or_create(db.pool(), "alice").await.unwrap();
        assert_eq!(fetched.choice(), Some(BackendChoice::Nebius));
        assert_eq!(fetched.active_model(), Some("llama-70b"));
    }
}
