//! Conversation persistence.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::Conversation;
use crate::{DatabaseError, Result};

/// Create a new empty conversation for a user.
///
/// Assigns a fresh random public identifier.
pub async fn create(pool: &SqlitePool, user_id: &str) -> Result<Conversation> {
    let public_id = Uuid::new_v4().to_string();

    let result = sqlx::query(
        r#"
        INSERT INTO conversations (user_id, public_id)
        VALUES (?, ?)
        "#,
    )
    .bind(user_id)
    .bind(&public_id)
    .execute(pool)
    .await?;

    get_for_user(pool, result.last_insert_rowid(), user_id).await
}

/// Load a conversation by id, scoped to its owner.
///
/// A conversation owned by someone else answers `NotFound`, not a
/// distinct "forbidden" error, so existence is never revealed.
pub async fn get_for_user(pool: &SqlitePool, id: i64, user_id: &str) -> Result<Conversation> {
    sqlx::query_as::<_, Conversation>(
        r#"
        SELECT id, user_id, public_id, summary, created_at
        FROM conversations
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "conversation",
        id: id.to_string(),
    })
}

/// Load a conversation by its public identifier (share view, no owner check).
pub async fn get_by_public_id(pool: &SqlitePool, public_id: &str) -> Result<Conversation> {
    sqlx::query_as::<_, Conversation>(
        r#"
        SELECT id, user_id, public_id, summary, created_at
        FROM conversations
        WHERE public_id = ?
        "#,
    )
    .bind(public_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "conversation",
        id: public_id.to_string(),
    })
}

/// List a user's conversations, newest first.
pub async fn list_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<Conversation>> {
    let conversations = sqlx::query_as::<_, Conversation>(
        r#"
        SELECT id, user_id, public_id, summary, created_at
        FROM conversations
        WHERE user_id = ?
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(conversations)
}

/// Store a conversation summary.
pub async fn set_summary(pool: &SqlitePool, id: i64, summary: &str) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE conversations
        SET summary = ?
        WHERE id = ?
        "#,
    )
    .bind(summary)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Count the messages in a conversation.
pub async fn message_count(pool: &SqlitePool, id: i64) -> Result<i64> {
    let count: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM messages
        WHERE conversation_id = ?
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(count.0)
}

/// Delete a conversation owned by the user. Cascades to messages and reactions.
pub async fn delete_for_user(pool: &SqlitePool, id: i64, user_id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM conversations
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "conversation",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Delete every conversation owned by the user. Returns how many were removed.
pub async fn delete_all_for_user(pool: &SqlitePool, user_id: &str) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM conversations
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
