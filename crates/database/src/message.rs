//! Message persistence.

use sqlx::SqlitePool;

use crate::models::{Message, SENDER_ASSISTANT};
use crate::{DatabaseError, Result};

/// Append a text message to a conversation.
pub async fn append_text(
    pool: &SqlitePool,
    conversation_id: i64,
    sender: &str,
    text: &str,
) -> Result<Message> {
    append(pool, conversation_id, sender, Some(text), None).await
}

/// Append an assistant message carrying a generated image.
pub async fn append_image(
    pool: &SqlitePool,
    conversation_id: i64,
    image_path: &str,
) -> Result<Message> {
    append(pool, conversation_id, SENDER_ASSISTANT, None, Some(image_path)).await
}

async fn append(
    pool: &SqlitePool,
    conversation_id: i64,
    sender: &str,
    text: Option<&str>,
    image_path: Option<&str>,
) -> Result<Message> {
    let result = sqlx::query(
        r#"
        INSERT INTO messages (conversation_id, sender, text, image_path)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(conversation_id)
    .bind(sender)
    .bind(text)
    .bind(image_path)
    .execute(pool)
    .await?;

    get(pool, result.last_insert_rowid()).await
}

/// Load a message by id.
pub async fn get(pool: &SqlitePool, id: i64) -> Result<Message> {
    sqlx::query_as::<_, Message>(
        r#"
        SELECT id, conversation_id, sender, text, image_path, created_at
        FROM messages
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "message",
        id: id.to_string(),
    })
}

/// Load a message by id, scoped to a conversation owner.
///
/// Messages in another user's conversation answer `NotFound`.
pub async fn get_owned(pool: &SqlitePool, id: i64, user_id: &str) -> Result<Message> {
    sqlx::query_as::<_, Message>(
        r#"
        SELECT m.id, m.conversation_id, m.sender, m.text, m.image_path, m.created_at
        FROM messages m
        JOIN conversations c ON c.id = m.conversation_id
        WHERE m.id = ? AND c.user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "message",
        id: id.to_string(),
    })
}

/// List a conversation's messages in insertion order.
pub async fn list(pool: &SqlitePool, conversation_id: i64) -> Result<Vec<Message>> {
    let messages = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, conversation_id, sender, text, image_path, created_at
        FROM messages
        WHERE conversation_id = ?
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(conversation_id)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}

/// The newest message of a conversation, if any.
pub async fn latest(pool: &SqlitePool, conversation_id: i64) -> Result<Option<Message>> {
    let message = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, conversation_id, sender, text, image_path, created_at
        FROM messages
        WHERE conversation_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(conversation_id)
    .fetch_optional(pool)
    .await?;

    Ok(message)
}

/// Delete the newest assistant message of a conversation.
///
/// Returns true if one was removed. Used by regeneration.
pub async fn delete_latest_assistant(pool: &SqlitePool, conversation_id: i64) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM messages
        WHERE id = (
            SELECT id
            FROM messages
            WHERE conversation_id = ? AND sender = ?
            ORDER BY created_at DESC, id DESC
            LIMIT 1
        )
        "#,
    )
    .bind(conversation_id)
    .bind(SENDER_ASSISTANT)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SENDER_ASSISTANT, SENDER_USER};
    use crate::{conversation, Database};

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_append_preserves_order() {
        let db = test_db().await;
        let conv = conversation::create(db.pool(), "user-1").await.unwrap();

        append_text(db.pool(), conv.id, SENDER_USER, "Hello").await.unwrap();
        append_text(db.pool(), conv.id, SENDER_ASSISTANT, "Hi there!")
            .await
            .unwrap();
        append_text(db.pool(), conv.id, SENDER_USER, "How are you?")
            .await
            .unwrap();

        let messages = list(db.pool(), conv.id).await.unwrap();
        let senders: Vec<&str> = messages.iter().map(|m| m.sender.as_str()).collect();
        assert_eq!(senders, vec![SENDER_USER, SENDER_ASSISTANT, SENDER_USER]);
        assert_eq!(messages[0].text.as_deref(), Some("Hello"));
    }

    #[tokio::test]
    async fn test_append_image_has_no_text() {
        let db = test_db().await;
        let conv = conversation::create(db.pool(), "user-1").await.unwrap();

        let msg = append_image(db.pool(), conv.id, "generated_images/generated_ab12.png")
            .await
            .unwrap();
        assert!(msg.text.is_none());
        assert!(msg.is_assistant());
        assert_eq!(
            msg.image_path.as_deref(),
            Some("generated_images/generated_ab12.png")
        );
    }

    #[tokio::test]
    async fn test_get_owned_scopes_to_owner() {
        let db = test_db().await;
        let conv = conversation::create(db.pool(), "user-1").await.unwrap();
        let msg = append_text(db.pool(), conv.id, SENDER_ASSISTANT, "hi")
            .await
            .unwrap();

        get_owned(db.pool(), msg.id, "user-1").await.unwrap();
        let result = get_owned(db.pool(), msg.id, "user-2").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_latest_assistant() {
        let db = test_db().await;
        let conv = conversation::create(db.pool(), "user-1").await.unwrap();

        append_text(db.pool(), conv.id, SENDER_USER, "q1").await.unwrap();
        append_text(db.pool(), conv.id, SENDER_ASSISTANT, "a1").await.unwrap();
        append_text(db.pool(), conv.id, SENDER_USER, "q2").await.unwrap();
        append_text(db.pool(), conv.id, SENDER_ASSISTANT, "a2").await.unwrap();

        let removed = delete_latest_assistant(db.pool(), conv.id).await.unwrap();
        assert!(removed);

        let messages = list(db.pool(), conv.id).await.unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages.last().unwrap().text.as_deref(), Some("q2"));

        // Nothing left to remove once no assistant message remains
        delete_latest_assistant(db.pool(), conv.id).await.unwrap();
        let removed = delete_latest_assistant(db.pool(), conv.id).await.unwrap();
        assert!(!removed);
    }
}
