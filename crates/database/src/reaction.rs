//! Reaction persistence with toggle semantics.
//!
//! At most one reaction per (message, user) pair, enforced by a UNIQUE
//! constraint so a racing double-insert fails at the store rather than
//! producing two rows.

use sqlx::SqlitePool;

use crate::models::ReactionCounts;
use crate::{message, DatabaseError, Result};

/// Toggle a user's reaction on an assistant message.
///
/// - no existing reaction: create one with `kind`
/// - existing reaction of the same kind: delete it (toggle off)
/// - existing reaction of the other kind: switch it in place
///
/// Returns the refreshed counts for the message. Fails `InvalidTarget`
/// for user-authored messages.
pub async fn toggle(
    pool: &SqlitePool,
    message_id: i64,
    user_id: &str,
    kind: &str,
) -> Result<ReactionCounts> {
    let target = message::get(pool, message_id).await?;
    if !target.is_assistant() {
        return Err(DatabaseError::InvalidTarget(
            "reactions are only valid on assistant messages".to_string(),
        ));
    }

    let existing: Option<(String,)> = sqlx::query_as(
        r#"
        SELECT kind
        FROM reactions
        WHERE message_id = ? AND user_id = ?
        "#,
    )
    .bind(message_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    match existing {
        None => {
            sqlx::query(
                r#"
                INSERT INTO reactions (message_id, user_id, kind)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(message_id)
            .bind(user_id)
            .bind(kind)
            .execute(pool)
            .await?;
        }
        Some((current,)) if current == kind => {
            sqlx::query(
                r#"
                DELETE FROM reactions
                WHERE message_id = ? AND user_id = ?
                "#,
            )
            .bind(message_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        }
        Some(_) => {
            sqlx::query(
                r#"
                UPDATE reactions
                SET kind = ?
                WHERE message_id = ? AND user_id = ?
                "#,
            )
            .bind(kind)
            .bind(message_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        }
    }

    counts(pool, message_id).await
}

/// Up/down totals for a message.
pub async fn counts(pool: &SqlitePool, message_id: i64) -> Result<ReactionCounts> {
    let row: (i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(CASE WHEN kind = 'up' THEN 1 END),
            COUNT(CASE WHEN kind = 'down' THEN 1 END)
        FROM reactions
        WHERE message_id = ?
        "#,
    )
    .bind(message_id)
    .fetch_one(pool)
    .await?;

    Ok(ReactionCounts {
        up: row.0,
        down: row.1,
    })
}

/// The calling user's own reaction on a message, if any.
pub async fn for_user(
    pool: &SqlitePool,
    message_id: i64,
    user_id: &str,
) -> Result<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as(
        r#"
        SELECT kind
        FROM reactions
        WHERE message_id = ? AND user_id = ?
        "#,
    )
    .bind(message_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(kind,)| kind))
}
