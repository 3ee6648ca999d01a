//! SQLite persistence layer for the Murmur chat service.
//!
//! This crate provides async database operations for conversations,
//! messages, reactions, credits, profiles, and the provider model catalog
//! using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{conversation, message, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:murmur.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Create a conversation and its first message
//!     let conv = conversation::create(db.pool(), "user-1").await?;
//!     message::append_text(db.pool(), conv.id, database::SENDER_USER, "Hello").await?;
//!
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod conversation;
pub mod credits;
pub mod error;
pub mod message;
pub mod models;
pub mod profile;
pub mod reaction;

pub use error::{DatabaseError, Result};
pub use models::{
    BackendChoice, Conversation, Message, Profile, ReactionCounts, SENDER_ASSISTANT, SENDER_USER,
};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    /// Set high enough to handle request-parallel turn processing.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `sqlite::memory:` for tests.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_conversation_crud() {
        let db = test_db().await;

        // Create
        let conv = conversation::create(db.pool(), "user-1").await.unwrap();
        assert!(conv.id > 0);
        assert_eq!(conv.user_id, "user-1");
        assert!(conv.summary.is_none());

        // Read, owner-scoped
        let fetched = conversation::get_for_user(db.pool(), conv.id, "user-1")
            .await
            .unwrap();
        assert_eq!(fetched.public_id, conv.public_id);

        // Cross-user access answers NotFound
        let result = conversation::get_for_user(db.pool(), conv.id, "user-2").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));

        // Delete
        conversation::delete_for_user(db.pool(), conv.id, "user-1")
            .await
            .unwrap();
        let result = conversation::get_for_user(db.pool(), conv.id, "user-1").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_cascade_delete_messages_and_reactions() {
        let db = test_db().await;

        let conv = conversation::create(db.pool(), "user-1").await.unwrap();
        let msg = message::append_text(db.pool(), conv.id, SENDER_ASSISTANT, "hi")
            .await
            .unwrap();
        reaction::toggle(db.pool(), msg.id, "user-1", "up")
            .await
            .unwrap();

        conversation::delete_for_user(db.pool(), conv.id, "user-1")
            .await
            .unwrap();

        let messages = message::list(db.pool(), conv.id).await.unwrap();
        assert!(messages.is_empty());
        let counts = reaction::counts(db.pool(), msg.id).await.unwrap();
        assert_eq!((counts.up, counts.down), (0, 0));
    }
}
