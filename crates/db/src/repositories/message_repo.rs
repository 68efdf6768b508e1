//! Repository for the `messages` table (moderator inbox).

use quill_core::types::DbId;
use sqlx::postgres::PgExecutor;
use sqlx::PgPool;

use crate::models::message::{CreateMessage, Message};

/// Column list for messages queries.
const COLUMNS: &str = "id, title, content, link, is_read, created_at";

/// Provides CRUD operations for moderator inbox messages.
pub struct MessageRepo;

impl MessageRepo {
    /// Insert a new inbox message.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateMessage,
    ) -> Result<Message, sqlx::Error> {
        let query = format!(
            "INSERT INTO messages (title, content, link)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.link)
            .fetch_one(executor)
            .await
    }

    /// List unread messages, newest first.
    pub async fn list_unread(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages
             WHERE NOT is_read
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark a message as read.
    pub async fn mark_read(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE messages SET is_read = true WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
