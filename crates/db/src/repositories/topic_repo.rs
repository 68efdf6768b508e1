//! Repository for the `topics` table.

use quill_core::types::DbId;
use sqlx::PgPool;

use crate::models::topic::Topic;

/// Column list for topics queries.
const COLUMNS: &str = "id, title, created_at";

/// Provides CRUD operations for topics.
pub struct TopicRepo;

impl TopicRepo {
    /// Insert a new topic.
    pub async fn create(pool: &PgPool, title: &str) -> Result<Topic, sqlx::Error> {
        let query = format!("INSERT INTO topics (title) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Topic>(&query)
            .bind(title)
            .fetch_one(pool)
            .await
    }

    /// Do all of the given topic IDs exist?
    ///
    /// An empty slice trivially validates.
    pub async fn all_exist(pool: &PgPool, ids: &[DbId]) -> Result<bool, sqlx::Error> {
        if ids.is_empty() {
            return Ok(true);
        }
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM topics WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_one(pool)
        .await?;
        Ok(count as usize == ids.len())
    }

    /// List all topics, ordered by title.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Topic>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM topics ORDER BY title ASC");
        sqlx::query_as::<_, Topic>(&query).fetch_all(pool).await
    }
}
