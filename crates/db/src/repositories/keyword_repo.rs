//! Repository for the `banned_keywords` table.

use quill_core::types::DbId;
use sqlx::PgPool;

use crate::models::banned_keyword::BannedKeyword;

/// Column list for banned_keywords queries.
const COLUMNS: &str = "id, pattern, created_at";

/// Provides CRUD operations for the banned-keyword set.
pub struct KeywordRepo;

impl KeywordRepo {
    /// Add a pattern to the set.
    pub async fn create(pool: &PgPool, pattern: &str) -> Result<BannedKeyword, sqlx::Error> {
        let query = format!(
            "INSERT INTO banned_keywords (pattern) VALUES ($1) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BannedKeyword>(&query)
            .bind(pattern)
            .fetch_one(pool)
            .await
    }

    /// All maintained patterns, oldest first.
    pub async fn list_patterns(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT pattern FROM banned_keywords ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Remove a pattern by ID.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM banned_keywords WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
