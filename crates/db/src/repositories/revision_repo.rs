//! Repository for the `post_revisions` table.
//!
//! Revisions are append-only: rows are inserted when a post's prior state is
//! archived and removed only by explicit operator deletion or when consumed
//! by a revert. There is deliberately no update method.

use quill_core::types::DbId;
use sqlx::postgres::PgExecutor;
use sqlx::PgPool;

use crate::models::revision::{CreateRevision, PostRevision};

/// Column list for post_revisions queries.
const COLUMNS: &str = "id, post_id, title, content, protect_content, category_id, \
    topic_ids, label, modify_date, created_at";

/// Provides archive and lookup operations for post revisions.
pub struct RevisionRepo;

impl RevisionRepo {
    /// Archive a snapshot, returning the created revision.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateRevision,
    ) -> Result<PostRevision, sqlx::Error> {
        let query = format!(
            "INSERT INTO post_revisions
                (post_id, title, content, protect_content, category_id, topic_ids,
                 label, modify_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PostRevision>(&query)
            .bind(input.post_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.protect_content)
            .bind(input.category_id)
            .bind(&input.topic_ids)
            .bind(&input.label)
            .bind(input.modify_date)
            .fetch_one(executor)
            .await
    }

    /// List a post's revisions ordered by modification date.
    pub async fn list_by_post(
        pool: &PgPool,
        post_id: DbId,
        newest_first: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostRevision>, sqlx::Error> {
        let order = if newest_first { "DESC" } else { "ASC" };
        let query = format!(
            "SELECT {COLUMNS} FROM post_revisions
             WHERE post_id = $1
             ORDER BY modify_date {order}
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, PostRevision>(&query)
            .bind(post_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count a post's revisions.
    pub async fn count_by_post(pool: &PgPool, post_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM post_revisions WHERE post_id = $1",
        )
        .bind(post_id)
        .fetch_one(pool)
        .await
    }

    /// Find a revision by its ID.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<PostRevision>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM post_revisions WHERE id = $1");
        sqlx::query_as::<_, PostRevision>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Delete a revision by ID.
    ///
    /// Returns `true` if a row was deleted, `false` if not found.
    pub async fn delete(executor: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM post_revisions WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
