//! Repository for the `posts` table.

use quill_core::types::{DbId, Timestamp};
use sqlx::postgres::PgExecutor;
use sqlx::PgPool;

use crate::models::post::{CreatePost, Post, PostContentUpdate};

/// Column list for posts queries.
const COLUMNS: &str = "id, title, content, protect_content, status, author, email, \
    modifier, modifier_email, category_id, label, topic_ids, locked, \
    disable_comment, disable_copy, limit_mode, regions, except_regions, ip, \
    post_date, modify_date, created_at";

/// Provides CRUD and lifecycle operations for posts.
pub struct PostRepo;

impl PostRepo {
    /// Insert a new post, returning the created row.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreatePost,
    ) -> Result<Post, sqlx::Error> {
        let query = format!(
            "INSERT INTO posts
                (title, content, protect_content, status, author, email, modifier,
                 modifier_email, category_id, label, topic_ids, disable_copy,
                 limit_mode, regions, except_regions, ip, post_date, modify_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                     $15, $16, $17, $18)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.protect_content)
            .bind(&input.status)
            .bind(&input.author)
            .bind(&input.email)
            .bind(&input.modifier)
            .bind(&input.modifier_email)
            .bind(input.category_id)
            .bind(&input.label)
            .bind(&input.topic_ids)
            .bind(input.disable_copy)
            .bind(&input.limit_mode)
            .bind(&input.regions)
            .bind(&input.except_regions)
            .bind(&input.ip)
            .bind(input.post_date)
            .bind(input.modify_date)
            .fetch_one(executor)
            .await
    }

    /// Find a post by its ID.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a post that can accept edit proposals: published and not locked.
    pub async fn find_editable(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Post>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM posts
             WHERE id = $1 AND status = 'published' AND NOT locked"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List posts, optionally filtered by status, newest modification first.
    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM posts
             WHERE ($1::text IS NULL OR status = $1)
             ORDER BY modify_date DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Replace a post's content fields (edit, merge accept, revert).
    pub async fn apply_content(
        executor: impl PgExecutor<'_>,
        id: DbId,
        update: &PostContentUpdate,
    ) -> Result<Option<Post>, sqlx::Error> {
        let query = format!(
            "UPDATE posts SET
                title = $1,
                content = $2,
                protect_content = $3,
                category_id = $4,
                label = $5,
                topic_ids = $6,
                modifier = COALESCE($7, modifier),
                modifier_email = COALESCE($8, modifier_email),
                modify_date = $9
             WHERE id = $10
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(&update.title)
            .bind(&update.content)
            .bind(&update.protect_content)
            .bind(update.category_id)
            .bind(&update.label)
            .bind(&update.topic_ids)
            .bind(&update.modifier)
            .bind(&update.modifier_email)
            .bind(update.modify_date)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Set a post's lifecycle status without touching its timestamps.
    pub async fn set_status(
        executor: impl PgExecutor<'_>,
        id: DbId,
        status: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE posts SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Publish a post now: status, post date, and modify date in one update.
    pub async fn publish_now(
        executor: impl PgExecutor<'_>,
        id: DbId,
        now: Timestamp,
    ) -> Result<Option<Post>, sqlx::Error> {
        let query = format!(
            "UPDATE posts SET status = 'published', post_date = $1, modify_date = $1
             WHERE id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(now)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Flip the edit lock, returning the new value.
    pub async fn toggle_locked(pool: &PgPool, id: DbId) -> Result<Option<bool>, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "UPDATE posts SET locked = NOT locked WHERE id = $1 RETURNING locked",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Flip the comment switch, returning the new value.
    pub async fn toggle_disable_comment(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<bool>, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "UPDATE posts SET disable_comment = NOT disable_comment
             WHERE id = $1 RETURNING disable_comment",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Flip the copy-protection switch, returning the new value.
    pub async fn toggle_disable_copy(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<bool>, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "UPDATE posts SET disable_copy = NOT disable_copy
             WHERE id = $1 RETURNING disable_copy",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Move a post to a different category.
    pub async fn change_category(
        pool: &PgPool,
        id: DbId,
        category_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE posts SET category_id = $1 WHERE id = $2")
            .bind(category_id)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace a post's topic memberships.
    pub async fn set_topics(
        pool: &PgPool,
        id: DbId,
        topic_ids: &[DbId],
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE posts SET topic_ids = $1 WHERE id = $2")
            .bind(topic_ids)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete a post. Revisions, merge requests, comments, and the
    /// search row go with it via ON DELETE CASCADE.
    pub async fn delete(executor: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Does this email own any post that was removed as abusive?
    ///
    /// Part of the derived trust record consulted by the submission gate.
    pub async fn exists_forbidden_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM posts WHERE email = $1 AND status = 'forbidden')",
        )
        .bind(email)
        .fetch_one(pool)
        .await
    }

    /// Scheduled posts whose publication time has arrived.
    pub async fn list_due_scheduled(
        pool: &PgPool,
        now: Timestamp,
    ) -> Result<Vec<Post>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM posts
             WHERE status = 'schedule' AND post_date <= $1
             ORDER BY post_date ASC"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(now)
            .fetch_all(pool)
            .await
    }
}
