//! Repository for the `comments` table.
//!
//! The editing workflow only ever inserts system notices and checks for the
//! presence of prior comments; reader-facing comment CRUD lives elsewhere.

use quill_core::types::DbId;
use sqlx::postgres::PgExecutor;
use sqlx::PgPool;

use crate::models::comment::Comment;

/// Column list for comments queries.
const COLUMNS: &str = "id, post_id, nickname, email, content, is_system, created_at";

/// Nickname attached to system-generated notices.
const SYSTEM_NICKNAME: &str = "System";

/// Provides the comment operations the editing workflow needs.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a system notice on a post (e.g. a title reset-point marker).
    pub async fn create_system_notice(
        executor: impl PgExecutor<'_>,
        post_id: DbId,
        email: &str,
        content: &str,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (post_id, nickname, email, content, is_system)
             VALUES ($1, $2, $3, $4, true)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(post_id)
            .bind(SYSTEM_NICKNAME)
            .bind(email)
            .bind(content)
            .fetch_one(executor)
            .await
    }

    /// Does the post have any comments?
    pub async fn has_comments(pool: &PgPool, post_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM comments WHERE post_id = $1)",
        )
        .bind(post_id)
        .fetch_one(pool)
        .await
    }

    /// List a post's comments, oldest first.
    pub async fn list_by_post(
        pool: &PgPool,
        post_id: DbId,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments WHERE post_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(post_id)
            .fetch_all(pool)
            .await
    }
}
