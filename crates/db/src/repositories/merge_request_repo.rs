//! Repository for the `merge_requests` table.

use quill_core::types::{DbId, Timestamp};
use sqlx::postgres::PgExecutor;
use sqlx::PgPool;

use crate::models::merge_request::{CreateMergeRequest, MergeRequest};

/// Column list for merge_requests queries.
const COLUMNS: &str = "id, post_id, title, content, modifier, modifier_email, ip, \
    merge_state, submit_time, created_at";

/// Provides intake and moderation operations for merge requests.
pub struct MergeRequestRepo;

impl MergeRequestRepo {
    /// Insert a new pending merge request, returning the created row.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateMergeRequest,
    ) -> Result<MergeRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO merge_requests
                (post_id, title, content, modifier, modifier_email, ip)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MergeRequest>(&query)
            .bind(input.post_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.modifier)
            .bind(&input.modifier_email)
            .bind(&input.ip)
            .fetch_one(executor)
            .await
    }

    /// Find a merge request by its ID.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<MergeRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM merge_requests WHERE id = $1");
        sqlx::query_as::<_, MergeRequest>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a post's merge request for the resubmission view.
    ///
    /// Merged requests are immutable history and excluded.
    pub async fn find_for_post(
        pool: &PgPool,
        post_id: DbId,
        id: DbId,
    ) -> Result<Option<MergeRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM merge_requests
             WHERE id = $1 AND post_id = $2 AND merge_state <> 'merged'"
        );
        sqlx::query_as::<_, MergeRequest>(&query)
            .bind(id)
            .bind(post_id)
            .fetch_optional(pool)
            .await
    }

    /// The submitter's own non-merged request, addressed by id, for
    /// resubmission.
    ///
    /// A resubmission overwrites this row instead of creating a second one;
    /// merged requests are immutable history and never match.
    pub async fn find_owned(
        executor: impl PgExecutor<'_>,
        post_id: DbId,
        id: DbId,
        modifier_email: &str,
    ) -> Result<Option<MergeRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM merge_requests
             WHERE id = $1 AND post_id = $2 AND modifier_email = $3
               AND merge_state <> 'merged'"
        );
        sqlx::query_as::<_, MergeRequest>(&query)
            .bind(id)
            .bind(post_id)
            .bind(modifier_email)
            .fetch_optional(executor)
            .await
    }

    /// Does the submitter already have a pending request on this post?
    pub async fn has_pending(
        pool: &PgPool,
        post_id: DbId,
        modifier_email: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM merge_requests
                WHERE post_id = $1 AND modifier_email = $2 AND merge_state = 'pending')",
        )
        .bind(post_id)
        .bind(modifier_email)
        .fetch_one(pool)
        .await
    }

    /// Count pending requests for a (post, submitter) pair.
    pub async fn count_pending(
        pool: &PgPool,
        post_id: DbId,
        modifier_email: &str,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM merge_requests
             WHERE post_id = $1 AND modifier_email = $2 AND merge_state = 'pending'",
        )
        .bind(post_id)
        .bind(modifier_email)
        .fetch_one(pool)
        .await
    }

    /// Has the submitter ever had a request blocked, on any post?
    ///
    /// This is the derived trust record: one block blacklists the email
    /// globally.
    pub async fn has_blocked_submitter(
        pool: &PgPool,
        modifier_email: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM merge_requests
                WHERE modifier_email = $1 AND merge_state = 'block')",
        )
        .bind(modifier_email)
        .fetch_one(pool)
        .await
    }

    /// Overwrite a request's proposed content on resubmission.
    ///
    /// Resets the state to pending and stamps a fresh submission time.
    pub async fn overwrite(
        executor: impl PgExecutor<'_>,
        id: DbId,
        input: &CreateMergeRequest,
        submit_time: Timestamp,
    ) -> Result<Option<MergeRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE merge_requests SET
                title = $1,
                content = $2,
                modifier = $3,
                ip = $4,
                merge_state = 'pending',
                submit_time = $5
             WHERE id = $6
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MergeRequest>(&query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.modifier)
            .bind(&input.ip)
            .bind(submit_time)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Transition a request to a new state.
    pub async fn set_state(
        executor: impl PgExecutor<'_>,
        id: DbId,
        state: &str,
    ) -> Result<Option<MergeRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE merge_requests SET merge_state = $1 WHERE id = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MergeRequest>(&query)
            .bind(state)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List requests by state, oldest submission first (moderation queue
    /// order).
    pub async fn list_by_state(
        pool: &PgPool,
        state: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MergeRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM merge_requests
             WHERE merge_state = $1
             ORDER BY submit_time ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, MergeRequest>(&query)
            .bind(state)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
