//! Repository for the `search_index` table.
//!
//! This is the storage side of the opaque search collaborator: the index
//! synchronizer only ever calls [`SearchIndexRepo::add`] and
//! [`SearchIndexRepo::delete`]; ranking and tsvector maintenance are
//! internal to this module.

use quill_core::search::{WEIGHT_BODY, WEIGHT_TITLE};
use quill_core::types::DbId;
use sqlx::PgPool;

use crate::models::search::{SearchHit, SearchIndexEntry};

/// Column list for search_index queries (the tsvector stays internal).
const COLUMNS: &str = "post_id, title, body, updated_at";

/// Provides add/delete/query operations for the full-text index.
pub struct SearchIndexRepo;

impl SearchIndexRepo {
    /// Add or refresh a post's index row.
    ///
    /// `body` is expected to be tag-stripped text; the weighted tsvector is
    /// rebuilt on every call.
    pub async fn add(
        pool: &PgPool,
        post_id: DbId,
        title: &str,
        body: &str,
    ) -> Result<SearchIndexEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO search_index (post_id, title, body, document, updated_at)
             VALUES ($1, $2, $3,
                     setweight(to_tsvector('english', $2), '{WEIGHT_TITLE}') ||
                     setweight(to_tsvector('english', $3), '{WEIGHT_BODY}'),
                     now())
             ON CONFLICT (post_id) DO UPDATE SET
                title = EXCLUDED.title,
                body = EXCLUDED.body,
                document = EXCLUDED.document,
                updated_at = now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SearchIndexEntry>(&query)
            .bind(post_id)
            .bind(title)
            .bind(body)
            .fetch_one(pool)
            .await
    }

    /// Remove a post's index row.
    ///
    /// Returns `true` if a row was removed, `false` if the post was not
    /// indexed.
    pub async fn delete(pool: &PgPool, post_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM search_index WHERE post_id = $1")
            .bind(post_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Is the post currently indexed?
    pub async fn contains(pool: &PgPool, post_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM search_index WHERE post_id = $1)",
        )
        .bind(post_id)
        .fetch_one(pool)
        .await
    }

    /// Ranked full-text query against the index.
    ///
    /// `tsquery` must be a sanitized tsquery string (see
    /// `quill_core::search::build_tsquery`).
    pub async fn search(
        pool: &PgPool,
        tsquery: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SearchHit>, sqlx::Error> {
        sqlx::query_as::<_, SearchHit>(
            "SELECT post_id, title,
                    ts_rank(document, to_tsquery('english', $1)) AS rank
             FROM search_index
             WHERE document @@ to_tsquery('english', $1)
             ORDER BY rank DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(tsquery)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }
}
