//! Search index rows and query results.

use quill_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `search_index` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SearchIndexEntry {
    pub post_id: DbId,
    pub title: String,
    pub body: String,
    pub updated_at: Timestamp,
}

/// A ranked full-text search hit.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SearchHit {
    pub post_id: DbId,
    pub title: String,
    pub rank: f32,
}
