//! Immutable post revision snapshots.

use quill_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::post::Post;

/// A row from the `post_revisions` table. Never mutated after creation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostRevision {
    pub id: DbId,
    pub post_id: DbId,
    pub title: String,
    pub content: String,
    pub protect_content: Option<String>,
    pub category_id: DbId,
    pub topic_ids: Vec<DbId>,
    pub label: Option<String>,
    pub modify_date: Timestamp,
    pub created_at: Timestamp,
}

/// DTO for archiving a post's current state as a revision.
#[derive(Debug, Clone)]
pub struct CreateRevision {
    pub post_id: DbId,
    pub title: String,
    pub content: String,
    pub protect_content: Option<String>,
    pub category_id: DbId,
    pub topic_ids: Vec<DbId>,
    pub label: Option<String>,
    pub modify_date: Timestamp,
}

impl CreateRevision {
    /// Snapshot the given post's current state.
    pub fn from_post(post: &Post) -> Self {
        Self {
            post_id: post.id,
            title: post.title.clone(),
            content: post.content.clone(),
            protect_content: post.protect_content.clone(),
            category_id: post.category_id,
            topic_ids: post.topic_ids.clone(),
            label: post.label.clone(),
            modify_date: post.modify_date,
        }
    }
}
