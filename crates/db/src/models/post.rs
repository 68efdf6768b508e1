//! Post entity and the submission/edit request DTOs.

use quill_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub protect_content: Option<String>,
    pub status: String,
    pub author: String,
    pub email: String,
    pub modifier: Option<String>,
    pub modifier_email: Option<String>,
    pub category_id: DbId,
    pub label: Option<String>,
    pub topic_ids: Vec<DbId>,
    pub locked: bool,
    pub disable_comment: bool,
    pub disable_copy: bool,
    pub limit_mode: String,
    pub regions: Option<String>,
    pub except_regions: Option<String>,
    pub ip: Option<String>,
    pub post_date: Timestamp,
    pub modify_date: Timestamp,
    pub created_at: Timestamp,
}

/// DTO for inserting a new post row.
#[derive(Debug, Clone)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    pub protect_content: Option<String>,
    pub status: String,
    pub author: String,
    pub email: String,
    pub modifier: Option<String>,
    pub modifier_email: Option<String>,
    pub category_id: DbId,
    pub label: Option<String>,
    pub topic_ids: Vec<DbId>,
    pub disable_copy: bool,
    pub limit_mode: String,
    pub regions: Option<String>,
    pub except_regions: Option<String>,
    pub ip: Option<String>,
    pub post_date: Timestamp,
    pub modify_date: Timestamp,
}

/// New content applied to an existing post (edit, merge accept, revert).
#[derive(Debug, Clone)]
pub struct PostContentUpdate {
    pub title: String,
    pub content: String,
    pub protect_content: Option<String>,
    pub category_id: DbId,
    pub label: Option<String>,
    pub topic_ids: Vec<DbId>,
    pub modifier: Option<String>,
    pub modifier_email: Option<String>,
    pub modify_date: Timestamp,
}

/// Request body shared by the authoring, submission, and edit endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct PostCommand {
    pub title: String,
    pub content: String,
    pub protect_content: Option<String>,
    pub author: String,
    pub email: String,
    pub category_id: DbId,
    pub label: Option<String>,
    #[serde(default)]
    pub topic_ids: Vec<DbId>,
    pub limit_mode: Option<String>,
    pub regions: Option<String>,
    pub except_regions: Option<String>,
}

/// Request body for the anonymous submission endpoint: a [`PostCommand`]
/// plus the one-time verification code issued to the author's email.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitPostRequest {
    #[serde(flatten)]
    pub post: PostCommand,
    pub code: String,
}

/// Request body for the authoring endpoint, with optional scheduling.
#[derive(Debug, Clone, Deserialize)]
pub struct WritePostRequest {
    #[serde(flatten)]
    pub post: PostCommand,
    #[serde(default)]
    pub schedule: bool,
    pub publish_at: Option<Timestamp>,
}

/// Request body for the moderator/author edit endpoint.
///
/// When `reserve` is set and the post is published, the pre-edit state is
/// archived to the revision store before the update is applied.
#[derive(Debug, Clone, Deserialize)]
pub struct EditPostRequest {
    #[serde(flatten)]
    pub post: PostCommand,
    #[serde(default)]
    pub reserve: bool,
    pub modifier: Option<String>,
    pub modifier_email: Option<String>,
}
