//! Moderator inbox messages.

use quill_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a new inbox message.
#[derive(Debug, Clone)]
pub struct CreateMessage {
    pub title: String,
    pub content: String,
    pub link: Option<String>,
}
