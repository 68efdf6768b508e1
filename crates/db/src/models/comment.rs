//! Comment entity.
//!
//! Comments are mostly outside the editing core; the workflow only inserts
//! system notices (title reset points) and honours the `disable_comment`
//! flag.

use quill_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub post_id: DbId,
    pub nickname: String,
    pub email: Option<String>,
    pub content: String,
    pub is_system: bool,
    pub created_at: Timestamp,
}
