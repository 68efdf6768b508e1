//! Topic entity (post topic memberships).

use quill_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `topics` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Topic {
    pub id: DbId,
    pub title: String,
    pub created_at: Timestamp,
}

/// DTO for creating a new topic.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTopic {
    pub title: String,
}
