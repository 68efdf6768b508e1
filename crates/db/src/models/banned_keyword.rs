//! Maintained banned-keyword patterns for the trust gate.

use quill_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `banned_keywords` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BannedKeyword {
    pub id: DbId,
    pub pattern: String,
    pub created_at: Timestamp,
}

/// DTO for adding a keyword pattern to the set.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBannedKeyword {
    pub pattern: String,
}
