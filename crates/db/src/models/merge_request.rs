//! Merge request entity and intake DTOs.

use quill_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `merge_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MergeRequest {
    pub id: DbId,
    pub post_id: DbId,
    pub title: String,
    pub content: String,
    pub modifier: String,
    pub modifier_email: String,
    pub ip: Option<String>,
    pub merge_state: String,
    pub submit_time: Timestamp,
    pub created_at: Timestamp,
}

/// Proposed replacement content carried by an intake submission.
#[derive(Debug, Clone)]
pub struct CreateMergeRequest {
    pub post_id: DbId,
    pub title: String,
    pub content: String,
    pub modifier: String,
    pub modifier_email: String,
    pub ip: Option<String>,
}

/// Request body for the merge intake endpoint.
///
/// `merge_request_id` is set when resubmitting from the edit view of an
/// existing request; the intake then overwrites that request in place
/// instead of creating a new row.
#[derive(Debug, Clone, Deserialize)]
pub struct PushMergeRequest {
    pub title: String,
    pub content: String,
    pub modifier: String,
    pub modifier_email: String,
    pub code: String,
    pub merge_request_id: Option<DbId>,
}
