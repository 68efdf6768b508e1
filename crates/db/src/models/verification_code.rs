//! One-time verification codes keyed by submitter email.

use quill_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `verification_codes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VerificationCode {
    pub id: DbId,
    pub email: String,
    pub code: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

/// Request body for the code issuance endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueCodeRequest {
    pub email: String,
}
