use crate::types::DbId;

/// Domain-level error for the editing and merge workflows.
///
/// Every variant is a recoverable, user-facing rejection reason; the API
/// layer maps each to a distinct HTTP status and error code. `Internal` is
/// the only variant that hides its detail from the caller.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Verification code is missing, expired or incorrect")]
    InvalidCode,

    #[error("Content is unchanged or the change is too small to be meaningful")]
    NoOpChange,

    #[error("Submitter is blacklisted: {0}")]
    Blacklisted(String),

    #[error("A pending request from this submitter already exists for this post")]
    DuplicatePending,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
