//! Merge-request state machine constants and transition predicates.
//!
//! A merge request is a third-party proposed replacement for a published
//! post. The only forward transitions reachable through the public contract
//! are `Pending -> Merged` (moderator accept) and `Pending -> Block`
//! (moderator block, which also blacklists the submitter globally).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// State constants (database string representations)
// ---------------------------------------------------------------------------

/// Awaiting moderator review.
pub const STATE_PENDING: &str = "pending";
/// Accepted and applied to the post.
pub const STATE_MERGED: &str = "merged";
/// Declined without blacklisting. Exists in the domain but no public
/// transition produces it; rejection-by-ignoring leaves requests pending.
pub const STATE_REJECTED: &str = "rejected";
/// Declined as abusive; taints the submitter's trust record globally.
pub const STATE_BLOCK: &str = "block";

/// All valid merge states.
pub const VALID_STATES: &[&str] = &[STATE_PENDING, STATE_MERGED, STATE_REJECTED, STATE_BLOCK];

// ---------------------------------------------------------------------------
// MergeState
// ---------------------------------------------------------------------------

/// Lifecycle state of a merge request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeState {
    Pending,
    Merged,
    Rejected,
    Block,
}

impl MergeState {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => STATE_PENDING,
            Self::Merged => STATE_MERGED,
            Self::Rejected => STATE_REJECTED,
            Self::Block => STATE_BLOCK,
        }
    }

    /// Parse from a string, returning an error for unknown states.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            STATE_PENDING => Ok(Self::Pending),
            STATE_MERGED => Ok(Self::Merged),
            STATE_REJECTED => Ok(Self::Rejected),
            STATE_BLOCK => Ok(Self::Block),
            other => Err(CoreError::Validation(format!(
                "Unknown merge state: '{other}'. Valid states: {}",
                VALID_STATES.join(", ")
            ))),
        }
    }

    /// A terminal request accepts no further transitions.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for MergeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Transition predicates
// ---------------------------------------------------------------------------

/// Only pending requests can be accepted.
pub fn can_accept(state: MergeState) -> bool {
    matches!(state, MergeState::Pending)
}

/// Only pending requests can be blocked.
pub fn can_block(state: MergeState) -> bool {
    matches!(state, MergeState::Pending)
}

/// A resubmission may overwrite any request that has not been merged.
pub fn can_resubmit(state: MergeState) -> bool {
    !matches!(state, MergeState::Merged)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_str_round_trips() {
        for state in [
            MergeState::Pending,
            MergeState::Merged,
            MergeState::Rejected,
            MergeState::Block,
        ] {
            assert_eq!(MergeState::from_str(state.as_str()).unwrap(), state);
        }
    }

    #[test]
    fn from_str_rejects_unknown() {
        assert!(MergeState::from_str("open").is_err());
        assert!(MergeState::from_str("").is_err());
    }

    #[test]
    fn only_pending_is_non_terminal() {
        assert!(!MergeState::Pending.is_terminal());
        assert!(MergeState::Merged.is_terminal());
        assert!(MergeState::Rejected.is_terminal());
        assert!(MergeState::Block.is_terminal());
    }

    #[test]
    fn accept_and_block_require_pending() {
        assert!(can_accept(MergeState::Pending));
        assert!(can_block(MergeState::Pending));
        for state in [MergeState::Merged, MergeState::Rejected, MergeState::Block] {
            assert!(!can_accept(state));
            assert!(!can_block(state));
        }
    }

    #[test]
    fn resubmit_allowed_unless_merged() {
        assert!(can_resubmit(MergeState::Pending));
        assert!(can_resubmit(MergeState::Rejected));
        assert!(can_resubmit(MergeState::Block));
        assert!(!can_resubmit(MergeState::Merged));
    }
}
