//! Pure domain logic for the quill publishing platform.
//!
//! Everything in this crate is side-effect-free and has zero internal
//! dependencies, so it can be used by the repository layer, the API
//! server, and any future CLI or worker tooling.

pub mod error;
pub mod htmldiff;
pub mod merge;
pub mod moderation;
pub mod search;
pub mod similarity;
pub mod types;
