//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Request-body DTOs for the handlers that operate on the entity

pub mod banned_keyword;
pub mod category;
pub mod comment;
pub mod merge_request;
pub mod message;
pub mod post;
pub mod revision;
pub mod search;
pub mod topic;
pub mod verification_code;
