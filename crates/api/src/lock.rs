//! Per-document mutual exclusion for mutating endpoints.
//!
//! Every mutating workflow on a post runs inside a transaction that first
//! takes a PostgreSQL transaction-scoped advisory lock keyed by
//! (operation route, post id). Two concurrent edit attempts on the same
//! post therefore serialize at the database, and the lock is released with
//! the commit or rollback.

use quill_core::types::DbId;
use sha2::{Digest, Sha256};
use sqlx::{Postgres, Transaction};

/// Route keys for the mutating endpoints.
pub const ROUTE_MERGE_INTAKE: &str = "posts/merge";
pub const ROUTE_MERGE_ACCEPT: &str = "merge-requests/accept";
pub const ROUTE_EDIT: &str = "posts/edit";
pub const ROUTE_REVERT: &str = "posts/history/revert";
pub const ROUTE_MODERATE: &str = "posts/moderate";

/// Derive a stable 64-bit advisory lock key from a route and post id.
pub fn lock_key(route: &str, post_id: DbId) -> i64 {
    let digest = Sha256::digest(format!("{route}:{post_id}").as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    i64::from_be_bytes(bytes)
}

/// Take the advisory lock for (route, post id) within the transaction.
///
/// Blocks until the lock is available; it is released automatically when
/// the transaction ends.
pub async fn acquire(
    tx: &mut Transaction<'_, Postgres>,
    route: &str,
    post_id: DbId,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(lock_key(route, post_id))
        .execute(&mut **tx)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_key_is_deterministic() {
        assert_eq!(lock_key(ROUTE_EDIT, 7), lock_key(ROUTE_EDIT, 7));
    }

    #[test]
    fn lock_key_distinguishes_posts_and_routes() {
        assert_ne!(lock_key(ROUTE_EDIT, 7), lock_key(ROUTE_EDIT, 8));
        assert_ne!(lock_key(ROUTE_EDIT, 7), lock_key(ROUTE_MERGE_INTAKE, 7));
    }
}
