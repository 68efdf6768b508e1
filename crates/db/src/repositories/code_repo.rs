//! Repository for the `verification_codes` table.
//!
//! Codes are one-time: consumption is a single atomic DELETE guarded by the
//! expiry, so two concurrent submissions carrying the same code cannot both
//! succeed.

use chrono::{Duration, Utc};
use quill_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::verification_code::VerificationCode;

/// Column list for verification_codes queries.
const COLUMNS: &str = "id, email, code, expires_at, created_at";

/// Provides issue/consume operations for verification codes.
pub struct CodeRepo;

impl CodeRepo {
    /// Issue a code for the given email with the given time-to-live.
    pub async fn issue(
        pool: &PgPool,
        email: &str,
        code: &str,
        ttl_secs: i64,
    ) -> Result<VerificationCode, sqlx::Error> {
        let expires_at: Timestamp = Utc::now() + Duration::seconds(ttl_secs);
        let query = format!(
            "INSERT INTO verification_codes (email, code, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VerificationCode>(&query)
            .bind(email)
            .bind(code)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Atomically consume a matching, unexpired code.
    ///
    /// Returns `true` when a code was consumed. The delete-and-check is one
    /// statement, so a code can be consumed at most once across concurrent
    /// requests.
    pub async fn consume(pool: &PgPool, email: &str, code: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM verification_codes
             WHERE email = $1 AND code = $2 AND expires_at > now()",
        )
        .bind(email)
        .bind(code)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Was a code issued to this email within the last `window_secs` seconds?
    ///
    /// Used to rate-limit re-issuance.
    pub async fn issued_recently(
        pool: &PgPool,
        email: &str,
        window_secs: i64,
    ) -> Result<bool, sqlx::Error> {
        let cutoff: Timestamp = Utc::now() - Duration::seconds(window_secs);
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM verification_codes WHERE email = $1 AND created_at > $2)",
        )
        .bind(email)
        .bind(cutoff)
        .fetch_one(pool)
        .await
    }

    /// Remove expired codes, returning the number purged.
    pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM verification_codes WHERE expires_at <= now()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
