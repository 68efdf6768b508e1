//! Periodic cleanup of expired verification codes.
//!
//! Consumption already ignores expired rows; this job just keeps the table
//! from growing without bound.

use std::time::Duration;

use quill_db::repositories::CodeRepo;
use quill_db::DbPool;
use tokio_util::sync::CancellationToken;

/// How often the cleanup job runs.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Run the code cleanup loop until `cancel` is triggered.
pub async fn run(pool: DbPool, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = CLEANUP_INTERVAL.as_secs(),
        "Verification-code cleanup job started"
    );

    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Verification-code cleanup job stopping");
                break;
            }
            _ = interval.tick() => {
                match CodeRepo::purge_expired(&pool).await {
                    Ok(purged) => {
                        if purged > 0 {
                            tracing::info!(purged, "Expired verification codes purged");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Verification-code cleanup failed");
                    }
                }
            }
        }
    }
}
