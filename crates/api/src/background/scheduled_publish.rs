//! Promotion of scheduled posts.
//!
//! Scans for posts in the schedule state whose publication time has
//! arrived, publishes them, and indexes them. Runs on a fixed interval
//! using `tokio::time::interval`.

use std::time::Duration;

use chrono::Utc;
use quill_db::repositories::PostRepo;
use quill_db::DbPool;
use quill_events::{DomainEvent, Notifier};
use tokio_util::sync::CancellationToken;

use crate::index;

/// How often the schedule queue is scanned.
const SCAN_INTERVAL: Duration = Duration::from_secs(60);

/// Run the scheduled-publish loop until `cancel` is triggered.
pub async fn run(pool: DbPool, notifier: Notifier, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = SCAN_INTERVAL.as_secs(),
        "Scheduled-publish job started"
    );

    let mut interval = tokio::time::interval(SCAN_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Scheduled-publish job stopping");
                break;
            }
            _ = interval.tick() => {
                promote_due_posts(&pool, &notifier).await;
            }
        }
    }
}

/// Publish every scheduled post whose time has come.
pub async fn promote_due_posts(pool: &DbPool, notifier: &Notifier) {
    let due = match PostRepo::list_due_scheduled(pool, Utc::now()).await {
        Ok(due) => due,
        Err(e) => {
            tracing::error!(error = %e, "Scheduled-publish scan failed");
            return;
        }
    };

    for post in due {
        match PostRepo::publish_now(pool, post.id, Utc::now()).await {
            Ok(Some(published)) => {
                index::sync_add(pool, &published).await;
                notifier.publish(DomainEvent::new("post.published").with_post(published.id));
                tracing::info!(post_id = published.id, "Scheduled post published");
            }
            Ok(None) => {
                // Deleted between scan and publish; nothing to do.
            }
            Err(e) => {
                tracing::error!(post_id = post.id, error = %e, "Scheduled publish failed");
            }
        }
    }
}
