use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::schedule::Scheduler;

/// Background task that rewrites the WAL down to the live schedule once
/// enough appends accumulate.
pub async fn run_compactor(scheduler: Arc<Scheduler>, threshold: u64) {
    let mut interval = tokio::time::interval(Duration::from_secs(60));
    loop {
        interval.tick().await;
        let appends = scheduler.wal_appends_since_compact().await;
        if appends < threshold {
            continue;
        }
        match scheduler.compact_wal().await {
            Ok(()) => info!("compacted WAL after {appends} appends"),
            Err(e) => tracing::warn!("WAL compaction failed: {e}"),
        }
    }
}
