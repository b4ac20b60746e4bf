//! Gated persistence of analysis snapshots for reporting.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;

use crate::domain::{AnalysisResult, Clock, Snapshot};
use crate::persistence::SnapshotStore;

/// Default spacing between two snapshots (hourly).
pub const DEFAULT_SNAPSHOT_INTERVAL: TimeDelta = TimeDelta::seconds(3600);

/// Writes at most one snapshot per interval.
#[derive(Debug)]
pub struct SnapshotLogger {
    store: Arc<dyn SnapshotStore>,
    clock: Arc<dyn Clock>,
    interval: TimeDelta,
    last_snapshot_at: Mutex<Option<DateTime<Utc>>>,
}

impl SnapshotLogger {
    /// Creates a logger that has never written a snapshot.
    #[must_use]
    pub fn new(store: Arc<dyn SnapshotStore>, clock: Arc<dyn Clock>, interval: TimeDelta) -> Self {
        Self {
            store,
            clock,
            interval,
            last_snapshot_at: Mutex::new(None),
        }
    }

    /// Persists a snapshot of `result` if the interval has elapsed.
    ///
    /// Returns `true` when a snapshot was written. The slot is claimed
    /// under the lock before the write, so concurrent callers cannot all
    /// pass the gate. A failed write is logged and reopens the gate.
    pub async fn maybe_snapshot(&self, result: &AnalysisResult) -> bool {
        let now = self.clock.now();
        let previous = {
            let mut last = self.last_snapshot_at.lock().await;
            if let Some(prev) = *last
                && now - prev <= self.interval
            {
                return false;
            }
            last.replace(now)
        };

        let snapshot = Snapshot::capture(result, now);
        if let Err(e) = self.store.insert(&snapshot).await {
            tracing::warn!(error = %e, "failed to write analysis snapshot");
            let mut last = self.last_snapshot_at.lock().await;
            if *last == Some(now) {
                *last = previous;
            }
            return false;
        }

        tracing::info!(status = %result.status, issues = result.issues.len(), "analysis snapshot saved");
        true
    }
}
