//! Background purge of expired readings.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::persistence::MeasurementStore;

/// Runs one purge pass, logging the outcome.
///
/// Returns the number of deleted readings, or `0` when the store failed.
pub async fn purge_once(store: &dyn MeasurementStore) -> u64 {
    match store.purge_expired().await {
        Ok(0) => 0,
        Ok(removed) => {
            tracing::info!(removed, "purged expired readings");
            removed
        }
        Err(e) => {
            tracing::warn!(error = %e, "retention purge failed");
            0
        }
    }
}

/// Spawns a task that purges expired readings every `interval_secs`.
///
/// Queries already hide expired readings; the purge only reclaims space.
/// An interval of `0` is treated as one second.
pub fn spawn_purge_task(store: Arc<dyn MeasurementStore>, interval_secs: u64) -> JoinHandle<()> {
    let period = Duration::from_secs(interval_secs.max(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            purge_once(store.as_ref()).await;
        }
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Clock, ManualClock, MetricKind, Reading};
    use crate::persistence::MemoryStore;
    use chrono::{DateTime, TimeDelta, Utc};
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn purge_removes_only_expired_readings() {
        let Some(start) = DateTime::<Utc>::from_timestamp(1_700_000_000, 0) else {
            panic!("valid timestamp");
        };
        let clock = Arc::new(ManualClock::new(start));
        let store = MemoryStore::new(Arc::clone(&clock) as Arc<dyn Clock>);

        assert_ok!(
            store
                .append(MetricKind::Ph, &Reading::new("dev", 7.0, clock.now()))
                .await
        );
        clock.advance(TimeDelta::days(8));
        assert_ok!(
            store
                .append(MetricKind::Ph, &Reading::new("dev", 7.2, clock.now()))
                .await
        );

        assert_eq!(purge_once(&store).await, 1);
        assert_eq!(store.stored_len(MetricKind::Ph).await, 1);
        assert_eq!(purge_once(&store).await, 0);
    }
}
