//! In-process store for readings and snapshots.
//!
//! Used when `PERSISTENCE_ENABLED` is off and throughout the tests. It
//! honors the same ordering and retention contract as the PostgreSQL
//! backend, reading the current time from the injected [`Clock`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::RwLock;

use super::{DEFAULT_RETENTION, MeasurementStore, SnapshotStore, StoreError};
use crate::domain::{Clock, MetricKind, PerMetric, Reading, Snapshot};

/// Memory-backed [`MeasurementStore`] and [`SnapshotStore`].
///
/// Each metric kind has its own insertion-ordered vector behind a
/// [`tokio::sync::RwLock`], so writes to different kinds never contend.
#[derive(Debug)]
pub struct MemoryStore {
    readings: PerMetric<RwLock<Vec<Reading>>>,
    snapshots: RwLock<Vec<Snapshot>>,
    clock: Arc<dyn Clock>,
    retention: TimeDelta,
}

impl MemoryStore {
    /// Creates an empty store with the default 7-day retention.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_retention(clock, DEFAULT_RETENTION)
    }

    /// Creates an empty store with a custom retention window.
    #[must_use]
    pub fn with_retention(clock: Arc<dyn Clock>, retention: TimeDelta) -> Self {
        Self {
            readings: PerMetric::default(),
            snapshots: RwLock::new(Vec::new()),
            clock,
            retention,
        }
    }

    /// Readings at or before this instant are expired.
    fn cutoff(&self) -> DateTime<Utc> {
        self.clock.now() - self.retention
    }

    /// Number of stored readings for `kind`, expired ones included.
    pub async fn stored_len(&self, kind: MetricKind) -> usize {
        self.readings.get(kind).read().await.len()
    }
}

#[async_trait]
impl MeasurementStore for MemoryStore {
    async fn append(&self, kind: MetricKind, reading: &Reading) -> Result<(), StoreError> {
        self.readings.get(kind).write().await.push(reading.clone());
        Ok(())
    }

    async fn latest(&self, kind: MetricKind) -> Result<Option<Reading>, StoreError> {
        Ok(self.history(kind, 1).await?.into_iter().next())
    }

    async fn history(&self, kind: MetricKind, limit: usize) -> Result<Vec<Reading>, StoreError> {
        let cutoff = self.cutoff();
        let rows = self.readings.get(kind).read().await;

        // Walk newest insertion first; the stable sort then keeps that
        // order among equal timestamps.
        let mut live: Vec<&Reading> = rows.iter().rev().filter(|r| r.timestamp > cutoff).collect();
        live.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Ok(live.into_iter().take(limit).cloned().collect())
    }

    async fn purge_expired(&self) -> Result<u64, StoreError> {
        let cutoff = self.cutoff();
        let mut removed = 0u64;
        for (_, slot) in self.readings.iter() {
            let mut rows = slot.write().await;
            let before = rows.len();
            rows.retain(|r| r.timestamp > cutoff);
            removed = removed.saturating_add((before - rows.len()) as u64);
        }
        Ok(removed)
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn insert(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        self.snapshots.write().await.push(snapshot.clone());
        Ok(())
    }

    async fn in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Snapshot>, StoreError> {
        let rows = self.snapshots.read().await;
        let mut found: Vec<Snapshot> = rows
            .iter()
            .filter(|s| s.timestamp >= start && s.timestamp <= end)
            .cloned()
            .collect();
        found.sort_by_key(|s| s.timestamp);
        Ok(found)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::ManualClock;
    use tokio_test::assert_ok;

    fn start() -> DateTime<Utc> {
        let Some(t) = DateTime::from_timestamp(1_700_000_000, 0) else {
            panic!("valid timestamp");
        };
        t
    }

    fn setup() -> (Arc<ManualClock>, MemoryStore) {
        let clock = Arc::new(ManualClock::new(start()));
        let store = MemoryStore::new(Arc::clone(&clock) as Arc<dyn Clock>);
        (clock, store)
    }

    #[tokio::test]
    async fn latest_is_none_when_empty() {
        let (_, store) = setup();
        let Ok(latest) = store.latest(MetricKind::Ph).await else {
            panic!("latest failed");
        };
        assert!(latest.is_none());
    }

    #[tokio::test]
    async fn history_is_newest_first_and_limited() {
        let (clock, store) = setup();
        for i in 0..10 {
            let r = Reading::new("dev-1", f64::from(i), clock.now());
            assert_ok!(store.append(MetricKind::Tds, &r).await);
            clock.advance(TimeDelta::seconds(1));
        }

        let Ok(history) = store.history(MetricKind::Tds, 3).await else {
            panic!("history failed");
        };
        let values: Vec<f64> = history.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![9.0, 8.0, 7.0]);
    }

    #[tokio::test]
    async fn equal_timestamps_prefer_latest_insertion() {
        let (clock, store) = setup();
        let now = clock.now();
        assert_ok!(store.append(MetricKind::Ph, &Reading::new("a", 7.0, now)).await);
        assert_ok!(store.append(MetricKind::Ph, &Reading::new("b", 7.5, now)).await);

        let Ok(Some(latest)) = store.latest(MetricKind::Ph).await else {
            panic!("expected a reading");
        };
        assert_eq!(latest.device_id, "b");
    }

    #[tokio::test]
    async fn kinds_are_isolated() {
        let (clock, store) = setup();
        assert_ok!(
            store
                .append(MetricKind::Ph, &Reading::new("a", 7.0, clock.now()))
                .await
        );
        let Ok(other) = store.latest(MetricKind::Tds).await else {
            panic!("latest failed");
        };
        assert!(other.is_none());
    }

    #[tokio::test]
    async fn expired_readings_are_hidden_then_purged() {
        let (clock, store) = setup();
        assert_ok!(
            store
                .append(MetricKind::Ammonia, &Reading::new("a", 0.01, clock.now()))
                .await
        );

        clock.advance(DEFAULT_RETENTION + TimeDelta::seconds(1));
        let Ok(latest) = store.latest(MetricKind::Ammonia).await else {
            panic!("latest failed");
        };
        assert!(latest.is_none());
        assert_eq!(store.stored_len(MetricKind::Ammonia).await, 1);

        let Ok(removed) = store.purge_expired().await else {
            panic!("purge failed");
        };
        assert_eq!(removed, 1);
        assert_eq!(store.stored_len(MetricKind::Ammonia).await, 0);
    }

    #[tokio::test]
    async fn snapshots_filtered_by_range() {
        let (clock, store) = setup();
        let base = clock.now();
        for hours in [0, 1, 2, 3] {
            let snap = Snapshot {
                timestamp: base + TimeDelta::hours(hours),
                status: "Good".to_string(),
                issues: Vec::new(),
                ph: Some(7.0),
                turbidity: None,
                nh3: None,
                temperature: None,
                tds: None,
            };
            assert_ok!(store.insert(&snap).await);
        }

        let Ok(found) = store
            .in_range(base + TimeDelta::hours(1), base + TimeDelta::hours(2))
            .await
        else {
            panic!("range query failed");
        };
        assert_eq!(found.len(), 2);
        assert!(found.windows(2).all(|w| matches!(w, [a, b] if a.timestamp <= b.timestamp)));
    }
}
