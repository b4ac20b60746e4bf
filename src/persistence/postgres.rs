//! PostgreSQL implementation of the persistence layer.
//!
//! Each metric kind has its own table named by
//! [`MetricKind::collection`]; snapshots live in `water_analysis`. The
//! schema is created by the migrations under `migrations/`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{DEFAULT_RETENTION, MeasurementStore, SnapshotStore, StoreError};
use crate::config::GatewayConfig;
use crate::domain::{Clock, MetricKind, Reading, Snapshot};

/// PostgreSQL-backed persistence layer using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
    clock: Arc<dyn Clock>,
    retention: TimeDelta,
}

impl PostgresStore {
    /// Creates a new persistence layer with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            clock,
            retention: DEFAULT_RETENTION,
        }
    }

    /// Overrides the retention window.
    #[must_use]
    pub fn with_retention(mut self, retention: TimeDelta) -> Self {
        self.retention = retention;
        self
    }

    /// Opens a connection pool from `config` and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database is unreachable or a migration
    /// fails.
    pub async fn connect(config: &GatewayConfig, clock: Arc<dyn Clock>) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("database migrations applied");

        Ok(Self::new(pool, clock).with_retention(config.retention))
    }

    fn cutoff(&self) -> DateTime<Utc> {
        self.clock.now() - self.retention
    }
}

#[async_trait]
impl MeasurementStore for PostgresStore {
    async fn append(&self, kind: MetricKind, reading: &Reading) -> Result<(), StoreError> {
        let sql = format!(
            "INSERT INTO {} (device_id, value, recorded_at) VALUES ($1, $2, $3)",
            kind.collection()
        );
        sqlx::query(&sql)
            .bind(&reading.device_id)
            .bind(reading.value)
            .bind(reading.timestamp)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn latest(&self, kind: MetricKind) -> Result<Option<Reading>, StoreError> {
        Ok(self.history(kind, 1).await?.into_iter().next())
    }

    async fn history(&self, kind: MetricKind, limit: usize) -> Result<Vec<Reading>, StoreError> {
        let sql = format!(
            "SELECT device_id, value, recorded_at FROM {} \
             WHERE recorded_at > $1 ORDER BY recorded_at DESC, id DESC LIMIT $2",
            kind.collection()
        );
        let rows = sqlx::query_as::<_, (String, f64, DateTime<Utc>)>(&sql)
            .bind(self.cutoff())
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(device_id, value, timestamp)| Reading {
                device_id,
                value,
                timestamp,
            })
            .collect())
    }

    async fn purge_expired(&self) -> Result<u64, StoreError> {
        let cutoff = self.cutoff();
        let mut removed = 0u64;
        for kind in MetricKind::ALL {
            let sql = format!("DELETE FROM {} WHERE recorded_at <= $1", kind.collection());
            let result = sqlx::query(&sql).bind(cutoff).execute(&self.pool).await?;
            removed = removed.saturating_add(result.rows_affected());
        }
        Ok(removed)
    }
}

#[async_trait]
impl SnapshotStore for PostgresStore {
    async fn insert(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO water_analysis \
             (snapshot_at, status, issues, ph, turbidity, nh3, temperature, tds) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(snapshot.timestamp)
        .bind(&snapshot.status)
        .bind(snapshot.issues.as_slice())
        .bind(snapshot.ph)
        .bind(snapshot.turbidity)
        .bind(snapshot.nh3)
        .bind(snapshot.temperature)
        .bind(snapshot.tds)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Snapshot>, StoreError> {
        #[allow(clippy::type_complexity)]
        let rows = sqlx::query_as::<
            _,
            (
                DateTime<Utc>,
                String,
                Vec<String>,
                Option<f64>,
                Option<f64>,
                Option<f64>,
                Option<f64>,
                Option<f64>,
            ),
        >(
            "SELECT snapshot_at, status, issues, ph, turbidity, nh3, temperature, tds \
             FROM water_analysis WHERE snapshot_at >= $1 AND snapshot_at <= $2 \
             ORDER BY snapshot_at ASC, id ASC",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(timestamp, status, issues, ph, turbidity, nh3, temperature, tds)| Snapshot {
                    timestamp,
                    status,
                    issues,
                    ph,
                    turbidity,
                    nh3,
                    temperature,
                    tds,
                },
            )
            .collect())
    }
}
