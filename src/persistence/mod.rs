//! Persistence layer: sensor readings and analysis snapshots.
//!
//! Two storage seams are defined as traits so the service layer never
//! names a backend:
//!
//! - [`MeasurementStore`]: append-only readings per metric with retention.
//! - [`SnapshotStore`]: analysis snapshots queried by time range.
//!
//! [`PostgresStore`] implements both on `sqlx::PgPool`; [`MemoryStore`]
//! implements both in process and backs tests and database-less runs.

pub mod memory;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::{MetricKind, Reading, Snapshot};

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Default lifetime of a stored reading.
pub const DEFAULT_RETENTION: TimeDelta = TimeDelta::days(7);

/// Storage failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database driver error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Backend is not reachable or refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Append-only per-metric reading storage.
///
/// Readings whose timestamp is at or before `now - retention` are never
/// returned, whether or not they have been purged yet.
#[async_trait]
pub trait MeasurementStore: Send + Sync + fmt::Debug {
    /// Appends a reading for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write is not confirmed.
    async fn append(&self, kind: MetricKind, reading: &Reading) -> Result<(), StoreError>;

    /// Returns the newest live reading for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failure.
    async fn latest(&self, kind: MetricKind) -> Result<Option<Reading>, StoreError>;

    /// Returns up to `limit` live readings for `kind`, newest first. Equal
    /// timestamps are ordered by insertion, newest insertion first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failure.
    async fn history(&self, kind: MetricKind, limit: usize) -> Result<Vec<Reading>, StoreError>;

    /// Deletes expired readings of every kind, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failure.
    async fn purge_expired(&self) -> Result<u64, StoreError>;
}

/// Storage for analysis snapshots.
#[async_trait]
pub trait SnapshotStore: Send + Sync + fmt::Debug {
    /// Persists a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write is not confirmed.
    async fn insert(&self, snapshot: &Snapshot) -> Result<(), StoreError>;

    /// Returns snapshots with `start <= timestamp <= end`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failure.
    async fn in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Snapshot>, StoreError>;
}
