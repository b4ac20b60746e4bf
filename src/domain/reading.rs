//! Stored sensor reading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single persisted measurement of one metric.
///
/// Readings are immutable once stored. The value is always finite; the
/// ingestion boundary rejects anything else before a `Reading` is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Identifier of the publishing device.
    pub device_id: String,
    /// Measured value in the metric's unit.
    pub value: f64,
    /// Server-side time the reading was accepted.
    pub timestamp: DateTime<Utc>,
}

impl Reading {
    /// Creates a reading stamped at `timestamp`.
    #[must_use]
    pub fn new(device_id: impl Into<String>, value: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            device_id: device_id.into(),
            value,
            timestamp,
        }
    }
}
