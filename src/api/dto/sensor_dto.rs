//! Sensor DTOs: per-metric ingestion bodies, readings, and analysis.
//!
//! Devices in the field publish legacy field names (`NTU`, `NH3`). They are
//! accepted here and never leave the API layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{AnalysisResult, MetricKind, PerMetric, QualityStatus, Reading};

/// Default number of readings returned by the history endpoint.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Upper bound on the history page size.
pub const MAX_HISTORY_LIMIT: usize = 500;

/// Request body for `POST /sensors/add/ph`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PhReadingRequest {
    /// Publishing device.
    pub device_id: String,
    /// pH value.
    pub ph: f64,
}

/// Request body for `POST /sensors/add/turbidity`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TurbidityReadingRequest {
    /// Publishing device.
    pub device_id: String,
    /// Turbidity in NTU.
    #[serde(rename = "NTU", alias = "turbidity")]
    pub ntu: f64,
}

/// Request body for `POST /sensors/add/nh3`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AmmoniaReadingRequest {
    /// Publishing device.
    pub device_id: String,
    /// Ammonia in mg/L.
    #[serde(rename = "NH3", alias = "nh3")]
    pub nh3: f64,
}

/// Request body for `POST /sensors/add/temperature`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TemperatureReadingRequest {
    /// Publishing device.
    pub device_id: String,
    /// Water temperature in °C.
    pub temperature: f64,
}

/// Request body for `POST /sensors/add/tds`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TdsReadingRequest {
    /// Publishing device.
    pub device_id: String,
    /// Total dissolved solids in ppm.
    pub tds: f64,
}

/// Response body for every ingestion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IngestResponse {
    /// Always `"success"`; failures use the error body.
    pub status: String,
    /// Metric the value was recorded for.
    #[serde(rename = "type")]
    pub kind: MetricKind,
    /// Value as received.
    pub value: f64,
    /// `false` when the deadband filter skipped the reading.
    pub saved: bool,
}

/// One stored reading.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReadingResponse {
    /// Publishing device.
    pub device_id: String,
    /// Measured value.
    pub value: f64,
    /// Time the reading was accepted.
    pub timestamp: DateTime<Utc>,
}

impl From<Reading> for ReadingResponse {
    fn from(reading: Reading) -> Self {
        Self {
            device_id: reading.device_id,
            value: reading.value,
            timestamp: reading.timestamp,
        }
    }
}

/// Query parameters for `GET /sensors/history/{kind}`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryParams {
    /// Maximum readings to return (1..=500). Defaults to 20.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl HistoryParams {
    /// Limit clamped to the allowed range.
    #[must_use]
    pub fn clamped_limit(&self) -> usize {
        self.limit.clamp(1, MAX_HISTORY_LIMIT)
    }
}

/// Latest value per metric; `null` when a metric has no reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MetricValues {
    /// pH.
    pub ph: Option<f64>,
    /// Turbidity, NTU.
    pub turbidity: Option<f64>,
    /// Ammonia, mg/L.
    pub nh3: Option<f64>,
    /// Temperature, °C.
    pub temperature: Option<f64>,
    /// Total dissolved solids, ppm.
    pub tds: Option<f64>,
}

impl From<&PerMetric<Option<f64>>> for MetricValues {
    fn from(values: &PerMetric<Option<f64>>) -> Self {
        Self {
            ph: *values.get(MetricKind::Ph),
            turbidity: *values.get(MetricKind::Turbidity),
            nh3: *values.get(MetricKind::Ammonia),
            temperature: *values.get(MetricKind::Temperature),
            tds: *values.get(MetricKind::Tds),
        }
    }
}

/// Response body for `GET /sensors/status/analysis`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResponse {
    /// Overall verdict.
    pub status: QualityStatus,
    /// Dashboard color: `green`, `orange`, `red` or `gray`.
    pub color: String,
    /// Fixed message for the status.
    pub message: String,
    /// One line per rule violation.
    pub issues: Vec<String>,
    /// Inputs of the analysis.
    pub values: MetricValues,
}

impl From<AnalysisResult> for AnalysisResponse {
    fn from(result: AnalysisResult) -> Self {
        Self {
            status: result.status,
            color: result.color.to_string(),
            message: result.message.to_string(),
            values: MetricValues::from(&result.values),
            issues: result.issues,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn turbidity_accepts_legacy_and_plain_names() {
        let Ok(legacy) =
            serde_json::from_str::<TurbidityReadingRequest>(r#"{"device_id":"d","NTU":12.5}"#)
        else {
            panic!("NTU body rejected");
        };
        assert!((legacy.ntu - 12.5).abs() < f64::EPSILON);

        let Ok(plain) =
            serde_json::from_str::<TurbidityReadingRequest>(r#"{"device_id":"d","turbidity":3.0}"#)
        else {
            panic!("turbidity body rejected");
        };
        assert!((plain.ntu - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ammonia_requires_a_value() {
        assert!(serde_json::from_str::<AmmoniaReadingRequest>(r#"{"device_id":"d"}"#).is_err());
        assert!(
            serde_json::from_str::<AmmoniaReadingRequest>(r#"{"device_id":"d","NH3":0.1}"#)
                .is_ok()
        );
    }

    #[test]
    fn history_limit_is_clamped() {
        let params = |limit| HistoryParams { limit };
        assert_eq!(params(0).clamped_limit(), 1);
        assert_eq!(params(20).clamped_limit(), 20);
        assert_eq!(params(10_000).clamped_limit(), MAX_HISTORY_LIMIT);
    }

    #[test]
    fn ingest_response_uses_type_key() {
        let body = IngestResponse {
            status: "success".to_string(),
            kind: MetricKind::Ammonia,
            value: 0.1,
            saved: true,
        };
        let Ok(json) = serde_json::to_value(&body) else {
            panic!("serialize failed");
        };
        assert_eq!(json["type"], "nh3");
        assert_eq!(json["saved"], true);
    }
}
