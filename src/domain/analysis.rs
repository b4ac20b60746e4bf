//! Analysis result and the snapshot derived from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::quality::{Assessment, QualityStatus};
use super::{MetricKind, PerMetric};

/// Fresh water-quality analysis. Never stored directly; see [`Snapshot`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// Overall verdict.
    pub status: QualityStatus,
    /// Dashboard color.
    pub color: &'static str,
    /// Fixed human-readable message for the status.
    pub message: &'static str,
    /// Human-readable issue lines, in rule order.
    pub issues: Vec<String>,
    /// Latest value per metric, `None` when the metric has no reading.
    pub values: PerMetric<Option<f64>>,
}

impl AnalysisResult {
    /// Builds a result from the rule assessment and the inputs it used.
    #[must_use]
    pub fn new(assessment: &Assessment, values: PerMetric<Option<f64>>) -> Self {
        let status = assessment.status;
        Self {
            status,
            color: status.color(),
            message: status.message(),
            issues: assessment.issues.iter().map(ToString::to_string).collect(),
            values,
        }
    }
}

/// Persisted point-in-time record of an analysis, used by reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// When the snapshot was taken.
    pub timestamp: DateTime<Utc>,
    /// Status string (`"Good"`, `"Warning"`, `"Critical"`, `"No Data"`).
    pub status: String,
    /// Issue lines at the time of the snapshot.
    pub issues: Vec<String>,
    /// pH value, if any.
    pub ph: Option<f64>,
    /// Turbidity in NTU, if any.
    pub turbidity: Option<f64>,
    /// Ammonia in mg/L, if any.
    pub nh3: Option<f64>,
    /// Temperature in °C, if any.
    pub temperature: Option<f64>,
    /// TDS in ppm, if any.
    pub tds: Option<f64>,
}

impl Snapshot {
    /// Captures `result` at `timestamp`.
    #[must_use]
    pub fn capture(result: &AnalysisResult, timestamp: DateTime<Utc>) -> Self {
        let v = &result.values;
        Self {
            timestamp,
            status: result.status.as_str().to_string(),
            issues: result.issues.clone(),
            ph: *v.get(MetricKind::Ph),
            turbidity: *v.get(MetricKind::Turbidity),
            nh3: *v.get(MetricKind::Ammonia),
            temperature: *v.get(MetricKind::Temperature),
            tds: *v.get(MetricKind::Tds),
        }
    }

    /// Value of `kind` recorded in this snapshot.
    #[must_use]
    pub const fn value(&self, kind: MetricKind) -> Option<f64> {
        match kind {
            MetricKind::Ph => self.ph,
            MetricKind::Turbidity => self.turbidity,
            MetricKind::Ammonia => self.nh3,
            MetricKind::Temperature => self.temperature,
            MetricKind::Tds => self.tds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quality::assess;

    #[test]
    fn snapshot_keeps_absent_metrics_absent() {
        let mut values = PerMetric::default();
        *values.get_mut(MetricKind::Ammonia) = Some(0.6);
        let result = AnalysisResult::new(&assess(&values), values);

        let snap = Snapshot::capture(&result, Utc::now());
        assert_eq!(snap.status, "Critical");
        assert_eq!(snap.nh3, Some(0.6));
        assert_eq!(snap.ph, None);
        assert_eq!(snap.tds, None);
        assert_eq!(snap.issues.len(), 1);
    }

    #[test]
    fn result_carries_status_presentation() {
        let result = AnalysisResult::new(&assess(&PerMetric::default()), PerMetric::default());
        assert_eq!(result.color, "gray");
        assert_eq!(result.message, QualityStatus::NoData.message());
    }
}
