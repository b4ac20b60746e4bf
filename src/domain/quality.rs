//! Water-quality rules and status classification.
//!
//! [`assess`] is pure: given the latest value of each metric it returns the
//! overall [`QualityStatus`] and the list of [`Issue`]s that produced it.
//! Side effects (alerts, snapshots) belong to the service layer.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{MetricKind, PerMetric};

/// pH below this is too acidic.
pub const PH_MIN: f64 = 6.5;
/// pH above this is too alkaline.
pub const PH_MAX: f64 = 8.5;
/// Ammonia above this needs attention.
pub const NH3_ELEVATED: f64 = 0.02;
/// Ammonia above this is toxic.
pub const NH3_DANGER: f64 = 0.5;
/// Minimum healthy water temperature (°C).
pub const TEMP_MIN: f64 = 20.0;
/// Maximum healthy water temperature (°C).
pub const TEMP_MAX: f64 = 32.0;
/// Maximum acceptable turbidity (NTU).
pub const TURBIDITY_MAX: f64 = 125.0;
/// Maximum acceptable total dissolved solids (ppm).
pub const TDS_MAX: f64 = 700.0;

/// Overall water-quality verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum QualityStatus {
    /// All present metrics are within bounds.
    Good,
    /// Only non-critical deviations.
    Warning,
    /// At least one critical deviation.
    Critical,
    /// No metric has any reading.
    #[serde(rename = "No Data")]
    NoData,
}

impl QualityStatus {
    /// Dashboard color for this status.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Good => "green",
            Self::Warning => "orange",
            Self::Critical => "red",
            Self::NoData => "gray",
        }
    }

    /// Fixed human-readable message for this status.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Good => "Water quality is good",
            Self::Warning => "Water quality needs attention",
            Self::Critical => "Water quality is critical, act now",
            Self::NoData => "Waiting for sensor data",
        }
    }

    /// Stored form of the status, as written to snapshots.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Warning => "Warning",
            Self::Critical => "Critical",
            Self::NoData => "No Data",
        }
    }
}

impl fmt::Display for QualityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a metric deviates from its healthy range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Below the lower bound.
    Low,
    /// Above the upper bound.
    High,
    /// Above the attention tier but below the danger tier.
    Elevated,
    /// Above the danger tier.
    Dangerous,
}

impl Severity {
    /// Whether this deviation makes the overall status critical.
    #[must_use]
    pub const fn is_critical(self) -> bool {
        !matches!(self, Self::Elevated)
    }
}

/// A single rule violation with the offending value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Issue {
    /// Metric that violated its rule.
    pub metric: MetricKind,
    /// Kind of violation.
    pub severity: Severity,
    /// Value that triggered it.
    pub value: f64,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.value;
        match (self.metric, self.severity) {
            (MetricKind::Ph, Severity::Low) => write!(f, "pH too low, water is acidic ({v:.2})"),
            (MetricKind::Ph, _) => write!(f, "pH too high, water is alkaline ({v:.2})"),
            (MetricKind::Ammonia, Severity::Dangerous) => {
                write!(f, "Ammonia dangerous, toxic level ({v:.3} mg/L)")
            }
            (MetricKind::Ammonia, _) => write!(f, "Ammonia elevated ({v:.3} mg/L)"),
            (MetricKind::Temperature, Severity::Low) => {
                write!(f, "Temperature too low ({v:.1} °C)")
            }
            (MetricKind::Temperature, _) => write!(f, "Temperature too high ({v:.1} °C)"),
            (MetricKind::Turbidity, _) => write!(f, "Turbidity high, water is murky ({v:.1} NTU)"),
            (MetricKind::Tds, _) => write!(f, "TDS high ({v:.0} ppm)"),
        }
    }
}

/// Result of applying every rule to the latest values.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    /// Overall verdict.
    pub status: QualityStatus,
    /// Violations in rule order.
    pub issues: Vec<Issue>,
}

/// Evaluates the water-quality rules.
///
/// Absent metrics have no opinion. When every metric is absent the status
/// is [`QualityStatus::NoData`].
#[must_use]
pub fn assess(values: &PerMetric<Option<f64>>) -> Assessment {
    if values.iter().all(|(_, v)| v.is_none()) {
        return Assessment {
            status: QualityStatus::NoData,
            issues: Vec::new(),
        };
    }

    let issues: Vec<Issue> = MetricKind::ALL
        .into_iter()
        .filter_map(|metric| {
            let value = (*values.get(metric))?;
            check(metric, value).map(|severity| Issue {
                metric,
                severity,
                value,
            })
        })
        .collect();

    let status = if issues.is_empty() {
        QualityStatus::Good
    } else if issues.iter().any(|i| i.severity.is_critical()) {
        QualityStatus::Critical
    } else {
        QualityStatus::Warning
    };

    Assessment { status, issues }
}

/// Per-metric bounds.
fn check(metric: MetricKind, v: f64) -> Option<Severity> {
    match metric {
        MetricKind::Ph if v < PH_MIN => Some(Severity::Low),
        MetricKind::Ph if v > PH_MAX => Some(Severity::High),
        MetricKind::Ammonia if v > NH3_DANGER => Some(Severity::Dangerous),
        MetricKind::Ammonia if v > NH3_ELEVATED => Some(Severity::Elevated),
        MetricKind::Temperature if v < TEMP_MIN => Some(Severity::Low),
        MetricKind::Temperature if v > TEMP_MAX => Some(Severity::High),
        MetricKind::Turbidity if v > TURBIDITY_MAX => Some(Severity::High),
        MetricKind::Tds if v > TDS_MAX => Some(Severity::High),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nominal() -> PerMetric<Option<f64>> {
        let mut v = PerMetric::default();
        *v.get_mut(MetricKind::Ph) = Some(7.0);
        *v.get_mut(MetricKind::Ammonia) = Some(0.01);
        *v.get_mut(MetricKind::Temperature) = Some(25.0);
        *v.get_mut(MetricKind::Turbidity) = Some(10.0);
        *v.get_mut(MetricKind::Tds) = Some(100.0);
        v
    }

    #[test]
    fn no_values_is_no_data() {
        let a = assess(&PerMetric::default());
        assert_eq!(a.status, QualityStatus::NoData);
        assert!(a.issues.is_empty());
        assert_eq!(a.status.color(), "gray");
    }

    #[test]
    fn nominal_values_are_good() {
        let a = assess(&nominal());
        assert_eq!(a.status, QualityStatus::Good);
        assert!(a.issues.is_empty());
    }

    #[test]
    fn dangerous_ammonia_is_critical() {
        let mut v = nominal();
        *v.get_mut(MetricKind::Ammonia) = Some(0.6);
        let a = assess(&v);
        assert_eq!(a.status, QualityStatus::Critical);
        assert_eq!(a.issues.len(), 1);
        assert!(a.issues.iter().any(|i| i.to_string().contains("dangerous")));
        assert!(a.issues.iter().any(|i| i.to_string().contains("0.600")));
    }

    #[test]
    fn elevated_ammonia_is_only_a_warning() {
        let mut v = nominal();
        *v.get_mut(MetricKind::Ammonia) = Some(0.03);
        let a = assess(&v);
        assert_eq!(a.status, QualityStatus::Warning);
        assert_eq!(a.status.color(), "orange");
    }

    #[test]
    fn warning_plus_critical_is_critical() {
        let mut v = nominal();
        *v.get_mut(MetricKind::Ammonia) = Some(0.03);
        *v.get_mut(MetricKind::Ph) = Some(9.1);
        let a = assess(&v);
        assert_eq!(a.status, QualityStatus::Critical);
        assert_eq!(a.issues.len(), 2);
    }

    #[test]
    fn each_bound_produces_one_issue() {
        let cases = [
            (MetricKind::Ph, 6.0, Severity::Low),
            (MetricKind::Ph, 9.0, Severity::High),
            (MetricKind::Temperature, 18.0, Severity::Low),
            (MetricKind::Temperature, 34.0, Severity::High),
            (MetricKind::Turbidity, 130.0, Severity::High),
            (MetricKind::Tds, 800.0, Severity::High),
        ];
        for (metric, value, severity) in cases {
            let mut v = nominal();
            *v.get_mut(metric) = Some(value);
            let a = assess(&v);
            assert_eq!(a.issues, vec![Issue { metric, severity, value }]);
            assert_eq!(a.status, QualityStatus::Critical);
        }
    }

    #[test]
    fn bounds_are_exclusive() {
        let mut v = nominal();
        *v.get_mut(MetricKind::Ph) = Some(PH_MIN);
        *v.get_mut(MetricKind::Temperature) = Some(TEMP_MAX);
        *v.get_mut(MetricKind::Tds) = Some(TDS_MAX);
        assert_eq!(assess(&v).status, QualityStatus::Good);
    }

    #[test]
    fn missing_metrics_have_no_opinion() {
        let mut v = PerMetric::default();
        *v.get_mut(MetricKind::Temperature) = Some(26.0);
        let a = assess(&v);
        assert_eq!(a.status, QualityStatus::Good);
    }

    #[test]
    fn status_serializes_with_display_names() {
        let json = serde_json::to_string(&QualityStatus::NoData).unwrap_or_default();
        assert_eq!(json, "\"No Data\"");
        assert_eq!(QualityStatus::Critical.to_string(), "Critical");
    }
}
