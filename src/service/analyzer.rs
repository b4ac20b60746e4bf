//! Water-quality analyzer: latest values → rules → alert + snapshot.

use std::sync::Arc;

use crate::domain::quality::{self, QualityStatus};
use crate::domain::{AnalysisResult, MetricKind, PerMetric};
use crate::error::GatewayError;
use crate::persistence::MeasurementStore;

use super::alert::AlertNotifier;
use super::snapshot_logger::SnapshotLogger;

/// Computes the current water-quality verdict.
///
/// Every call reads the newest reading of each metric, applies the rules,
/// alerts on a critical verdict (subject to cooldown) and offers the
/// result to the snapshot logger (subject to its interval).
#[derive(Debug)]
pub struct QualityAnalyzer {
    store: Arc<dyn MeasurementStore>,
    alerts: AlertNotifier,
    snapshots: SnapshotLogger,
}

impl QualityAnalyzer {
    /// Creates an analyzer over `store`.
    #[must_use]
    pub fn new(
        store: Arc<dyn MeasurementStore>,
        alerts: AlertNotifier,
        snapshots: SnapshotLogger,
    ) -> Self {
        Self {
            store,
            alerts,
            snapshots,
        }
    }

    /// Runs one analysis.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Persistence`] if the latest readings cannot be
    /// read. Alert and snapshot failures never surface here.
    pub async fn analyze(&self) -> Result<AnalysisResult, GatewayError> {
        let mut values = PerMetric::default();
        for kind in MetricKind::ALL {
            *values.get_mut(kind) = self.store.latest(kind).await?.map(|r| r.value);
        }

        let assessment = quality::assess(&values);
        let result = AnalysisResult::new(&assessment, values);

        if result.status == QualityStatus::Critical {
            self.alerts.maybe_alert(result.message, &result.issues).await;
        }
        self.snapshots.maybe_snapshot(&result).await;

        tracing::debug!(status = %result.status, issues = result.issues.len(), "water quality analyzed");
        Ok(result)
    }
}
