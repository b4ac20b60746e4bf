//! Sensor service: ingestion, queries, and analysis behind one facade.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::domain::{AnalysisResult, Clock, MetricKind, Reading};
use crate::error::GatewayError;
use crate::notify::PushNotifier;
use crate::persistence::{MeasurementStore, SnapshotStore};

use super::alert::AlertNotifier;
use super::analyzer::QualityAnalyzer;
use super::recorder::{DeadbandRecorder, RecordOutcome};
use super::snapshot_logger::SnapshotLogger;

/// Entry point for everything the sensor endpoints need.
///
/// Constructed once at startup; all mutable engine state (recorder memory,
/// alert cooldown, snapshot gate) lives inside and is shared through the
/// `Arc` in [`crate::app_state::AppState`].
#[derive(Debug)]
pub struct SensorService {
    store: Arc<dyn MeasurementStore>,
    recorder: DeadbandRecorder,
    analyzer: QualityAnalyzer,
}

impl SensorService {
    /// Creates a service from pre-built components.
    #[must_use]
    pub fn new(
        store: Arc<dyn MeasurementStore>,
        recorder: DeadbandRecorder,
        analyzer: QualityAnalyzer,
    ) -> Self {
        Self {
            store,
            recorder,
            analyzer,
        }
    }

    /// Wires the recorder, analyzer, alerting and snapshotting from `config`.
    #[must_use]
    pub fn from_config(
        config: &GatewayConfig,
        clock: Arc<dyn Clock>,
        store: Arc<dyn MeasurementStore>,
        snapshots: Arc<dyn SnapshotStore>,
        notifier: Arc<dyn PushNotifier>,
    ) -> Self {
        let recorder = DeadbandRecorder::with_heartbeat(
            Arc::clone(&store),
            Arc::clone(&clock),
            config.heartbeat_interval,
        );
        let alerts = AlertNotifier::new(
            notifier,
            config.line_target_id.clone().unwrap_or_default(),
            Arc::clone(&clock),
        )
        .with_cooldown(config.alert_cooldown)
        .with_timeout(config.notify_timeout);
        let snapshot_logger = SnapshotLogger::new(snapshots, clock, config.snapshot_interval);
        let analyzer = QualityAnalyzer::new(Arc::clone(&store), alerts, snapshot_logger);

        Self::new(store, recorder, analyzer)
    }

    /// Returns the underlying measurement store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn MeasurementStore> {
        &self.store
    }

    /// Validates and records a reading through the deadband filter.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for an empty device id or a
    /// non-finite value, and [`GatewayError::Persistence`] if the store
    /// rejects the write.
    pub async fn record(
        &self,
        kind: MetricKind,
        device_id: &str,
        value: f64,
    ) -> Result<RecordOutcome, GatewayError> {
        if device_id.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "device_id must not be empty".to_string(),
            ));
        }
        if !value.is_finite() {
            return Err(GatewayError::InvalidRequest(format!(
                "{} must be a finite number",
                kind.field_name()
            )));
        }
        self.recorder.record_if_needed(kind, device_id, value).await
    }

    /// Returns the newest reading of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ReadingNotFound`] if there is none, or
    /// [`GatewayError::Persistence`] on store failure.
    pub async fn latest(&self, kind: MetricKind) -> Result<Reading, GatewayError> {
        self.store
            .latest(kind)
            .await?
            .ok_or(GatewayError::ReadingNotFound(kind))
    }

    /// Returns up to `limit` readings of `kind`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Persistence`] on store failure.
    pub async fn history(&self, kind: MetricKind, limit: usize) -> Result<Vec<Reading>, GatewayError> {
        Ok(self.store.history(kind, limit).await?)
    }

    /// Runs a water-quality analysis.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Persistence`] if the latest readings cannot be
    /// read.
    pub async fn analyze(&self) -> Result<AnalysisResult, GatewayError> {
        self.analyzer.analyze().await
    }
}
