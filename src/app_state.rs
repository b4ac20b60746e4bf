//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::{ReportService, SensorService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Ingestion, queries and analysis.
    pub sensor_service: Arc<SensorService>,
    /// Daily and monthly reports.
    pub report_service: Arc<ReportService>,
}
