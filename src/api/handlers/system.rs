//! System endpoints: health check and metric catalog.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::MetricKind;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health`: Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Supported metric info.
#[derive(Debug, Serialize, ToSchema)]
pub struct MetricInfo {
    metric: MetricKind,
    field: &'static str,
    unit: &'static str,
    deadband: f64,
}

/// `GET /config/metrics`: List supported metrics.
#[utoipa::path(
    get,
    path = "/config/metrics",
    tag = "System",
    summary = "List supported metrics",
    description = "Returns every metric with its ingestion field, unit and deadband threshold.",
    responses(
        (status = 200, description = "Metric catalog", body = Vec<MetricInfo>),
    )
)]
pub async fn metrics_handler() -> impl IntoResponse {
    let metrics: Vec<MetricInfo> = MetricKind::ALL
        .into_iter()
        .map(|kind| MetricInfo {
            metric: kind,
            field: kind.field_name(),
            unit: kind.unit(),
            deadband: kind.deadband(),
        })
        .collect();
    (StatusCode::OK, Json(metrics))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/metrics", get(metrics_handler))
}
