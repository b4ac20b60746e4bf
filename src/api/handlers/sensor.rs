//! Sensor handlers: ingestion, latest/history queries, and analysis.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    AmmoniaReadingRequest, AnalysisResponse, HistoryParams, IngestResponse, PhReadingRequest,
    ReadingResponse, TdsReadingRequest, TemperatureReadingRequest, TurbidityReadingRequest,
};
use crate::app_state::AppState;
use crate::domain::MetricKind;
use crate::error::{ErrorResponse, GatewayError};

/// Shared ingestion path for every metric.
async fn ingest(
    state: &AppState,
    kind: MetricKind,
    device_id: &str,
    value: f64,
) -> Result<Json<IngestResponse>, GatewayError> {
    let outcome = state.sensor_service.record(kind, device_id, value).await?;
    Ok(Json(IngestResponse {
        status: "success".to_string(),
        kind,
        value,
        saved: outcome.persisted,
    }))
}

/// `POST /sensors/add/ph`: Ingest a pH reading.
///
/// # Errors
///
/// Returns [`GatewayError`] on invalid input or store failure.
#[utoipa::path(
    post,
    path = "/api/v1/sensors/add/ph",
    tag = "Sensors",
    summary = "Ingest a pH reading",
    description = "Stores the reading if it moved by at least 0.1 since the last stored value, or if the last one is older than the heartbeat.",
    request_body = PhReadingRequest,
    responses(
        (status = 200, description = "Reading accepted", body = IngestResponse),
        (status = 400, description = "Invalid reading", body = ErrorResponse),
    )
)]
pub async fn add_ph(
    State(state): State<AppState>,
    Json(req): Json<PhReadingRequest>,
) -> Result<Json<IngestResponse>, GatewayError> {
    ingest(&state, MetricKind::Ph, &req.device_id, req.ph).await
}

/// `POST /sensors/add/turbidity`: Ingest a turbidity reading.
///
/// # Errors
///
/// Returns [`GatewayError`] on invalid input or store failure.
#[utoipa::path(
    post,
    path = "/api/v1/sensors/add/turbidity",
    tag = "Sensors",
    summary = "Ingest a turbidity reading",
    description = "Accepts the value as `NTU` or `turbidity`. Deadband 5 NTU.",
    request_body = TurbidityReadingRequest,
    responses(
        (status = 200, description = "Reading accepted", body = IngestResponse),
        (status = 400, description = "Invalid reading", body = ErrorResponse),
    )
)]
pub async fn add_turbidity(
    State(state): State<AppState>,
    Json(req): Json<TurbidityReadingRequest>,
) -> Result<Json<IngestResponse>, GatewayError> {
    ingest(&state, MetricKind::Turbidity, &req.device_id, req.ntu).await
}

/// `POST /sensors/add/nh3`: Ingest an ammonia reading.
///
/// # Errors
///
/// Returns [`GatewayError`] on invalid input or store failure.
#[utoipa::path(
    post,
    path = "/api/v1/sensors/add/nh3",
    tag = "Sensors",
    summary = "Ingest an ammonia reading",
    description = "Accepts the value as `NH3` or `nh3`. Deadband 0.05 mg/L.",
    request_body = AmmoniaReadingRequest,
    responses(
        (status = 200, description = "Reading accepted", body = IngestResponse),
        (status = 400, description = "Invalid reading", body = ErrorResponse),
    )
)]
pub async fn add_nh3(
    State(state): State<AppState>,
    Json(req): Json<AmmoniaReadingRequest>,
) -> Result<Json<IngestResponse>, GatewayError> {
    ingest(&state, MetricKind::Ammonia, &req.device_id, req.nh3).await
}

/// `POST /sensors/add/temperature`: Ingest a temperature reading.
///
/// # Errors
///
/// Returns [`GatewayError`] on invalid input or store failure.
#[utoipa::path(
    post,
    path = "/api/v1/sensors/add/temperature",
    tag = "Sensors",
    summary = "Ingest a temperature reading",
    description = "Deadband 0.5 °C.",
    request_body = TemperatureReadingRequest,
    responses(
        (status = 200, description = "Reading accepted", body = IngestResponse),
        (status = 400, description = "Invalid reading", body = ErrorResponse),
    )
)]
pub async fn add_temperature(
    State(state): State<AppState>,
    Json(req): Json<TemperatureReadingRequest>,
) -> Result<Json<IngestResponse>, GatewayError> {
    ingest(&state, MetricKind::Temperature, &req.device_id, req.temperature).await
}

/// `POST /sensors/add/tds`: Ingest a TDS reading.
///
/// # Errors
///
/// Returns [`GatewayError`] on invalid input or store failure.
#[utoipa::path(
    post,
    path = "/api/v1/sensors/add/tds",
    tag = "Sensors",
    summary = "Ingest a TDS reading",
    description = "Deadband 10 ppm.",
    request_body = TdsReadingRequest,
    responses(
        (status = 200, description = "Reading accepted", body = IngestResponse),
        (status = 400, description = "Invalid reading", body = ErrorResponse),
    )
)]
pub async fn add_tds(
    State(state): State<AppState>,
    Json(req): Json<TdsReadingRequest>,
) -> Result<Json<IngestResponse>, GatewayError> {
    ingest(&state, MetricKind::Tds, &req.device_id, req.tds).await
}

/// `GET /sensors/latest/{kind}`: Newest reading of a metric.
///
/// # Errors
///
/// Returns [`GatewayError`] for an unknown metric or when nothing is stored.
#[utoipa::path(
    get,
    path = "/api/v1/sensors/latest/{kind}",
    tag = "Sensors",
    summary = "Latest reading",
    params(("kind" = String, Path, description = "ph, turbidity, nh3, temperature or tds")),
    responses(
        (status = 200, description = "Newest reading", body = ReadingResponse),
        (status = 400, description = "Unknown metric", body = ErrorResponse),
        (status = 404, description = "No readings", body = ErrorResponse),
    )
)]
pub async fn latest(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<ReadingResponse>, GatewayError> {
    let kind: MetricKind = kind.parse()?;
    let reading = state.sensor_service.latest(kind).await?;
    Ok(Json(reading.into()))
}

/// `GET /sensors/history/{kind}`: Recent readings of a metric.
///
/// # Errors
///
/// Returns [`GatewayError`] for an unknown metric or on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/sensors/history/{kind}",
    tag = "Sensors",
    summary = "Reading history",
    description = "Newest first. Readings older than the retention window are never returned.",
    params(
        ("kind" = String, Path, description = "ph, turbidity, nh3, temperature or tds"),
        HistoryParams,
    ),
    responses(
        (status = 200, description = "Readings, newest first", body = Vec<ReadingResponse>),
        (status = 400, description = "Unknown metric", body = ErrorResponse),
    )
)]
pub async fn history(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<ReadingResponse>>, GatewayError> {
    let kind: MetricKind = kind.parse()?;
    let readings = state
        .sensor_service
        .history(kind, params.clamped_limit())
        .await?;
    Ok(Json(readings.into_iter().map(ReadingResponse::from).collect()))
}

/// `GET /sensors/status/analysis`: Current water-quality verdict.
///
/// # Errors
///
/// Returns [`GatewayError`] if the latest readings cannot be read.
#[utoipa::path(
    get,
    path = "/api/v1/sensors/status/analysis",
    tag = "Sensors",
    summary = "Analyze water quality",
    description = "Evaluates the newest reading of every metric. A critical verdict triggers a push alert at most once per cooldown; results are snapshotted at most once per snapshot interval.",
    responses(
        (status = 200, description = "Analysis", body = AnalysisResponse),
    )
)]
pub async fn analysis(State(state): State<AppState>) -> Result<Json<AnalysisResponse>, GatewayError> {
    let result = state.sensor_service.analyze().await?;
    Ok(Json(result.into()))
}

/// Sensor routes, relative to `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sensors/add/ph", post(add_ph))
        .route("/sensors/add/turbidity", post(add_turbidity))
        .route("/sensors/add/nh3", post(add_nh3))
        .route("/sensors/add/temperature", post(add_temperature))
        .route("/sensors/add/tds", post(add_tds))
        .route("/sensors/latest/{kind}", get(latest))
        .route("/sensors/history/{kind}", get(history))
        .route("/sensors/status/analysis", get(analysis))
}
