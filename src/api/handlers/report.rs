//! Report handlers: daily and monthly summaries and tables.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{MessageResponse, MonthParams};
use crate::app_state::AppState;
use crate::domain::report::{DailyRow, DailySummary, MonthlyRow, MonthlySummary};
use crate::error::{ErrorResponse, GatewayError};

/// `GET /reports/summary/daily`: Today's summary card.
///
/// # Errors
///
/// Returns [`GatewayError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/reports/summary/daily",
    tag = "Reports",
    summary = "Daily summary",
    description = "Aggregates today's analysis snapshots. Answers with a message body when no snapshot exists yet.",
    responses(
        (status = 200, description = "Summary card, or `{message}` when there is none", body = DailySummary),
    )
)]
pub async fn daily_summary(State(state): State<AppState>) -> Result<Response, GatewayError> {
    Ok(match state.report_service.daily_summary().await? {
        Some(summary) => Json(summary).into_response(),
        None => Json(MessageResponse::new("Waiting for data")).into_response(),
    })
}

/// `GET /reports/table/daily`: Today's snapshots as rows.
///
/// # Errors
///
/// Returns [`GatewayError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/reports/table/daily",
    tag = "Reports",
    summary = "Daily table",
    responses(
        (status = 200, description = "One row per snapshot, oldest first", body = Vec<DailyRow>),
    )
)]
pub async fn daily_table(State(state): State<AppState>) -> Result<Json<Vec<DailyRow>>, GatewayError> {
    Ok(Json(state.report_service.daily_table().await?))
}

/// `GET /reports/summary/monthly`: Summary card for a month.
///
/// # Errors
///
/// Returns [`GatewayError`] on an invalid month or store failure.
#[utoipa::path(
    get,
    path = "/api/v1/reports/summary/monthly",
    tag = "Reports",
    summary = "Monthly summary",
    description = "Grade A without critical snapshots, C when more than 10% are critical, B otherwise.",
    params(MonthParams),
    responses(
        (status = 200, description = "Summary card, or `{message}` when there is none", body = MonthlySummary),
        (status = 400, description = "Invalid month or year", body = ErrorResponse),
    )
)]
pub async fn monthly_summary(
    State(state): State<AppState>,
    Query(params): Query<MonthParams>,
) -> Result<Response, GatewayError> {
    Ok(
        match state
            .report_service
            .monthly_summary(params.month, params.year)
            .await?
        {
            Some(summary) => Json(summary).into_response(),
            None => Json(MessageResponse::new("No data for this month")).into_response(),
        },
    )
}

/// `GET /reports/table/monthly`: One row per day of a month.
///
/// # Errors
///
/// Returns [`GatewayError`] on an invalid month or store failure.
#[utoipa::path(
    get,
    path = "/api/v1/reports/table/monthly",
    tag = "Reports",
    summary = "Monthly table",
    params(MonthParams),
    responses(
        (status = 200, description = "One row per calendar day", body = Vec<MonthlyRow>),
        (status = 400, description = "Invalid month or year", body = ErrorResponse),
    )
)]
pub async fn monthly_table(
    State(state): State<AppState>,
    Query(params): Query<MonthParams>,
) -> Result<Json<Vec<MonthlyRow>>, GatewayError> {
    Ok(Json(
        state
            .report_service
            .monthly_table(params.month, params.year)
            .await?,
    ))
}

/// Report routes, relative to `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/summary/daily", get(daily_summary))
        .route("/reports/table/daily", get(daily_table))
        .route("/reports/summary/monthly", get(monthly_summary))
        .route("/reports/table/monthly", get(monthly_table))
}
