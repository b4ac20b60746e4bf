//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::handlers::{report, sensor, system};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI description, served at `/api-docs/openapi.json` when
/// the `swagger-ui` feature is enabled.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "aquasense-gateway",
        description = "Water-quality telemetry: ingestion, analysis, alerts and reports."
    ),
    paths(
        sensor::add_ph,
        sensor::add_turbidity,
        sensor::add_nh3,
        sensor::add_temperature,
        sensor::add_tds,
        sensor::latest,
        sensor::history,
        sensor::analysis,
        report::daily_summary,
        report::daily_table,
        report::monthly_summary,
        report::monthly_table,
        system::health_handler,
        system::metrics_handler,
    ),
    components(schemas(ErrorResponse, ErrorBody)),
    tags(
        (name = "Sensors", description = "Ingestion, queries and analysis"),
        (name = "Reports", description = "Daily and monthly reports"),
        (name = "System", description = "Health and catalog"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/sensors/add/ph",
            "/api/v1/sensors/add/tds",
            "/api/v1/sensors/latest/{kind}",
            "/api/v1/sensors/history/{kind}",
            "/api/v1/sensors/status/analysis",
            "/api/v1/reports/table/monthly",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
