//! Service layer: business logic orchestration.
//!
//! [`SensorService`] owns the ingestion path (deadband recorder) and the
//! analysis path (quality analyzer, alert notifier, snapshot logger).
//! [`ReportService`] aggregates stored snapshots into report cards and
//! tables.

pub mod alert;
pub mod analyzer;
pub mod recorder;
pub mod report_service;
pub mod retention;
pub mod sensor_service;
pub mod snapshot_logger;

pub use report_service::ReportService;
pub use sensor_service::SensorService;
