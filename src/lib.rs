//! # aquasense-gateway
//!
//! Water-quality telemetry backend for aquaculture ponds.
//!
//! Devices publish pH, turbidity, ammonia, temperature and TDS readings over
//! HTTP. Readings pass a per-metric deadband filter before they are stored,
//! an on-demand analysis turns the newest reading of each metric into a
//! verdict, critical verdicts raise a rate-limited push alert, and verdicts
//! are snapshotted periodically for daily and monthly reports.
//!
//! ## Architecture
//!
//! ```text
//! Devices / dashboard (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── SensorService (service/)
//!     │     ├── DeadbandRecorder
//!     │     └── QualityAnalyzer ── AlertNotifier ── PushNotifier (notify/)
//!     │                        └── SnapshotLogger
//!     ├── ReportService (service/)
//!     │
//!     ├── Rules, metric table, clock (domain/)
//!     │
//!     └── MeasurementStore / SnapshotStore (persistence/)
//!           ├── PostgresStore
//!           └── MemoryStore
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod notify;
pub mod persistence;
pub mod service;
