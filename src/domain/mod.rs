//! Domain layer: metric kinds, readings, quality rules, and time.
//!
//! Everything here is free of I/O. The deadband rule and the quality
//! rules are pure functions; the service layer owns the mutable state
//! they are applied to.

pub mod analysis;
pub mod clock;
pub mod deadband;
pub mod metric;
pub mod quality;
pub mod reading;
pub mod report;

pub use analysis::{AnalysisResult, Snapshot};
pub use clock::{Clock, ManualClock, SystemClock};
pub use metric::{MetricKind, PerMetric, UnknownMetric};
pub use quality::QualityStatus;
pub use reading::Reading;
