//! Closed set of water-quality metrics and their static properties.
//!
//! Every per-metric constant (API name, ingestion field, storage
//! collection, deadband threshold) lives in one table on [`MetricKind`].
//! Adding a metric means adding a variant and one row per accessor.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One of the five sensor metrics the gateway understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Acidity, dimensionless pH units.
    Ph,
    /// Turbidity in NTU.
    Turbidity,
    /// Ammonia (NH3) in mg/L.
    #[serde(rename = "nh3")]
    Ammonia,
    /// Water temperature in °C.
    Temperature,
    /// Total dissolved solids in ppm.
    Tds,
}

impl MetricKind {
    /// All metric kinds in display order.
    pub const ALL: [Self; 5] = [
        Self::Ph,
        Self::Turbidity,
        Self::Ammonia,
        Self::Temperature,
        Self::Tds,
    ];

    /// Canonical lowercase name used in URLs and responses.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ph => "ph",
            Self::Turbidity => "turbidity",
            Self::Ammonia => "nh3",
            Self::Temperature => "temperature",
            Self::Tds => "tds",
        }
    }

    /// JSON field carrying the value in device ingestion payloads.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Ph => "ph",
            Self::Turbidity => "NTU",
            Self::Ammonia => "NH3",
            Self::Temperature => "temperature",
            Self::Tds => "tds",
        }
    }

    /// Storage collection (table) holding readings of this kind.
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Ph => "sensor_ph",
            Self::Turbidity => "sensor_ntu",
            Self::Ammonia => "sensor_nh3",
            Self::Temperature => "sensor_temperature",
            Self::Tds => "sensor_tds",
        }
    }

    /// Minimum absolute change that makes a reading worth persisting.
    #[must_use]
    pub const fn deadband(self) -> f64 {
        match self {
            Self::Ph => 0.1,
            Self::Turbidity => 5.0,
            Self::Ammonia => 0.05,
            Self::Temperature => 0.5,
            Self::Tds => 10.0,
        }
    }

    /// Display unit, empty for dimensionless metrics.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Ph => "",
            Self::Turbidity => "NTU",
            Self::Ammonia => "mg/L",
            Self::Temperature => "°C",
            Self::Tds => "ppm",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a metric name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown metric kind: {0}")]
pub struct UnknownMetric(pub String);

impl FromStr for MetricKind {
    type Err = UnknownMetric;

    /// Parses a metric name, accepting the legacy aliases devices still send.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ph" => Ok(Self::Ph),
            "turbidity" | "ntu" => Ok(Self::Turbidity),
            "nh3" | "ammonia" => Ok(Self::Ammonia),
            "temperature" | "temp" => Ok(Self::Temperature),
            "tds" => Ok(Self::Tds),
            _ => Err(UnknownMetric(s.to_string())),
        }
    }
}

/// One value slot per metric kind, addressed by [`MetricKind`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PerMetric<T> {
    ph: T,
    turbidity: T,
    ammonia: T,
    temperature: T,
    tds: T,
}

impl<T> PerMetric<T> {
    /// Builds a table by calling `f` once per kind.
    pub fn from_fn(mut f: impl FnMut(MetricKind) -> T) -> Self {
        Self {
            ph: f(MetricKind::Ph),
            turbidity: f(MetricKind::Turbidity),
            ammonia: f(MetricKind::Ammonia),
            temperature: f(MetricKind::Temperature),
            tds: f(MetricKind::Tds),
        }
    }

    /// Returns the slot for `kind`.
    #[must_use]
    pub const fn get(&self, kind: MetricKind) -> &T {
        match kind {
            MetricKind::Ph => &self.ph,
            MetricKind::Turbidity => &self.turbidity,
            MetricKind::Ammonia => &self.ammonia,
            MetricKind::Temperature => &self.temperature,
            MetricKind::Tds => &self.tds,
        }
    }

    /// Returns the mutable slot for `kind`.
    pub fn get_mut(&mut self, kind: MetricKind) -> &mut T {
        match kind {
            MetricKind::Ph => &mut self.ph,
            MetricKind::Turbidity => &mut self.turbidity,
            MetricKind::Ammonia => &mut self.ammonia,
            MetricKind::Temperature => &mut self.temperature,
            MetricKind::Tds => &mut self.tds,
        }
    }

    /// Iterates `(kind, slot)` pairs in [`MetricKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (MetricKind, &T)> {
        MetricKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}
