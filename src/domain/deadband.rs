//! Deadband decision rule for sensor persistence.
//!
//! A reading is stored when it is the first one seen, when it moved at
//! least the metric's deadband away from the last stored value, or when
//! the last stored value is older than the heartbeat interval. Everything
//! else is dropped to keep flat signals from flooding storage.

use chrono::{DateTime, TimeDelta, Utc};

use super::MetricKind;

/// Default maximum age of the last stored reading before a flat signal is
/// persisted anyway.
pub const DEFAULT_HEARTBEAT: TimeDelta = TimeDelta::seconds(1800);

/// Last value persisted for one metric kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavedPoint {
    /// Value of the last persisted reading.
    pub value: f64,
    /// When it was persisted.
    pub saved_at: DateTime<Utc>,
}

/// Outcome of the deadband rule for one incoming value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Nothing stored yet for this kind.
    Bootstrap,
    /// Value moved by at least the deadband.
    Changed,
    /// Heartbeat interval elapsed since the last save.
    Heartbeat,
    /// Not material; drop it.
    Skip,
}

impl Decision {
    /// Returns `true` when the reading must be persisted.
    #[must_use]
    pub const fn should_record(self) -> bool {
        !matches!(self, Self::Skip)
    }

    /// Short label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bootstrap => "bootstrap",
            Self::Changed => "changed",
            Self::Heartbeat => "heartbeat",
            Self::Skip => "skip",
        }
    }
}

/// Applies the deadband rule.
#[must_use]
pub fn decide(
    kind: MetricKind,
    last: Option<SavedPoint>,
    value: f64,
    now: DateTime<Utc>,
    heartbeat: TimeDelta,
) -> Decision {
    let Some(last) = last else {
        return Decision::Bootstrap;
    };
    if (value - last.value).abs() >= kind.deadband() {
        return Decision::Changed;
    }
    if now - last.saved_at >= heartbeat {
        return Decision::Heartbeat;
    }
    Decision::Skip
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(value: f64, saved_at: DateTime<Utc>) -> Option<SavedPoint> {
        Some(SavedPoint { value, saved_at })
    }

    #[test]
    fn first_value_bootstraps() {
        let now = Utc::now();
        for kind in MetricKind::ALL {
            assert_eq!(decide(kind, None, 0.0, now, DEFAULT_HEARTBEAT), Decision::Bootstrap);
        }
    }

    #[test]
    fn small_change_within_heartbeat_is_skipped() {
        let now = Utc::now();
        let last = point(7.0, now - TimeDelta::seconds(60));
        let d = decide(MetricKind::Ph, last, 7.05, now, DEFAULT_HEARTBEAT);
        assert_eq!(d, Decision::Skip);
        assert!(!d.should_record());
    }

    #[test]
    fn change_at_threshold_is_recorded() {
        let now = Utc::now();
        let last = point(100.0, now);
        let d = decide(MetricKind::Tds, last, 110.0, now, DEFAULT_HEARTBEAT);
        assert_eq!(d, Decision::Changed);

        let last = point(25.0, now);
        let d = decide(MetricKind::Temperature, last, 24.4, now, DEFAULT_HEARTBEAT);
        assert_eq!(d, Decision::Changed);
    }

    #[test]
    fn stale_flat_signal_is_recorded() {
        let now = Utc::now();
        let last = point(10.0, now - DEFAULT_HEARTBEAT);
        let d = decide(MetricKind::Turbidity, last, 10.0, now, DEFAULT_HEARTBEAT);
        assert_eq!(d, Decision::Heartbeat);

        let last = point(10.0, now - DEFAULT_HEARTBEAT + TimeDelta::seconds(1));
        let d = decide(MetricKind::Turbidity, last, 10.0, now, DEFAULT_HEARTBEAT);
        assert_eq!(d, Decision::Skip);
    }

    #[test]
    fn thresholds_are_per_kind() {
        let now = Utc::now();
        // 0.06 clears the ammonia deadband but not the pH one
        assert_eq!(
            decide(MetricKind::Ammonia, point(0.01, now), 0.07, now, DEFAULT_HEARTBEAT),
            Decision::Changed
        );
        assert_eq!(
            decide(MetricKind::Ph, point(7.0, now), 7.06, now, DEFAULT_HEARTBEAT),
            Decision::Skip
        );
    }
}
