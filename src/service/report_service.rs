//! Report service: daily and monthly aggregates over analysis snapshots.
//!
//! Days are cut at local midnight for a fixed UTC offset, matching the
//! operators' wall clock rather than UTC.

use std::sync::Arc;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, TimeDelta, TimeZone, Utc};

use crate::domain::report::{DailyRow, DailyStatistics, DailySummary, MonthlyRow, MonthlySummary};
use crate::domain::{Clock, MetricKind, QualityStatus, Snapshot};
use crate::error::GatewayError;
use crate::persistence::SnapshotStore;

/// Builds report cards and tables from stored snapshots.
#[derive(Debug)]
pub struct ReportService {
    snapshots: Arc<dyn SnapshotStore>,
    clock: Arc<dyn Clock>,
    offset: FixedOffset,
}

impl ReportService {
    /// Creates a report service cutting days at `utc_offset_hours`.
    ///
    /// Out-of-range offsets fall back to UTC.
    #[must_use]
    pub fn new(snapshots: Arc<dyn SnapshotStore>, clock: Arc<dyn Clock>, utc_offset_hours: i32) -> Self {
        let offset = utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                tracing::warn!(utc_offset_hours, "invalid report offset, using UTC");
                Utc.fix()
            });
        Self {
            snapshots,
            clock,
            offset,
        }
    }

    /// Summary card for today.
    ///
    /// Returns `None` when no snapshot was taken today.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] on store failure.
    pub async fn daily_summary(&self) -> Result<Option<DailySummary>, GatewayError> {
        let today = self.today();
        let logs = self.day_logs(today).await?;
        if logs.is_empty() {
            return Ok(None);
        }

        let critical = count_status(&logs, QualityStatus::Critical);
        let warning = count_status(&logs, QualityStatus::Warning);
        let summary_text = if critical > 0 {
            "Critical events recorded"
        } else if warning > 0 {
            "Needs attention"
        } else {
            "Excellent"
        };

        Ok(Some(DailySummary {
            date: today.format("%Y-%m-%d").to_string(),
            summary_text: summary_text.to_string(),
            statistics: DailyStatistics {
                critical,
                warning,
                avg_ph: round(mean(&logs, MetricKind::Ph).unwrap_or(0.0), 2),
                max_nh3: round(max(&logs, MetricKind::Ammonia).unwrap_or(0.0), 3),
                avg_turbidity: round(mean(&logs, MetricKind::Turbidity).unwrap_or(0.0), 2),
                avg_temp: round(mean(&logs, MetricKind::Temperature).unwrap_or(0.0), 1),
            },
        }))
    }

    /// One row per snapshot taken today, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] on store failure.
    pub async fn daily_table(&self) -> Result<Vec<DailyRow>, GatewayError> {
        let logs = self.day_logs(self.today()).await?;
        Ok(logs
            .iter()
            .map(|log| DailyRow {
                time: log
                    .timestamp
                    .with_timezone(&self.offset)
                    .format("%H:%M")
                    .to_string(),
                status: log.status.clone(),
                ph: fmt_opt(log.ph, 2),
                temp: fmt_opt(log.temperature, 1),
                nh3: fmt_opt(log.nh3, 3),
                turbidity: fmt_opt(log.turbidity, 2),
                issues: if log.issues.is_empty() {
                    "Normal".to_string()
                } else {
                    log.issues.join(", ")
                },
            })
            .collect())
    }

    /// Summary card for a calendar month.
    ///
    /// Returns `None` when the month has no snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for an invalid month/year
    /// and [`GatewayError::Persistence`] on store failure.
    pub async fn monthly_summary(
        &self,
        month: u32,
        year: i32,
    ) -> Result<Option<MonthlySummary>, GatewayError> {
        let (first, last) = month_bounds(month, year)?;
        let logs = self.range_logs(first, last).await?;
        if logs.is_empty() {
            return Ok(None);
        }

        let total = u32::try_from(logs.len()).unwrap_or(u32::MAX);
        let critical_count = count_status(&logs, QualityStatus::Critical);
        let grade = if f64::from(critical_count) > f64::from(total) * 0.1 {
            "C"
        } else if critical_count > 0 {
            "B"
        } else {
            "A"
        };

        Ok(Some(MonthlySummary {
            period: format!("{month}/{year}"),
            grade: grade.to_string(),
            total_logs: total,
            critical_count,
        }))
    }

    /// One row per calendar day of the month.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for an invalid month/year
    /// and [`GatewayError::Persistence`] on store failure.
    pub async fn monthly_table(&self, month: u32, year: i32) -> Result<Vec<MonthlyRow>, GatewayError> {
        let (first, last) = month_bounds(month, year)?;
        let logs = self.range_logs(first, last).await?;

        Ok(first
            .iter_days()
            .take_while(|day| *day <= last)
            .map(|day| {
                let day_logs: Vec<Snapshot> = logs
                    .iter()
                    .filter(|log| log.timestamp.with_timezone(&self.offset).date_naive() == day)
                    .cloned()
                    .collect();
                monthly_row(day, &day_logs)
            })
            .collect())
    }

    fn today(&self) -> NaiveDate {
        self.clock.now().with_timezone(&self.offset).date_naive()
    }

    async fn day_logs(&self, day: NaiveDate) -> Result<Vec<Snapshot>, GatewayError> {
        self.range_logs(day, day).await
    }

    /// Snapshots from local midnight of `first` through the end of `last`.
    async fn range_logs(&self, first: NaiveDate, last: NaiveDate) -> Result<Vec<Snapshot>, GatewayError> {
        let start = self.local_midnight(first)?;
        let end = self
            .local_midnight(last)?
            .checked_add_signed(TimeDelta::days(1) - TimeDelta::nanoseconds(1))
            .ok_or_else(|| GatewayError::InvalidRequest(format!("date out of range: {last}")))?;
        Ok(self.snapshots.in_range(start, end).await?)
    }

    fn local_midnight(&self, day: NaiveDate) -> Result<DateTime<Utc>, GatewayError> {
        day.and_hms_opt(0, 0, 0)
            .and_then(|naive| self.offset.from_local_datetime(&naive).single())
            .map(|t| t.with_timezone(&Utc))
            .ok_or_else(|| GatewayError::InvalidRequest(format!("date out of range: {day}")))
    }
}

fn monthly_row(day: NaiveDate, logs: &[Snapshot]) -> MonthlyRow {
    let date = day.format("%Y-%m-%d").to_string();
    if logs.is_empty() {
        return MonthlyRow {
            date,
            status: QualityStatus::NoData.as_str().to_string(),
            avg_ph: "-".to_string(),
            avg_temp: "-".to_string(),
            max_nh3: "-".to_string(),
            avg_turbidity: "-".to_string(),
            note: "No data".to_string(),
        };
    }

    let status = if count_status(logs, QualityStatus::Critical) > 0 {
        QualityStatus::Critical
    } else if count_status(logs, QualityStatus::Warning) > 0 {
        QualityStatus::Warning
    } else {
        QualityStatus::Good
    };

    MonthlyRow {
        date,
        status: status.as_str().to_string(),
        avg_ph: fmt_num(mean(logs, MetricKind::Ph).unwrap_or(0.0), 2),
        avg_temp: fmt_num(mean(logs, MetricKind::Temperature).unwrap_or(0.0), 1),
        max_nh3: fmt_num(max(logs, MetricKind::Ammonia).unwrap_or(0.0), 3),
        avg_turbidity: fmt_num(mean(logs, MetricKind::Turbidity).unwrap_or(0.0), 2),
        note: format!("{} records", logs.len()),
    }
}

/// First and last day of a month.
fn month_bounds(month: u32, year: i32) -> Result<(NaiveDate, NaiveDate), GatewayError> {
    let invalid = || GatewayError::InvalidRequest(format!("invalid month/year: {month}/{year}"));
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(year.saturating_add(1), 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last = next.and_then(|d| d.pred_opt()).ok_or_else(invalid)?;
    Ok((first, last))
}

fn count_status(logs: &[Snapshot], status: QualityStatus) -> u32 {
    let n = logs.iter().filter(|l| l.status == status.as_str()).count();
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn values(logs: &[Snapshot], kind: MetricKind) -> impl Iterator<Item = f64> + '_ {
    logs.iter().filter_map(move |l| l.value(kind))
}

fn mean(logs: &[Snapshot], kind: MetricKind) -> Option<f64> {
    let (sum, n) = values(logs, kind).fold((0.0, 0u32), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / f64::from(n))
}

fn max(logs: &[Snapshot], kind: MetricKind) -> Option<f64> {
    values(logs, kind).reduce(f64::max)
}

fn round(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn fmt_num(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| fmt_num(v, decimals))
}
