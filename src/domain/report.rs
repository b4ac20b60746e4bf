//! Report shapes aggregated from analysis snapshots.

use serde::Serialize;
use utoipa::ToSchema;

/// Aggregates shown on the daily summary card.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailyStatistics {
    /// Critical snapshots today.
    pub critical: u32,
    /// Warning snapshots today.
    pub warning: u32,
    /// Mean pH, 2 decimals.
    pub avg_ph: f64,
    /// Peak ammonia, 3 decimals.
    pub max_nh3: f64,
    /// Mean turbidity, 2 decimals.
    pub avg_turbidity: f64,
    /// Mean temperature, 1 decimal.
    pub avg_temp: f64,
}

/// Daily summary card.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailySummary {
    /// Local date, `YYYY-MM-DD`.
    pub date: String,
    /// One-line verdict for the day.
    pub summary_text: String,
    /// Aggregates.
    pub statistics: DailyStatistics,
}

/// One snapshot as a row of the daily table.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailyRow {
    /// Local time, `HH:MM`.
    pub time: String,
    /// Snapshot status.
    pub status: String,
    /// pH, 2 decimals, or `-`.
    pub ph: String,
    /// Temperature, 1 decimal, or `-`.
    pub temp: String,
    /// Ammonia, 3 decimals, or `-`.
    pub nh3: String,
    /// Turbidity, 2 decimals, or `-`.
    pub turbidity: String,
    /// Issues joined with `, `, or `Normal`.
    pub issues: String,
}

/// Monthly summary card.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthlySummary {
    /// `M/YYYY`.
    pub period: String,
    /// `A` (no critical), `B` (some), `C` (more than 10% critical).
    pub grade: String,
    /// Snapshots in the month.
    pub total_logs: u32,
    /// Critical snapshots in the month.
    pub critical_count: u32,
}

/// One calendar day as a row of the monthly table.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthlyRow {
    /// `YYYY-MM-DD`.
    pub date: String,
    /// Worst status of the day, or `No Data`.
    pub status: String,
    /// Mean pH, 2 decimals, or `-`.
    pub avg_ph: String,
    /// Mean temperature, 1 decimal, or `-`.
    pub avg_temp: String,
    /// Peak ammonia, 3 decimals, or `-`.
    pub max_nh3: String,
    /// Mean turbidity, 2 decimals, or `-`.
    pub avg_turbidity: String,
    /// Record count note.
    pub note: String,
}
