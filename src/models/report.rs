//! Derived report shapes; nothing here is persisted.

use serde::Serialize;

use crate::models::breaks::Break;
use crate::models::time_log::TimeLog;

/// Aggregate figures over a date range.
///
/// Hour values are rounded to two decimals at this edge; intermediate
/// accumulation keeps full precision.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Net worked hours: gross session time minus unpaid closed breaks.
    pub total_hours: f64,
    /// Unpaid closed break hours over the range.
    pub total_break_hours: f64,
    pub average_hours_per_day: f64,
    /// Distinct local calendar days with at least one closed session.
    pub days_worked: u32,
    /// Highest single-day net total.
    pub longest_day: f64,
}

/// One listing row: the session, its breaks, and its net figures.
///
/// Open sessions appear in the listing with `None` figures and are excluded
/// from every [`ReportSummary`] aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    #[serde(flatten)]
    pub log: TimeLog,
    pub breaks: Vec<Break>,
    pub net_hours: Option<f64>,
    pub unpaid_break_hours: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub summary: ReportSummary,
    pub entries: Vec<ReportEntry>,
}
