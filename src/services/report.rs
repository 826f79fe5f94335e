//! Report aggregation over a date range.

use std::collections::HashMap;

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::error::Error;
use crate::models::{Report, ReportEntry, ReportSummary, TimeLogWithBreaks};
use crate::repositories::log_store::LogStore;
use crate::utils::time::{hours_between, local_day, round_hours, TimeRange};

/// Folds sessions into aggregate figures.
///
/// Closed sessions contribute gross hours minus their closed unpaid breaks;
/// paid breaks and still-open breaks never enter any sum. Open sessions are
/// skipped entirely. Day grouping uses the calendar day of `check_in` in the
/// given timezone. Accumulation keeps full precision; rounding to two
/// decimals happens once at the end. Pure: same input, same output.
pub fn summarize(entries: &[TimeLogWithBreaks], tz: &Tz) -> ReportSummary {
    let mut total = 0.0_f64;
    let mut break_total = 0.0_f64;
    let mut day_totals: HashMap<NaiveDate, f64> = HashMap::new();

    for entry in entries {
        let Some(check_out) = entry.log.check_out else {
            continue;
        };
        let gross = hours_between(entry.log.check_in, check_out);
        let unpaid = unpaid_break_hours(entry);
        let net = gross - unpaid;

        total += net;
        break_total += unpaid;
        let day = local_day(entry.log.check_in, tz);
        *day_totals.entry(day).or_insert(0.0) += net;
    }

    let days_worked = day_totals.len() as u32;
    let longest_day = day_totals.values().cloned().fold(0.0_f64, f64::max);
    let average = total / day_totals.len().max(1) as f64;

    ReportSummary {
        total_hours: round_hours(total),
        total_break_hours: round_hours(break_total),
        average_hours_per_day: round_hours(average),
        days_worked,
        longest_day: round_hours(longest_day),
    }
}

fn unpaid_break_hours(entry: &TimeLogWithBreaks) -> f64 {
    entry
        .breaks
        .iter()
        .filter(|b| !b.is_paid)
        .filter_map(|b| b.end_time.map(|end| hours_between(b.start_time, end)))
        .sum()
}

/// Produces range reports by resolving sessions and breaks from the store.
pub struct ReportService<S> {
    store: S,
    time_zone: Tz,
}

impl<S: LogStore> ReportService<S> {
    pub fn new(store: S, time_zone: Tz) -> Self {
        Self { store, time_zone }
    }

    /// Summary plus per-session listing for the range, newest first.
    ///
    /// Read-only and idempotent: re-running over unchanged data returns the
    /// same report.
    pub async fn report(&self, user_id: &str, range: TimeRange) -> Result<Report, Error> {
        let logs = self.store.logs_in_range(user_id, range).await?;
        let mut with_breaks = Vec::with_capacity(logs.len());
        for log in logs {
            let breaks = self.store.breaks_for_log(user_id, &log.id).await?;
            with_breaks.push(TimeLogWithBreaks { log, breaks });
        }

        let summary = summarize(&with_breaks, &self.time_zone);
        let entries = with_breaks.into_iter().map(report_entry).collect();
        Ok(Report { summary, entries })
    }
}

fn report_entry(entry: TimeLogWithBreaks) -> ReportEntry {
    let figures = entry.log.check_out.map(|check_out| {
        let unpaid = unpaid_break_hours(&entry);
        let net = hours_between(entry.log.check_in, check_out) - unpaid;
        (round_hours(net), round_hours(unpaid))
    });
    ReportEntry {
        log: entry.log,
        breaks: entry.breaks,
        net_hours: figures.map(|(net, _)| net),
        unpaid_break_hours: figures.map(|(_, unpaid)| unpaid),
    }
}
