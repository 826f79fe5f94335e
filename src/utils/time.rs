use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Half-open UTC interval: `start` inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Returns the current time in the configured timezone.
pub fn now_in_timezone(tz: &Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(tz)
}

/// Returns the current UTC time, aligned with the configured timezone.
pub fn now_utc(tz: &Tz) -> DateTime<Utc> {
    now_in_timezone(tz).with_timezone(&Utc)
}

/// Returns today's date in the configured timezone.
pub fn today_local(tz: &Tz) -> NaiveDate {
    now_in_timezone(tz).date_naive()
}

/// Returns the calendar day a UTC instant falls on in the configured timezone.
pub fn local_day(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// Resolves local midnight of `date` to a UTC instant.
///
/// When a DST transition removes midnight the first valid instant after it is
/// used instead.
fn local_midnight(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => {
            match tz.from_local_datetime(&(midnight + Duration::hours(1))) {
                LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
                LocalResult::None => Utc.from_utc_datetime(&midnight),
            }
        }
    }
}

/// Returns the range covering `date` in the configured timezone.
pub fn day_range(date: NaiveDate, tz: &Tz) -> TimeRange {
    TimeRange::new(
        local_midnight(date, tz),
        local_midnight(date + Duration::days(1), tz),
    )
}

/// Returns the range covering today in the configured timezone.
pub fn today_range(tz: &Tz) -> TimeRange {
    day_range(today_local(tz), tz)
}

/// Returns the Monday-to-Monday week containing `date`.
pub fn week_range(date: NaiveDate, tz: &Tz) -> TimeRange {
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    TimeRange::new(
        local_midnight(monday, tz),
        local_midnight(monday + Duration::days(7), tz),
    )
}

/// Returns the range covering a calendar month, or `None` for an invalid
/// year/month pair.
pub fn month_range(year: i32, month: u32, tz: &Tz) -> Option<TimeRange> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    Some(TimeRange::new(
        local_midnight(start, tz),
        local_midnight(end, tz),
    ))
}

/// Returns the range covering today and the preceding `days - 1` days.
///
/// `last_days(1)` is equivalent to [`today_range`]; `0` is treated as `1`.
pub fn last_days(days: u32, tz: &Tz) -> TimeRange {
    let today = today_local(tz);
    let start = today - Duration::days(days.max(1) as i64 - 1);
    TimeRange::new(local_midnight(start, tz), local_midnight(today + Duration::days(1), tz))
}

/// Elapsed hours between two instants, full precision.
pub fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / 3_600_000.0
}

/// Elapsed minutes between two instants, full precision.
pub fn minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / 60_000.0
}

/// Rounds an hour value to two decimals for display.
pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}
