//! Break intervals nested inside a work session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::time::minutes_between;

/// Persistent representation of a single break interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Break {
    pub id: String,
    pub user_id: String,
    /// The session this break belongs to.
    pub time_log_id: String,
    pub start_time: DateTime<Utc>,
    /// Timestamp when the break ended, if the break is closed.
    pub end_time: Option<DateTime<Utc>>,
    /// Paid breaks never reduce net worked hours.
    pub is_paid: bool,
    pub status: BreakStatus,
    /// Fractional minutes, filled when the break ends.
    pub duration_minutes: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BreakStatus {
    Active,
    Completed,
}

impl BreakStatus {
    pub fn db_value(&self) -> &'static str {
        match self {
            BreakStatus::Active => "active",
            BreakStatus::Completed => "completed",
        }
    }
}

impl Break {
    /// Creates an active break under the given session.
    pub fn start(
        user_id: String,
        time_log_id: String,
        is_paid: bool,
        start_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            time_log_id,
            start_time,
            end_time: None,
            is_paid,
            status: BreakStatus::Active,
            duration_minutes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the break as completed and computes its duration.
    pub fn finish(&mut self, end_time: DateTime<Utc>, now: DateTime<Utc>) {
        self.end_time = Some(end_time);
        self.status = BreakStatus::Completed;
        self.duration_minutes = Some(minutes_between(self.start_time, end_time));
        self.updated_at = now;
    }

    /// Returns `true` while the break is still active.
    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn utc(h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, min, 0).unwrap()
    }

    #[test]
    fn break_activity_reflects_end_state() {
        let now = utc(12, 0);
        let mut record = Break::start("u1".into(), "log-1".into(), false, utc(12, 0), now);
        assert!(record.is_active());
        assert_eq!(record.status, BreakStatus::Active);

        record.finish(utc(12, 30), utc(12, 30));
        assert!(!record.is_active());
        assert_eq!(record.status, BreakStatus::Completed);
        assert_eq!(record.duration_minutes, Some(30.0));
    }

    #[test]
    fn finish_keeps_fractional_minutes() {
        let start = utc(12, 0);
        let mut record = Break::start("u1".into(), "log-1".into(), true, start, start);
        record.finish(start + Duration::seconds(45), start + Duration::seconds(45));
        assert_eq!(record.duration_minutes, Some(0.75));
    }

    #[test]
    fn serde_uses_camel_case_and_lowercase_status() {
        let record = Break::start("u1".into(), "log-1".into(), true, utc(12, 0), utc(12, 0));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["timeLogId"], "log-1");
        assert_eq!(value["isPaid"], true);
        assert_eq!(value["status"], "active");
        assert!(value.get("durationMinutes").is_some());
    }

    #[test]
    fn status_round_trips_through_serde() {
        let status: BreakStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(status, BreakStatus::Completed);
        let value = serde_json::to_value(BreakStatus::Active).unwrap();
        assert_eq!(value, serde_json::json!("active"));
    }
}
