//! The work session record: one check-in, at most one check-out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::breaks::Break;
use crate::utils::time::hours_between;

/// Persistent representation of a single work session.
///
/// A log with no `check_out` is an open session. Serialized field names keep
/// the camelCase document shape (`checkIn`, `isManualEntry`) so stored
/// records stay compatible across implementations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TimeLog {
    pub id: String,
    pub user_id: String,
    /// Timestamp when the session started.
    pub check_in: DateTime<Utc>,
    /// Timestamp when the session ended, if the session is closed.
    pub check_out: Option<DateTime<Utc>>,
    /// Set for entries created after the fact rather than by checking in.
    #[serde(default)]
    pub is_manual_entry: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimeLog {
    /// Creates an open session starting at `check_in`.
    pub fn open(user_id: String, check_in: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            check_in,
            check_out: None,
            is_manual_entry: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a closed back-dated entry.
    ///
    /// Callers validate `check_out > check_in` before constructing.
    pub fn manual(
        user_id: String,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            check_in,
            check_out: Some(check_out),
            is_manual_entry: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Closes the session.
    pub fn close(&mut self, check_out: DateTime<Utc>, now: DateTime<Utc>) {
        self.check_out = Some(check_out);
        self.updated_at = now;
    }

    /// Rewrites both session boundaries, as a manual edit does.
    pub fn set_times(
        &mut self,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
        now: DateTime<Utc>,
    ) {
        self.check_in = check_in;
        self.check_out = Some(check_out);
        self.updated_at = now;
    }

    /// Returns `true` while the session has not been checked out.
    pub fn is_open(&self) -> bool {
        self.check_out.is_none()
    }

    /// Session hours before break deductions, `None` while open.
    pub fn gross_hours(&self) -> Option<f64> {
        self.check_out
            .map(|check_out| hours_between(self.check_in, check_out))
    }
}

/// A session together with its breaks, ordered by break start time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeLogWithBreaks {
    #[serde(flatten)]
    pub log: TimeLog,
    pub breaks: Vec<Break>,
}
