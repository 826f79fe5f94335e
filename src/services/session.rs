//! The session state machine: check-in, check-out, breaks, manual entries,
//! and audited deletes.
//!
//! Session status is never held in memory. Every operation re-derives it
//! from the store, so the store is the single source of truth and a crash
//! between operations loses nothing.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::{AuditRecord, Break, TimeLog, TimeLogWithBreaks};
use crate::repositories::log_store::LogStore;
use crate::utils::time::{now_utc, today_range};

/// What `check_out` does when a break is still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutPolicy {
    /// Close the open break at the checkout instant, then close the session.
    AutoCloseBreak,
    /// Refuse with [`Error::BreakStillOpen`] and change nothing.
    Reject,
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        CheckoutPolicy::AutoCloseBreak
    }
}

/// Reconstructed session status.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    NoSession,
    Working { log: TimeLog },
    OnBreak { log: TimeLog, current_break: Break },
}

/// Drives the legal transitions of one user's work sessions.
pub struct SessionService<S> {
    store: S,
    time_zone: Tz,
    checkout_policy: CheckoutPolicy,
}

impl<S: LogStore> SessionService<S> {
    pub fn new(store: S, time_zone: Tz) -> Self {
        Self {
            store,
            time_zone,
            checkout_policy: CheckoutPolicy::default(),
        }
    }

    pub fn with_checkout_policy(mut self, checkout_policy: CheckoutPolicy) -> Self {
        self.checkout_policy = checkout_policy;
        self
    }

    pub fn checkout_policy(&self) -> CheckoutPolicy {
        self.checkout_policy
    }

    /// Opens a new session.
    ///
    /// Fails with [`Error::AlreadyCheckedIn`] when an open session exists.
    /// A concurrent check-in losing the race is rejected by the store's
    /// open-session uniqueness and surfaces as the same error.
    pub async fn check_in(&self, user_id: &str) -> Result<TimeLog, Error> {
        if self.store.find_open_log(user_id).await?.is_some() {
            return Err(Error::AlreadyCheckedIn);
        }
        let now = now_utc(&self.time_zone);
        let log = TimeLog::open(user_id.to_string(), now, now);
        let created = self.store.create_log(&log).await?;
        tracing::info!(user_id, log_id = %created.id, "checked in");
        Ok(created)
    }

    /// Closes the open session.
    ///
    /// An open break is handled per the configured [`CheckoutPolicy`].
    pub async fn check_out(&self, user_id: &str) -> Result<TimeLog, Error> {
        let Some(mut log) = self.store.find_open_log(user_id).await? else {
            return Err(Error::NoActiveSession);
        };
        let now = now_utc(&self.time_zone);
        if let Some(mut open_break) = self.store.find_open_break(user_id, &log.id).await? {
            match self.checkout_policy {
                CheckoutPolicy::Reject => return Err(Error::BreakStillOpen),
                CheckoutPolicy::AutoCloseBreak => {
                    open_break.finish(now, now);
                    self.store.update_break(&open_break).await?;
                }
            }
        }
        log.close(now, now);
        let updated = self.store.update_log(&log).await?;
        tracing::info!(user_id, log_id = %updated.id, "checked out");
        Ok(updated)
    }

    /// Starts a break under the open session.
    pub async fn start_break(&self, user_id: &str, is_paid: bool) -> Result<Break, Error> {
        let Some(log) = self.store.find_open_log(user_id).await? else {
            return Err(Error::NoActiveSession);
        };
        if self.store.find_open_break(user_id, &log.id).await?.is_some() {
            return Err(Error::BreakAlreadyActive);
        }
        let now = now_utc(&self.time_zone);
        let break_record = Break::start(user_id.to_string(), log.id, is_paid, now, now);
        self.store.create_break(&break_record).await
    }

    /// Ends the open break.
    ///
    /// With no open session there can be no break to end, so both cases
    /// report [`Error::NoActiveBreak`].
    pub async fn end_break(&self, user_id: &str) -> Result<Break, Error> {
        let Some(log) = self.store.find_open_log(user_id).await? else {
            return Err(Error::NoActiveBreak);
        };
        let Some(mut open_break) = self.store.find_open_break(user_id, &log.id).await? else {
            return Err(Error::NoActiveBreak);
        };
        let now = now_utc(&self.time_zone);
        open_break.finish(now, now);
        self.store.update_break(&open_break).await
    }

    /// Reconstructs the current status from today's stored records.
    pub async fn current_state(&self, user_id: &str) -> Result<SessionState, Error> {
        let range = today_range(&self.time_zone);
        let logs = self.store.logs_in_range(user_id, range).await?;
        let Some(log) = logs.into_iter().find(TimeLog::is_open) else {
            return Ok(SessionState::NoSession);
        };
        match self.store.find_open_break(user_id, &log.id).await? {
            Some(current_break) => Ok(SessionState::OnBreak { log, current_break }),
            None => Ok(SessionState::Working { log }),
        }
    }

    /// Today's sessions, newest first, each with its breaks.
    pub async fn today_logs(&self, user_id: &str) -> Result<Vec<TimeLogWithBreaks>, Error> {
        let range = today_range(&self.time_zone);
        let logs = self.store.logs_in_range(user_id, range).await?;
        let mut rows = Vec::with_capacity(logs.len());
        for log in logs {
            let breaks = self.store.breaks_for_log(user_id, &log.id).await?;
            rows.push(TimeLogWithBreaks { log, breaks });
        }
        Ok(rows)
    }

    /// Records a closed back-dated session.
    ///
    /// Fails with [`Error::InvalidTimeRange`] unless `check_out > check_in`;
    /// nothing is created on failure.
    pub async fn add_manual_entry(
        &self,
        user_id: &str,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    ) -> Result<TimeLog, Error> {
        if check_out <= check_in {
            return Err(Error::InvalidTimeRange);
        }
        let now = now_utc(&self.time_zone);
        let log = TimeLog::manual(user_id.to_string(), check_in, check_out, now);
        self.store.create_log(&log).await
    }

    /// Rewrites both boundaries of an existing session.
    ///
    /// The same `check_out > check_in` rule applies as for manual entries.
    pub async fn update_times(
        &self,
        user_id: &str,
        log_id: &str,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    ) -> Result<TimeLog, Error> {
        if check_out <= check_in {
            return Err(Error::InvalidTimeRange);
        }
        let Some(mut log) = self.store.find_log(user_id, log_id).await? else {
            return Err(Error::LogNotFound(log_id.to_string()));
        };
        let now = now_utc(&self.time_zone);
        log.set_times(check_in, check_out, now);
        self.store.update_log(&log).await
    }

    /// Deletes a session and its breaks, after writing the audit record.
    ///
    /// The audit write comes first; if it fails the delete is never issued
    /// and the session stays intact.
    pub async fn delete_log(&self, user_id: &str, log_id: &str) -> Result<(), Error> {
        let Some(log) = self.store.find_log(user_id, log_id).await? else {
            return Err(Error::LogNotFound(log_id.to_string()));
        };
        let breaks = self.store.breaks_for_log(user_id, log_id).await?;
        let now = now_utc(&self.time_zone);
        let record = AuditRecord::for_deleted_log(&log, &breaks, user_id, now)
            .map_err(|e| Error::StoreUnavailable(e.into()))?;
        self.store.write_audit(&record).await?;
        self.store.delete_log(user_id, log_id).await?;
        tracing::info!(user_id, log_id, audit_id = %record.id, "deleted time log");
        Ok(())
    }
}
