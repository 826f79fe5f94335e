//! Log store trait for dependency injection and testing.
//!
//! This module defines the LogStore trait which can be mocked using mockall
//! for testing purposes.

use async_trait::async_trait;

use crate::error::Error;
use crate::models::{AuditRecord, Break, TimeLog};
use crate::utils::time::TimeRange;

/// Storage contract for sessions, breaks, and audit records.
///
/// Every operation is scoped to one `user_id`; no call reads or writes
/// another user's records. Implementations must reject a second open session
/// per user ([`Error::AlreadyCheckedIn`]) and a second open break per session
/// ([`Error::BreakAlreadyActive`]) at insert time, and must apply
/// [`delete_log`](LogStore::delete_log) and its break cascade as one unit.
///
/// Use `MockLogStore` in tests to mock the behavior.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Sessions with `check_in` inside `range`, newest first.
    async fn logs_in_range(&self, user_id: &str, range: TimeRange) -> Result<Vec<TimeLog>, Error>;

    /// Looks up one session by id.
    async fn find_log(&self, user_id: &str, log_id: &str) -> Result<Option<TimeLog>, Error>;

    /// The user's open session regardless of date, if any.
    async fn find_open_log(&self, user_id: &str) -> Result<Option<TimeLog>, Error>;

    /// Persists a new session.
    async fn create_log(&self, log: &TimeLog) -> Result<TimeLog, Error>;

    /// Rewrites an existing session.
    async fn update_log(&self, log: &TimeLog) -> Result<TimeLog, Error>;

    /// Deletes a session and all of its breaks as one unit.
    ///
    /// Callers persist the audit record first; this method never writes one.
    async fn delete_log(&self, user_id: &str, log_id: &str) -> Result<(), Error>;

    /// Breaks belonging to a session, earliest first.
    async fn breaks_for_log(&self, user_id: &str, log_id: &str) -> Result<Vec<Break>, Error>;

    /// The open break under a session, if any.
    async fn find_open_break(&self, user_id: &str, log_id: &str)
        -> Result<Option<Break>, Error>;

    /// Persists a new break.
    async fn create_break(&self, break_record: &Break) -> Result<Break, Error>;

    /// Rewrites an existing break.
    async fn update_break(&self, break_record: &Break) -> Result<Break, Error>;

    /// Appends an audit record. Must complete before the delete it documents.
    async fn write_audit(&self, record: &AuditRecord) -> Result<(), Error>;

    /// Audit records for a user, newest first.
    async fn list_audits(&self, user_id: &str) -> Result<Vec<AuditRecord>, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_log_store_can_be_created() {
        let _mock = MockLogStore::new();
    }

    #[test]
    fn mock_log_store_trait_bounds() {
        fn check_send_sync<T: Send + Sync>() {}
        check_send_sync::<MockLogStore>();
    }
}
