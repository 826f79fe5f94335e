//! In-memory log store.
//!
//! Reference implementation of the [`LogStore`] contract. It backs the test
//! suite and suits embedders that do not need persistence; the uniqueness
//! and cascade guarantees match the PostgreSQL schema.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::error::Error;
use crate::models::{AuditRecord, Break, TimeLog};
use crate::repositories::log_store::LogStore;
use crate::utils::time::TimeRange;

#[derive(Debug, Default)]
struct Tables {
    logs: Vec<TimeLog>,
    breaks: Vec<Break>,
    audits: Vec<AuditRecord>,
}

/// [`LogStore`] over mutex-guarded tables. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn logs_in_range(&self, user_id: &str, range: TimeRange) -> Result<Vec<TimeLog>, Error> {
        let tables = self.tables();
        let mut rows: Vec<TimeLog> = tables
            .logs
            .iter()
            .filter(|log| log.user_id == user_id && range.contains(log.check_in))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.check_in.cmp(&a.check_in));
        Ok(rows)
    }

    async fn find_log(&self, user_id: &str, log_id: &str) -> Result<Option<TimeLog>, Error> {
        let tables = self.tables();
        Ok(tables
            .logs
            .iter()
            .find(|log| log.user_id == user_id && log.id == log_id)
            .cloned())
    }

    async fn find_open_log(&self, user_id: &str) -> Result<Option<TimeLog>, Error> {
        let tables = self.tables();
        Ok(tables
            .logs
            .iter()
            .find(|log| log.user_id == user_id && log.is_open())
            .cloned())
    }

    async fn create_log(&self, log: &TimeLog) -> Result<TimeLog, Error> {
        let mut tables = self.tables();
        if log.is_open()
            && tables
                .logs
                .iter()
                .any(|existing| existing.user_id == log.user_id && existing.is_open())
        {
            return Err(Error::AlreadyCheckedIn);
        }
        tables.logs.push(log.clone());
        Ok(log.clone())
    }

    async fn update_log(&self, log: &TimeLog) -> Result<TimeLog, Error> {
        let mut tables = self.tables();
        let slot = tables
            .logs
            .iter_mut()
            .find(|existing| existing.user_id == log.user_id && existing.id == log.id)
            .ok_or_else(|| Error::LogNotFound(log.id.clone()))?;
        *slot = log.clone();
        Ok(log.clone())
    }

    async fn delete_log(&self, user_id: &str, log_id: &str) -> Result<(), Error> {
        // Single lock acquisition keeps the cascade one unit.
        let mut tables = self.tables();
        if !tables
            .logs
            .iter()
            .any(|log| log.user_id == user_id && log.id == log_id)
        {
            return Err(Error::LogNotFound(log_id.to_string()));
        }
        tables
            .breaks
            .retain(|b| !(b.user_id == user_id && b.time_log_id == log_id));
        tables
            .logs
            .retain(|log| !(log.user_id == user_id && log.id == log_id));
        Ok(())
    }

    async fn breaks_for_log(&self, user_id: &str, log_id: &str) -> Result<Vec<Break>, Error> {
        let tables = self.tables();
        let mut rows: Vec<Break> = tables
            .breaks
            .iter()
            .filter(|b| b.user_id == user_id && b.time_log_id == log_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        Ok(rows)
    }

    async fn find_open_break(
        &self,
        user_id: &str,
        log_id: &str,
    ) -> Result<Option<Break>, Error> {
        let tables = self.tables();
        Ok(tables
            .breaks
            .iter()
            .find(|b| b.user_id == user_id && b.time_log_id == log_id && b.is_active())
            .cloned())
    }

    async fn create_break(&self, break_record: &Break) -> Result<Break, Error> {
        let mut tables = self.tables();
        if break_record.is_active()
            && tables
                .breaks
                .iter()
                .any(|b| b.time_log_id == break_record.time_log_id && b.is_active())
        {
            return Err(Error::BreakAlreadyActive);
        }
        tables.breaks.push(break_record.clone());
        Ok(break_record.clone())
    }

    async fn update_break(&self, break_record: &Break) -> Result<Break, Error> {
        let mut tables = self.tables();
        let slot = tables
            .breaks
            .iter_mut()
            .find(|b| b.user_id == break_record.user_id && b.id == break_record.id)
            .ok_or_else(|| Error::LogNotFound(break_record.id.clone()))?;
        *slot = break_record.clone();
        Ok(break_record.clone())
    }

    async fn write_audit(&self, record: &AuditRecord) -> Result<(), Error> {
        self.tables().audits.push(record.clone());
        Ok(())
    }

    async fn list_audits(&self, user_id: &str) -> Result<Vec<AuditRecord>, Error> {
        let tables = self.tables();
        let mut rows: Vec<AuditRecord> = tables
            .audits
            .iter()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn utc(h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, min, 0).unwrap()
    }

    #[tokio::test]
    async fn second_open_log_is_rejected() {
        let store = MemoryLogStore::new();
        let first = TimeLog::open("u1".into(), utc(9, 0), utc(9, 0));
        store.create_log(&first).await.unwrap();

        let second = TimeLog::open("u1".into(), utc(10, 0), utc(10, 0));
        let err = store.create_log(&second).await.unwrap_err();
        assert!(matches!(err, Error::AlreadyCheckedIn));

        // A closed manual entry is not an open session.
        let manual = TimeLog::manual("u1".into(), utc(7, 0), utc(8, 0), utc(10, 0));
        store.create_log(&manual).await.unwrap();
    }

    #[tokio::test]
    async fn open_log_uniqueness_is_per_user() {
        let store = MemoryLogStore::new();
        store
            .create_log(&TimeLog::open("u1".into(), utc(9, 0), utc(9, 0)))
            .await
            .unwrap();
        store
            .create_log(&TimeLog::open("u2".into(), utc(9, 0), utc(9, 0)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn logs_in_range_are_newest_first_and_bounded() {
        let store = MemoryLogStore::new();
        let early = TimeLog::manual("u1".into(), utc(8, 0), utc(9, 0), utc(9, 0));
        let late = TimeLog::manual("u1".into(), utc(13, 0), utc(14, 0), utc(14, 0));
        let outside = TimeLog::manual("u1".into(), utc(20, 0), utc(21, 0), utc(21, 0));
        store.create_log(&early).await.unwrap();
        store.create_log(&late).await.unwrap();
        store.create_log(&outside).await.unwrap();

        let range = TimeRange::new(utc(7, 0), utc(18, 0));
        let rows = store.logs_in_range("u1", range).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, late.id);
        assert_eq!(rows[1].id, early.id);
    }

    #[tokio::test]
    async fn second_open_break_on_same_log_is_rejected() {
        let store = MemoryLogStore::new();
        let log = TimeLog::open("u1".into(), utc(9, 0), utc(9, 0));
        store.create_log(&log).await.unwrap();

        let first = Break::start("u1".into(), log.id.clone(), false, utc(10, 0), utc(10, 0));
        store.create_break(&first).await.unwrap();

        let second = Break::start("u1".into(), log.id.clone(), true, utc(10, 5), utc(10, 5));
        let err = store.create_break(&second).await.unwrap_err();
        assert!(matches!(err, Error::BreakAlreadyActive));
    }

    #[tokio::test]
    async fn delete_log_cascades_to_breaks() {
        let store = MemoryLogStore::new();
        let log = TimeLog::manual("u1".into(), utc(9, 0), utc(17, 0), utc(17, 0));
        store.create_log(&log).await.unwrap();
        let mut lunch = Break::start("u1".into(), log.id.clone(), false, utc(12, 0), utc(12, 0));
        lunch.finish(utc(12, 30), utc(12, 30));
        store.create_break(&lunch).await.unwrap();

        store.delete_log("u1", &log.id).await.unwrap();
        assert!(store.find_log("u1", &log.id).await.unwrap().is_none());
        assert!(store.breaks_for_log("u1", &log.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_unknown_log_reports_not_found() {
        let store = MemoryLogStore::new();
        let err = store.delete_log("u1", "missing").await.unwrap_err();
        assert!(matches!(err, Error::LogNotFound(_)));
    }

    #[tokio::test]
    async fn breaks_for_log_are_earliest_first() {
        let store = MemoryLogStore::new();
        let log = TimeLog::open("u1".into(), utc(9, 0), utc(9, 0));
        store.create_log(&log).await.unwrap();

        let mut afternoon = Break::start("u1".into(), log.id.clone(), false, utc(15, 0), utc(15, 0));
        afternoon.finish(utc(15, 10), utc(15, 10));
        store.create_break(&afternoon).await.unwrap();
        let mut morning = Break::start("u1".into(), log.id.clone(), false, utc(10, 30), utc(10, 30));
        morning.finish(utc(10, 45), utc(10, 45));
        store.create_break(&morning).await.unwrap();

        let rows = store.breaks_for_log("u1", &log.id).await.unwrap();
        assert_eq!(rows[0].id, morning.id);
        assert_eq!(rows[1].id, afternoon.id);
    }

    #[tokio::test]
    async fn clones_share_tables() {
        let store = MemoryLogStore::new();
        let view = store.clone();
        let log = TimeLog::open("u1".into(), utc(9, 0), utc(9, 0));
        store.create_log(&log).await.unwrap();
        assert!(view.find_open_log("u1").await.unwrap().is_some());
    }
}
