//! PostgreSQL-backed log store.

use sqlx::PgPool;

use async_trait::async_trait;

use crate::error::Error;
use crate::models::{AuditRecord, Break, TimeLog};
use crate::repositories::log_store::LogStore;
use crate::utils::time::TimeRange;

/// [`LogStore`] over a PostgreSQL pool.
///
/// The schema lives in `migrations/`; open-session and open-break uniqueness
/// are enforced by partial unique indexes, so a lost insert race surfaces
/// here as the matching domain error.
#[derive(Clone)]
pub struct PgLogStore {
    pool: PgPool,
}

impl PgLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, Error> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    /// Applies pending migrations.
    pub async fn migrate(&self) -> Result<(), Error> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::StoreUnavailable(e.into()))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

const LOG_COLUMNS: &str =
    "id, user_id, check_in, check_out, is_manual_entry, created_at, updated_at";
const BREAK_COLUMNS: &str =
    "id, user_id, time_log_id, start_time, end_time, is_paid, status, duration_minutes, created_at, updated_at";
const AUDIT_COLUMNS: &str = "id, log_id, user_id, action, deleted_at, deleted_by, log_data";

#[async_trait]
impl LogStore for PgLogStore {
    async fn logs_in_range(&self, user_id: &str, range: TimeRange) -> Result<Vec<TimeLog>, Error> {
        let query = format!(
            "SELECT {} FROM time_logs \
             WHERE user_id = $1 AND check_in >= $2 AND check_in < $3 \
             ORDER BY check_in DESC",
            LOG_COLUMNS
        );
        let rows = sqlx::query_as::<_, TimeLog>(&query)
            .bind(user_id)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_log(&self, user_id: &str, log_id: &str) -> Result<Option<TimeLog>, Error> {
        let query = format!(
            "SELECT {} FROM time_logs WHERE user_id = $1 AND id = $2",
            LOG_COLUMNS
        );
        let row = sqlx::query_as::<_, TimeLog>(&query)
            .bind(user_id)
            .bind(log_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_open_log(&self, user_id: &str) -> Result<Option<TimeLog>, Error> {
        let query = format!(
            "SELECT {} FROM time_logs WHERE user_id = $1 AND check_out IS NULL",
            LOG_COLUMNS
        );
        let row = sqlx::query_as::<_, TimeLog>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_log(&self, log: &TimeLog) -> Result<TimeLog, Error> {
        let query = format!(
            "INSERT INTO time_logs (id, user_id, check_in, check_out, is_manual_entry, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {}",
            LOG_COLUMNS
        );
        let row = sqlx::query_as::<_, TimeLog>(&query)
            .bind(&log.id)
            .bind(&log.user_id)
            .bind(log.check_in)
            .bind(log.check_out)
            .bind(log.is_manual_entry)
            .bind(log.created_at)
            .bind(log.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| match &err {
                sqlx::Error::Database(db) if db.is_unique_violation() => Error::AlreadyCheckedIn,
                _ => Error::from(err),
            })?;
        Ok(row)
    }

    async fn update_log(&self, log: &TimeLog) -> Result<TimeLog, Error> {
        let query = format!(
            "UPDATE time_logs SET check_in = $3, check_out = $4, is_manual_entry = $5, updated_at = $6 \
             WHERE user_id = $1 AND id = $2 \
             RETURNING {}",
            LOG_COLUMNS
        );
        let row = sqlx::query_as::<_, TimeLog>(&query)
            .bind(&log.user_id)
            .bind(&log.id)
            .bind(log.check_in)
            .bind(log.check_out)
            .bind(log.is_manual_entry)
            .bind(log.updated_at)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::LogNotFound(log.id.clone()))?;
        Ok(row)
    }

    async fn delete_log(&self, user_id: &str, log_id: &str) -> Result<(), Error> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM breaks WHERE user_id = $1 AND time_log_id = $2")
            .bind(user_id)
            .bind(log_id)
            .execute(tx.as_mut())
            .await?;
        let result = sqlx::query("DELETE FROM time_logs WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(log_id)
            .execute(tx.as_mut())
            .await?;
        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(Error::LogNotFound(log_id.to_string()));
        }
        tx.commit().await?;
        Ok(())
    }

    async fn breaks_for_log(&self, user_id: &str, log_id: &str) -> Result<Vec<Break>, Error> {
        let query = format!(
            "SELECT {} FROM breaks \
             WHERE user_id = $1 AND time_log_id = $2 \
             ORDER BY start_time ASC",
            BREAK_COLUMNS
        );
        let rows = sqlx::query_as::<_, Break>(&query)
            .bind(user_id)
            .bind(log_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_open_break(
        &self,
        user_id: &str,
        log_id: &str,
    ) -> Result<Option<Break>, Error> {
        let query = format!(
            "SELECT {} FROM breaks \
             WHERE user_id = $1 AND time_log_id = $2 AND end_time IS NULL",
            BREAK_COLUMNS
        );
        let row = sqlx::query_as::<_, Break>(&query)
            .bind(user_id)
            .bind(log_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_break(&self, break_record: &Break) -> Result<Break, Error> {
        let query = format!(
            "INSERT INTO breaks (id, user_id, time_log_id, start_time, end_time, is_paid, status, duration_minutes, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {}",
            BREAK_COLUMNS
        );
        let row = sqlx::query_as::<_, Break>(&query)
            .bind(&break_record.id)
            .bind(&break_record.user_id)
            .bind(&break_record.time_log_id)
            .bind(break_record.start_time)
            .bind(break_record.end_time)
            .bind(break_record.is_paid)
            .bind(break_record.status.db_value())
            .bind(break_record.duration_minutes)
            .bind(break_record.created_at)
            .bind(break_record.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| match &err {
                sqlx::Error::Database(db) if db.is_unique_violation() => Error::BreakAlreadyActive,
                _ => Error::from(err),
            })?;
        Ok(row)
    }

    async fn update_break(&self, break_record: &Break) -> Result<Break, Error> {
        let query = format!(
            "UPDATE breaks SET start_time = $3, end_time = $4, is_paid = $5, status = $6, \
             duration_minutes = $7, updated_at = $8 \
             WHERE user_id = $1 AND id = $2 \
             RETURNING {}",
            BREAK_COLUMNS
        );
        let row = sqlx::query_as::<_, Break>(&query)
            .bind(&break_record.user_id)
            .bind(&break_record.id)
            .bind(break_record.start_time)
            .bind(break_record.end_time)
            .bind(break_record.is_paid)
            .bind(break_record.status.db_value())
            .bind(break_record.duration_minutes)
            .bind(break_record.updated_at)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::LogNotFound(break_record.id.clone()))?;
        Ok(row)
    }

    async fn write_audit(&self, record: &AuditRecord) -> Result<(), Error> {
        sqlx::query(
            "INSERT INTO audit_records (id, log_id, user_id, action, deleted_at, deleted_by, log_data) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&record.id)
        .bind(&record.log_id)
        .bind(&record.user_id)
        .bind(&record.action)
        .bind(record.deleted_at)
        .bind(&record.deleted_by)
        .bind(&record.log_data)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_audits(&self, user_id: &str) -> Result<Vec<AuditRecord>, Error> {
        let query = format!(
            "SELECT {} FROM audit_records WHERE user_id = $1 ORDER BY deleted_at DESC",
            AUDIT_COLUMNS
        );
        let rows = sqlx::query_as::<_, AuditRecord>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
