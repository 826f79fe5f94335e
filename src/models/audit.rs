//! Append-only audit trail for deleted sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

use crate::models::breaks::Break;
use crate::models::time_log::{TimeLog, TimeLogWithBreaks};

pub const AUDIT_ACTION_DELETE: &str = "delete";

/// Immutable record of a deleted session.
///
/// Written strictly before the delete it documents; a failed write aborts
/// the delete.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub id: String,
    /// Id of the deleted session.
    pub log_id: String,
    pub user_id: String,
    pub action: String,
    pub deleted_at: DateTime<Utc>,
    pub deleted_by: String,
    /// Snapshot of the deleted session and its breaks.
    pub log_data: Json<Value>,
}

impl AuditRecord {
    /// Builds the audit record for a session about to be deleted.
    pub fn for_deleted_log(
        log: &TimeLog,
        breaks: &[Break],
        deleted_by: &str,
        now: DateTime<Utc>,
    ) -> serde_json::Result<Self> {
        let snapshot = TimeLogWithBreaks {
            log: log.clone(),
            breaks: breaks.to_vec(),
        };
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            log_id: log.id.clone(),
            user_id: log.user_id.clone(),
            action: AUDIT_ACTION_DELETE.to_string(),
            deleted_at: now,
            deleted_by: deleted_by.to_string(),
            log_data: Json(serde_json::to_value(&snapshot)?),
        })
    }
}
