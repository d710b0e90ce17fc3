//! `SQLite` implementation of [`AuditLogSink`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use cardflow_app::ports::AuditLogSink;
use cardflow_domain::automation::{AutomationLog, LogStatus};
use cardflow_domain::error::BoardError;
use cardflow_domain::id::RuleId;

use crate::error::StorageError;
use crate::time;

struct Wrapper(AutomationLog);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let rule_id: String = row.try_get("rule_id")?;
        let status: String = row.try_get("status")?;
        let created_at: String = row.try_get("created_at")?;

        let status =
            LogStatus::from_str(&status).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(AutomationLog {
            id: id.into(),
            rule_id: rule_id.into(),
            status,
            message: row.try_get("message")?,
            created_at: time::decode(&created_at)?,
        }))
    }
}

/// `SQLite`-backed append-only audit log.
#[derive(Clone)]
pub struct SqliteAuditLog {
    pool: SqlitePool,
}

impl SqliteAuditLog {
    /// Create a new audit log backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl AuditLogSink for SqliteAuditLog {
    async fn append_log(
        &self,
        rule_id: &RuleId,
        status: LogStatus,
        message: &str,
    ) -> Result<AutomationLog, BoardError> {
        let log = AutomationLog::new(rule_id.clone(), status, message);

        sqlx::query(
            "INSERT INTO automation_logs (id, rule_id, status, message, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(log.id.as_str())
        .bind(log.rule_id.as_str())
        .bind(log.status.as_str())
        .bind(&log.message)
        .bind(time::encode(log.created_at))
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        Ok(log)
    }

    async fn find_by_rule(
        &self,
        rule_id: &RuleId,
        limit: usize,
    ) -> Result<Vec<AutomationLog>, BoardError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<Wrapper> = sqlx::query_as(
            "SELECT * FROM automation_logs WHERE rule_id = ? ORDER BY created_at DESC, rowid DESC LIMIT ?",
        )
        .bind(rule_id.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}
