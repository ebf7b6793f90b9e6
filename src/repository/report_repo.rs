// ==========================================
// 锯木厂经营管理系统 - 报表快照仓储
// ==========================================
// content 列存 JSON 数组: [{metric, value, timestamp}, ...]
// ==========================================

use crate::domain::report::{Report, ReportMetric};
use crate::domain::types::format_datetime;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::get_datetime;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

pub struct ReportRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ReportRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, report: &Report) -> RepositoryResult<()> {
        let content = serde_json::to_string(&report.details)
            .map_err(|e| RepositoryError::InternalError(format!("报表序列化失败: {}", e)))?;
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO report (report_id, report_type, content, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                report.report_id,
                report.report_type,
                content,
                format_datetime(&report.created_at),
            ],
        )?;
        Ok(())
    }

    /// 指定类型的最新一份报表
    pub fn find_latest_by_type(&self, report_type: &str) -> RepositoryResult<Option<Report>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                r#"
                SELECT report_id, report_type, content, created_at
                FROM report
                WHERE report_type = ?1
                ORDER BY created_at DESC, rowid DESC
                LIMIT 1
                "#,
                params![report_type],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        get_datetime(row, 3)?,
                    ))
                },
            )
            .optional()?;

        let Some((report_id, report_type, content, created_at)) = row else {
            return Ok(None);
        };

        let details: Vec<ReportMetric> =
            serde_json::from_str(&content).map_err(|e| RepositoryError::FieldValueError {
                field: "content".to_string(),
                message: e.to_string(),
            })?;

        Ok(Some(Report {
            report_id,
            report_type,
            details,
            created_at,
        }))
    }
}
