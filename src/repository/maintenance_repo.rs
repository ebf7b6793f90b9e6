// ==========================================
// 锯木厂经营管理系统 - 维护日志仓储
// ==========================================

use crate::domain::maintenance::MaintenanceLog;
use crate::domain::types::{format_datetime, MaintenanceSortKey};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::get_datetime;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const LOG_COLUMNS: &str = "log_id, user_id, equipment_id, description, maintenance_date, next_due_date, created_at, updated_at";

fn map_log(row: &Row<'_>) -> SqliteResult<MaintenanceLog> {
    Ok(MaintenanceLog {
        log_id: row.get(0)?,
        user_id: row.get(1)?,
        equipment_id: row.get(2)?,
        description: row.get(3)?,
        maintenance_date: get_datetime(row, 4)?,
        next_due_date: get_datetime(row, 5)?,
        created_at: get_datetime(row, 6)?,
        updated_at: get_datetime(row, 7)?,
    })
}

pub struct MaintenanceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MaintenanceRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, log: &MaintenanceLog) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO maintenance_log (
                log_id, user_id, equipment_id, description, maintenance_date, next_due_date,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                log.log_id,
                log.user_id,
                log.equipment_id,
                log.description,
                format_datetime(&log.maintenance_date),
                format_datetime(&log.next_due_date),
                format_datetime(&log.created_at),
                format_datetime(&log.updated_at),
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, log_id: &str) -> RepositoryResult<Option<MaintenanceLog>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM maintenance_log WHERE log_id = ?1", LOG_COLUMNS);
        Ok(conn.query_row(&sql, params![log_id], map_log).optional()?)
    }

    /// 列表查询；sort_key 为 None 时按写入顺序
    pub fn list(&self, sort_key: Option<MaintenanceSortKey>) -> RepositoryResult<Vec<MaintenanceLog>> {
        let conn = self.get_conn()?;
        // 排序列来自封闭枚举，不接受外部字符串
        let order_by = match sort_key {
            Some(key) => format!("{} ASC, log_id ASC", key.column()),
            None => "created_at ASC, log_id ASC".to_string(),
        };
        let sql = format!("SELECT {} FROM maintenance_log ORDER BY {}", LOG_COLUMNS, order_by);
        let mut stmt = conn.prepare(&sql)?;
        let logs = stmt
            .query_map([], map_log)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(logs)
    }

    /// 维护日期落在区间内的日志（两端可选，闭区间）
    pub fn list_between(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> RepositoryResult<Vec<MaintenanceLog>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT {} FROM maintenance_log
            WHERE (?1 IS NULL OR maintenance_date >= ?1)
              AND (?2 IS NULL OR maintenance_date <= ?2)
            ORDER BY maintenance_date ASC, log_id ASC
            "#,
            LOG_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let logs = stmt
            .query_map(
                params![
                    start.as_ref().map(format_datetime),
                    end.as_ref().map(format_datetime)
                ],
                map_log,
            )?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(logs)
    }

    /// 完工回写: description + next_due_date
    pub fn update_completion(
        &self,
        log_id: &str,
        description: &str,
        next_due_date: NaiveDateTime,
        updated_at: NaiveDateTime,
    ) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Ok(conn.execute(
            "UPDATE maintenance_log SET description = ?2, next_due_date = ?3, updated_at = ?4 WHERE log_id = ?1",
            params![
                log_id,
                description,
                format_datetime(&next_due_date),
                format_datetime(&updated_at)
            ],
        )?)
    }

    pub fn delete(&self, log_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Ok(conn.execute("DELETE FROM maintenance_log WHERE log_id = ?1", params![log_id])?)
    }
}
