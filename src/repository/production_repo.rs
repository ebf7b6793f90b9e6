// ==========================================
// 锯木厂经营管理系统 - 生产记录仓储
// ==========================================
// 职责: production_record 表 CRUD + 报表聚合查询
// ==========================================

use crate::domain::production::ProductionRecord;
use crate::domain::types::format_datetime;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::get_datetime;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const RECORD_COLUMNS: &str = "p.record_id, p.user_id, p.raw_material_id, p.finished_product_id, p.quantity_produced, p.dimensions, p.grade, p.shift, p.created_at, p.updated_at";

fn map_record(row: &Row<'_>) -> SqliteResult<ProductionRecord> {
    Ok(ProductionRecord {
        record_id: row.get(0)?,
        user_id: row.get(1)?,
        raw_material_id: row.get(2)?,
        finished_product_id: row.get(3)?,
        quantity_produced: row.get(4)?,
        dimensions: row.get(5)?,
        grade: row.get(6)?,
        shift: row.get(7)?,
        created_at: get_datetime(row, 8)?,
        updated_at: get_datetime(row, 9)?,
    })
}

/// 报表行: 生产记录 + 成品库存数量
#[derive(Debug, Clone)]
pub struct ProductionReportRow {
    pub record: ProductionRecord,
    pub finished_quantity: i64,
}

/// 分页/出材率查询的通用过滤条件（created_at 区间闭合）
#[derive(Debug, Clone, Default)]
pub struct ProductionFilter {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub user_id: Option<String>,
    pub raw_material_id: Option<String>,
}

impl ProductionFilter {
    const WHERE_CLAUSE: &'static str = r#"
        (?1 IS NULL OR p.created_at >= ?1)
        AND (?2 IS NULL OR p.created_at <= ?2)
        AND (?3 IS NULL OR p.user_id = ?3)
        AND (?4 IS NULL OR p.raw_material_id = ?4)
    "#;

    fn bind(&self) -> (Option<String>, Option<String>, Option<&str>, Option<&str>) {
        (
            self.start.as_ref().map(format_datetime),
            self.end.as_ref().map(format_datetime),
            self.user_id.as_deref(),
            self.raw_material_id.as_deref(),
        )
    }
}

// ==========================================
// ProductionRepository
// ==========================================
pub struct ProductionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductionRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, record: &ProductionRecord) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO production_record (
                record_id, user_id, raw_material_id, finished_product_id,
                quantity_produced, dimensions, grade, shift, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                record.record_id,
                record.user_id,
                record.raw_material_id,
                record.finished_product_id,
                record.quantity_produced,
                record.dimensions,
                record.grade,
                record.shift,
                format_datetime(&record.created_at),
                format_datetime(&record.updated_at),
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, record_id: &str) -> RepositoryResult<Option<ProductionRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM production_record p WHERE p.record_id = ?1",
            RECORD_COLUMNS
        );
        Ok(conn.query_row(&sql, params![record_id], map_record).optional()?)
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<ProductionRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM production_record p ORDER BY p.created_at ASC, p.record_id ASC",
            RECORD_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], map_record)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn update(&self, record: &ProductionRecord) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE production_record
            SET raw_material_id = ?2, finished_product_id = ?3, quantity_produced = ?4,
                dimensions = ?5, grade = ?6, updated_at = ?7
            WHERE record_id = ?1
            "#,
            params![
                record.record_id,
                record.raw_material_id,
                record.finished_product_id,
                record.quantity_produced,
                record.dimensions,
                record.grade,
                format_datetime(&record.updated_at),
            ],
        )?;
        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "ProductionRecord".to_string(),
                id: record.record_id.clone(),
            });
        }
        Ok(())
    }

    pub fn delete(&self, record_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Ok(conn.execute(
            "DELETE FROM production_record WHERE record_id = ?1",
            params![record_id],
        )?)
    }

    /// 最近一条生产记录的创建时间
    pub fn latest_created_at(&self) -> RepositoryResult<Option<NaiveDateTime>> {
        let conn = self.get_conn()?;
        let raw: Option<String> =
            conn.query_row("SELECT MAX(created_at) FROM production_record", [], |row| {
                row.get(0)
            })?;
        match raw {
            Some(s) => NaiveDateTime::parse_from_str(&s, crate::domain::types::DATETIME_FORMAT)
                .map(Some)
                .map_err(|e| RepositoryError::FieldValueError {
                    field: "created_at".to_string(),
                    message: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    // ==========================================
    // 报表查询
    // ==========================================

    /// 生产报表明细: created_at ∈ [start, end]，可按班次与成品类型过滤
    pub fn list_for_report(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        shift: Option<&str>,
        product_type: Option<&str>,
    ) -> RepositoryResult<Vec<ProductionReportRow>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT {}, f.quantity
            FROM production_record p
            JOIN finished_product f ON f.finished_product_id = p.finished_product_id
            WHERE p.created_at >= ?1 AND p.created_at <= ?2
              AND (?3 IS NULL OR p.shift = ?3)
              AND (?4 IS NULL OR f.product_type = ?4)
            ORDER BY p.created_at ASC
            "#,
            RECORD_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(
                params![
                    format_datetime(&start),
                    format_datetime(&end),
                    shift,
                    product_type
                ],
                |row| {
                    Ok(ProductionReportRow {
                        record: map_record(row)?,
                        finished_quantity: row.get(10)?,
                    })
                },
            )?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 出材率汇总: (产出合计, 关联原材料数量合计)
    ///
    /// 原材料按去重后的 raw_material_id 计数
    pub fn yield_totals(&self, filter: &ProductionFilter) -> RepositoryResult<(i64, i64)> {
        let conn = self.get_conn()?;
        let (start, end, user, raw) = filter.bind();

        let produced: i64 = conn.query_row(
            &format!(
                "SELECT COALESCE(SUM(p.quantity_produced), 0) FROM production_record p WHERE {}",
                ProductionFilter::WHERE_CLAUSE
            ),
            params![start, end, user, raw],
            |row| row.get(0),
        )?;

        let raw_used: i64 = conn.query_row(
            &format!(
                r#"
                SELECT COALESCE(SUM(r.quantity), 0) FROM raw_material r
                WHERE r.raw_material_id IN (
                    SELECT p.raw_material_id FROM production_record p WHERE {}
                )
                "#,
                ProductionFilter::WHERE_CLAUSE
            ),
            params![start, end, user, raw],
            |row| row.get(0),
        )?;

        Ok((produced, raw_used))
    }

    pub fn count_filtered(&self, filter: &ProductionFilter) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let (start, end, user, raw) = filter.bind();
        Ok(conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM production_record p WHERE {}",
                ProductionFilter::WHERE_CLAUSE
            ),
            params![start, end, user, raw],
            |row| row.get(0),
        )?)
    }

    /// 分页查询（按创建时间倒序）
    pub fn list_page(
        &self,
        filter: &ProductionFilter,
        offset: i64,
        limit: i64,
    ) -> RepositoryResult<Vec<ProductionRecord>> {
        let conn = self.get_conn()?;
        let (start, end, user, raw) = filter.bind();
        let sql = format!(
            "SELECT {} FROM production_record p WHERE {} ORDER BY p.created_at DESC, p.record_id ASC LIMIT ?5 OFFSET ?6",
            RECORD_COLUMNS,
            ProductionFilter::WHERE_CLAUSE
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![start, end, user, raw, limit, offset], map_record)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }
}
