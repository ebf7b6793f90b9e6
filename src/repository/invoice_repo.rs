// ==========================================
// 锯木厂经营管理系统 - 发票仓储
// ==========================================
// 职责: invoice + invoice_quote 关联表
// ==========================================

use crate::domain::invoice::Invoice;
use crate::domain::types::{format_date, format_datetime};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::{get_date, get_datetime};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const INVOICE_COLUMNS: &str =
    "invoice_id, customer_id, issue_date, due_date, total_amount, created_at, updated_at";

fn map_invoice(row: &Row<'_>) -> SqliteResult<Invoice> {
    Ok(Invoice {
        invoice_id: row.get(0)?,
        customer_id: row.get(1)?,
        issue_date: get_date(row, 2)?,
        due_date: get_date(row, 3)?,
        total_amount: row.get(4)?,
        created_at: get_datetime(row, 5)?,
        updated_at: get_datetime(row, 6)?,
    })
}

pub struct InvoiceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl InvoiceRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入发票及其报价关联
    pub fn insert(&self, invoice: &Invoice, quote_ids: &[String]) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO invoice (
                invoice_id, customer_id, issue_date, due_date, total_amount, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                invoice.invoice_id,
                invoice.customer_id,
                format_date(&invoice.issue_date),
                format_date(&invoice.due_date),
                invoice.total_amount,
                format_datetime(&invoice.created_at),
                format_datetime(&invoice.updated_at),
            ],
        )?;

        let mut stmt = conn.prepare(
            "INSERT OR IGNORE INTO invoice_quote (invoice_id, quote_id) VALUES (?1, ?2)",
        )?;
        for quote_id in quote_ids {
            stmt.execute(params![invoice.invoice_id, quote_id])?;
        }
        Ok(())
    }

    pub fn find_by_id(&self, invoice_id: &str) -> RepositoryResult<Option<Invoice>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM invoice WHERE invoice_id = ?1", INVOICE_COLUMNS);
        Ok(conn.query_row(&sql, params![invoice_id], map_invoice).optional()?)
    }

    pub fn list_quote_ids(&self, invoice_id: &str) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT quote_id FROM invoice_quote WHERE invoice_id = ?1 ORDER BY quote_id",
        )?;
        let ids = stmt
            .query_map(params![invoice_id], |row| row.get(0))?
            .collect::<SqliteResult<Vec<String>>>()?;
        Ok(ids)
    }

    pub fn list_by_customer(&self, customer_id: &str) -> RepositoryResult<Vec<Invoice>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM invoice WHERE customer_id = ?1 ORDER BY issue_date ASC, invoice_id ASC",
            INVOICE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![customer_id], map_invoice)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 开票日期落在 [start, end] 内的发票（可按客户过滤）
    pub fn list_issued_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        customer_id: Option<&str>,
    ) -> RepositoryResult<Vec<Invoice>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT {} FROM invoice
            WHERE issue_date >= ?1 AND issue_date <= ?2
              AND (?3 IS NULL OR customer_id = ?3)
            ORDER BY issue_date ASC, invoice_id ASC
            "#,
            INVOICE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(
                params![format_date(&start), format_date(&end), customer_id],
                map_invoice,
            )?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }
}
