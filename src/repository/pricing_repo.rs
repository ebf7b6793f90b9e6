// ==========================================
// 锯木厂经营管理系统 - 报价相关仓储
// ==========================================
// PriceRateRepository:     price_rate 预设单价表
// PriceEstimateRepository: price_estimate 表
// QuoteRepository:         quote 表
// ==========================================

use crate::domain::pricing::{PriceEstimate, PriceRate, Quote, QuoteWithEstimates};
use crate::domain::types::{format_datetime, now_naive};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::get_datetime;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// PriceRateRepository - 预设单价
// ==========================================
pub struct PriceRateRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PriceRateRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增或覆盖 (dimensions, grade) 的单价
    pub fn upsert(&self, dimensions: &str, grade: &str, price_rate: f64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO price_rate (dimensions, grade, price_rate, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(dimensions, grade) DO UPDATE SET
                price_rate = excluded.price_rate,
                updated_at = excluded.updated_at
            "#,
            params![dimensions, grade, price_rate, format_datetime(&now_naive())],
        )?;
        Ok(())
    }

    /// 精确匹配 (规格标签, 等级)
    pub fn find(&self, dimensions: &str, grade: &str) -> RepositoryResult<Option<PriceRate>> {
        let conn = self.get_conn()?;
        Ok(conn
            .query_row(
                "SELECT dimensions, grade, price_rate, updated_at FROM price_rate WHERE dimensions = ?1 AND grade = ?2",
                params![dimensions, grade],
                map_rate,
            )
            .optional()?)
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<PriceRate>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT dimensions, grade, price_rate, updated_at FROM price_rate ORDER BY dimensions, grade",
        )?;
        let rates = stmt
            .query_map([], map_rate)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rates)
    }
}

fn map_rate(row: &Row<'_>) -> SqliteResult<PriceRate> {
    Ok(PriceRate {
        dimensions: row.get(0)?,
        grade: row.get(1)?,
        price_rate: row.get(2)?,
        updated_at: get_datetime(row, 3)?,
    })
}

// ==========================================
// PriceEstimateRepository - 价格估算
// ==========================================
const ESTIMATE_COLUMNS: &str = "estimate_id, dimensions, grade, quantity, price_rate, expected_profit, quote_id, created_at, updated_at";

fn map_estimate(row: &Row<'_>) -> SqliteResult<PriceEstimate> {
    Ok(PriceEstimate {
        estimate_id: row.get(0)?,
        dimensions: row.get(1)?,
        grade: row.get(2)?,
        quantity: row.get(3)?,
        price_rate: row.get(4)?,
        expected_profit: row.get(5)?,
        quote_id: row.get(6)?,
        created_at: get_datetime(row, 7)?,
        updated_at: get_datetime(row, 8)?,
    })
}

pub struct PriceEstimateRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PriceEstimateRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, estimate: &PriceEstimate) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO price_estimate (
                estimate_id, dimensions, grade, quantity, price_rate, expected_profit,
                quote_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                estimate.estimate_id,
                estimate.dimensions,
                estimate.grade,
                estimate.quantity,
                estimate.price_rate,
                estimate.expected_profit,
                estimate.quote_id,
                format_datetime(&estimate.created_at),
                format_datetime(&estimate.updated_at),
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, estimate_id: &str) -> RepositoryResult<Option<PriceEstimate>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM price_estimate WHERE estimate_id = ?1",
            ESTIMATE_COLUMNS
        );
        Ok(conn
            .query_row(&sql, params![estimate_id], map_estimate)
            .optional()?)
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<PriceEstimate>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM price_estimate ORDER BY created_at ASC, estimate_id ASC",
            ESTIMATE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], map_estimate)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn list_by_quote(&self, quote_id: &str) -> RepositoryResult<Vec<PriceEstimate>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM price_estimate WHERE quote_id = ?1 ORDER BY created_at ASC, estimate_id ASC",
            ESTIMATE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![quote_id], map_estimate)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 更新规格/等级/数量/单价
    pub fn update(&self, estimate: &PriceEstimate) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE price_estimate
            SET dimensions = ?2, grade = ?3, quantity = ?4, price_rate = ?5,
                expected_profit = ?6, updated_at = ?7
            WHERE estimate_id = ?1
            "#,
            params![
                estimate.estimate_id,
                estimate.dimensions,
                estimate.grade,
                estimate.quantity,
                estimate.price_rate,
                estimate.expected_profit,
                format_datetime(&estimate.updated_at),
            ],
        )?;
        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "PriceEstimate".to_string(),
                id: estimate.estimate_id.clone(),
            });
        }
        Ok(())
    }

    /// 挂到报价单下
    pub fn attach_to_quote(&self, estimate_id: &str, quote_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "UPDATE price_estimate SET quote_id = ?2, updated_at = ?3 WHERE estimate_id = ?1",
            params![estimate_id, quote_id, format_datetime(&now_naive())],
        )?;
        Ok(())
    }

    /// 删除估算，返回受影响行数
    pub fn delete(&self, estimate_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Ok(conn.execute(
            "DELETE FROM price_estimate WHERE estimate_id = ?1",
            params![estimate_id],
        )?)
    }
}

// ==========================================
// QuoteRepository - 报价单
// ==========================================
fn map_quote(row: &Row<'_>) -> SqliteResult<Quote> {
    Ok(Quote {
        quote_id: row.get(0)?,
        customer_id: row.get(1)?,
        created_at: get_datetime(row, 2)?,
        updated_at: get_datetime(row, 3)?,
    })
}

pub struct QuoteRepository {
    conn: Arc<Mutex<Connection>>,
    estimate_repo: PriceEstimateRepository,
}

impl QuoteRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            estimate_repo: PriceEstimateRepository::new(conn.clone()),
            conn,
        }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, quote: &Quote) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO quote (quote_id, customer_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                quote.quote_id,
                quote.customer_id,
                format_datetime(&quote.created_at),
                format_datetime(&quote.updated_at),
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, quote_id: &str) -> RepositoryResult<Option<Quote>> {
        let conn = self.get_conn()?;
        Ok(conn
            .query_row(
                "SELECT quote_id, customer_id, created_at, updated_at FROM quote WHERE quote_id = ?1",
                params![quote_id],
                map_quote,
            )
            .optional()?)
    }

    /// 报价单 + 其下估算
    pub fn find_with_estimates(&self, quote_id: &str) -> RepositoryResult<Option<QuoteWithEstimates>> {
        let quote = match self.find_by_id(quote_id)? {
            Some(q) => q,
            None => return Ok(None),
        };
        let price_estimates = self.estimate_repo.list_by_quote(quote_id)?;
        Ok(Some(QuoteWithEstimates {
            quote,
            price_estimates,
        }))
    }

    pub fn list_by_customer(&self, customer_id: &str) -> RepositoryResult<Vec<QuoteWithEstimates>> {
        let quotes = {
            let conn = self.get_conn()?;
            let mut stmt = conn.prepare(
                "SELECT quote_id, customer_id, created_at, updated_at FROM quote WHERE customer_id = ?1 ORDER BY created_at ASC",
            )?;
            let rows = stmt
                .query_map(params![customer_id], map_quote)?
                .collect::<SqliteResult<Vec<_>>>()?;
            rows
        };

        let mut result = Vec::with_capacity(quotes.len());
        for quote in quotes {
            let price_estimates = self.estimate_repo.list_by_quote(&quote.quote_id)?;
            result.push(QuoteWithEstimates {
                quote,
                price_estimates,
            });
        }
        Ok(result)
    }
}
