// ==========================================
// 锯木厂经营管理系统 - 库存仓储
// ==========================================
// 职责: raw_material / finished_product 两张表的 CRUD
// 按 InventoryKind 分派到对应的表
// ==========================================

use crate::domain::inventory::{FinishedProduct, InventoryItem, RawMaterial};
use crate::domain::types::{format_datetime, now_naive, InventoryKind};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::get_datetime;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const RAW_COLUMNS: &str =
    "raw_material_id, material_type, quantity, unit, dimensions, created_at, updated_at";
const FINISHED_COLUMNS: &str =
    "finished_product_id, product_type, quantity, unit, grade, dimensions, created_at, updated_at";

fn map_raw(row: &Row<'_>) -> SqliteResult<RawMaterial> {
    Ok(RawMaterial {
        raw_material_id: row.get(0)?,
        material_type: row.get(1)?,
        quantity: row.get(2)?,
        unit: row.get(3)?,
        dimensions: row.get(4)?,
        created_at: get_datetime(row, 5)?,
        updated_at: get_datetime(row, 6)?,
    })
}

fn map_finished(row: &Row<'_>) -> SqliteResult<FinishedProduct> {
    Ok(FinishedProduct {
        finished_product_id: row.get(0)?,
        product_type: row.get(1)?,
        quantity: row.get(2)?,
        unit: row.get(3)?,
        grade: row.get(4)?,
        dimensions: row.get(5)?,
        created_at: get_datetime(row, 6)?,
        updated_at: get_datetime(row, 7)?,
    })
}

/// 表名 / 主键列
fn table_of(kind: InventoryKind) -> (&'static str, &'static str) {
    match kind {
        InventoryKind::RawMaterial => ("raw_material", "raw_material_id"),
        InventoryKind::FinishedProduct => ("finished_product", "finished_product_id"),
    }
}

// ==========================================
// InventoryRepository - 库存仓储
// ==========================================
pub struct InventoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl InventoryRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 原材料
    // ==========================================

    pub fn insert_raw(&self, item: &RawMaterial) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO raw_material (
                raw_material_id, material_type, quantity, unit, dimensions, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                item.raw_material_id,
                item.material_type,
                item.quantity,
                item.unit,
                item.dimensions,
                format_datetime(&item.created_at),
                format_datetime(&item.updated_at),
            ],
        )?;
        Ok(())
    }

    pub fn find_raw(&self, id: &str) -> RepositoryResult<Option<RawMaterial>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM raw_material WHERE raw_material_id = ?1", RAW_COLUMNS);
        Ok(conn.query_row(&sql, params![id], map_raw).optional()?)
    }

    /// 按类型过滤原材料（None 表示不过滤）
    pub fn list_raw(&self, material_type: Option<&str>) -> RepositoryResult<Vec<RawMaterial>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM raw_material WHERE (?1 IS NULL OR material_type = ?1) ORDER BY created_at ASC, raw_material_id ASC",
            RAW_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map(params![material_type], map_raw)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(items)
    }

    /// 查找指定类型且数量不少于 min_quantity 的原材料
    pub fn find_raw_with_stock(
        &self,
        material_type: &str,
        min_quantity: i64,
    ) -> RepositoryResult<Option<RawMaterial>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM raw_material WHERE material_type = ?1 AND quantity >= ?2 ORDER BY quantity DESC LIMIT 1",
            RAW_COLUMNS
        );
        Ok(conn
            .query_row(&sql, params![material_type, min_quantity], map_raw)
            .optional()?)
    }

    // ==========================================
    // 成品
    // ==========================================

    pub fn insert_finished(&self, item: &FinishedProduct) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO finished_product (
                finished_product_id, product_type, quantity, unit, grade, dimensions,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                item.finished_product_id,
                item.product_type,
                item.quantity,
                item.unit,
                item.grade,
                item.dimensions,
                format_datetime(&item.created_at),
                format_datetime(&item.updated_at),
            ],
        )?;
        Ok(())
    }

    pub fn find_finished(&self, id: &str) -> RepositoryResult<Option<FinishedProduct>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM finished_product WHERE finished_product_id = ?1",
            FINISHED_COLUMNS
        );
        Ok(conn.query_row(&sql, params![id], map_finished).optional()?)
    }

    pub fn list_finished(
        &self,
        product_type: Option<&str>,
    ) -> RepositoryResult<Vec<FinishedProduct>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM finished_product WHERE (?1 IS NULL OR product_type = ?1) ORDER BY created_at ASC, finished_product_id ASC",
            FINISHED_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map(params![product_type], map_finished)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(items)
    }

    /// 成品: 推送新规格与等级（生产记录更新的联动）
    pub fn update_finished_spec(
        &self,
        id: &str,
        dimensions: &str,
        grade: &str,
    ) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Ok(conn.execute(
            "UPDATE finished_product SET dimensions = ?2, grade = ?3, updated_at = ?4 WHERE finished_product_id = ?1",
            params![id, dimensions, grade, format_datetime(&now_naive())],
        )?)
    }

    /// 原材料: 推送新规格
    pub fn update_raw_dimensions(&self, id: &str, dimensions: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Ok(conn.execute(
            "UPDATE raw_material SET dimensions = ?2, updated_at = ?3 WHERE raw_material_id = ?1",
            params![id, dimensions, format_datetime(&now_naive())],
        )?)
    }

    // ==========================================
    // 按种类分派的通用操作
    // ==========================================

    pub fn find(&self, kind: InventoryKind, id: &str) -> RepositoryResult<Option<InventoryItem>> {
        Ok(match kind {
            InventoryKind::RawMaterial => self.find_raw(id)?.map(InventoryItem::RawMaterial),
            InventoryKind::FinishedProduct => {
                self.find_finished(id)?.map(InventoryItem::FinishedProduct)
            }
        })
    }

    /// 依次在两张表中查找
    pub fn find_any(&self, id: &str) -> RepositoryResult<Option<InventoryItem>> {
        for kind in InventoryKind::ALL {
            if let Some(item) = self.find(kind, id)? {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    /// 更新数量（可选同时更新规格），返回受影响行数
    pub fn update_quantity(
        &self,
        kind: InventoryKind,
        id: &str,
        quantity: i64,
        dimensions: Option<&str>,
    ) -> RepositoryResult<usize> {
        let (table, pk) = table_of(kind);
        let conn = self.get_conn()?;
        let sql = format!(
            "UPDATE {table} SET quantity = ?2, dimensions = COALESCE(?3, dimensions), updated_at = ?4 WHERE {pk} = ?1"
        );
        Ok(conn.execute(
            &sql,
            params![id, quantity, dimensions, format_datetime(&now_naive())],
        )?)
    }

    pub fn delete(&self, kind: InventoryKind, id: &str) -> RepositoryResult<usize> {
        let (table, pk) = table_of(kind);
        let conn = self.get_conn()?;
        let sql = format!("DELETE FROM {table} WHERE {pk} = ?1");
        Ok(conn.execute(&sql, params![id])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn repo() -> InventoryRepository {
        InventoryRepository::new(Arc::new(Mutex::new(open_in_memory().unwrap())))
    }

    #[test]
    fn test_find_any_跨表查找() {
        let repo = repo();
        let raw = RawMaterial::new("Oak Log", 12, "pcs", None);
        let fin = FinishedProduct::new("Oak Plank", 3, "pcs", Some("A"), Some("2x4x8"));
        repo.insert_raw(&raw).unwrap();
        repo.insert_finished(&fin).unwrap();

        let found = repo.find_any(&fin.finished_product_id).unwrap().unwrap();
        assert_eq!(found.kind(), InventoryKind::FinishedProduct);
        assert_eq!(found.grade(), Some("A"));

        assert!(repo
            .find(InventoryKind::FinishedProduct, &raw.raw_material_id)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_负数量被拒绝() {
        let repo = repo();
        let raw = RawMaterial::new("Pine Log", 1, "pcs", None);
        repo.insert_raw(&raw).unwrap();
        let err = repo
            .update_quantity(InventoryKind::RawMaterial, &raw.raw_material_id, -1, None)
            .unwrap_err();
        assert!(matches!(err, RepositoryError::CheckConstraintViolation(_)));
    }

    #[test]
    fn test_update_quantity_保留规格() {
        let repo = repo();
        let fin = FinishedProduct::new("Beam", 3, "pcs", None, Some("4x4x10"));
        repo.insert_finished(&fin).unwrap();
        repo.update_quantity(InventoryKind::FinishedProduct, &fin.finished_product_id, 9, None)
            .unwrap();
        let reloaded = repo.find_finished(&fin.finished_product_id).unwrap().unwrap();
        assert_eq!(reloaded.quantity, 9);
        assert_eq!(reloaded.dimensions.as_deref(), Some("4x4x10"));
        assert_eq!(reloaded.grade, "UNGRADED");
    }
}
