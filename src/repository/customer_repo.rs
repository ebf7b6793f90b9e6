// ==========================================
// 锯木厂经营管理系统 - 客户仓储
// ==========================================
// 职责: customer_contact 表 CRUD
// 红线: Repository 不含业务逻辑，唯一性校验在 API 层
// ==========================================

use crate::domain::customer::CustomerContact;
use crate::domain::types::format_datetime;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::get_datetime;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const CUSTOMER_COLUMNS: &str = "customer_id, name, email, phone, address, created_at, updated_at";

fn map_customer(row: &Row<'_>) -> SqliteResult<CustomerContact> {
    Ok(CustomerContact {
        customer_id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        address: row.get(4)?,
        created_at: get_datetime(row, 5)?,
        updated_at: get_datetime(row, 6)?,
    })
}

pub struct CustomerRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CustomerRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, customer: &CustomerContact) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO customer_contact (
                customer_id, name, email, phone, address, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                customer.customer_id,
                customer.name,
                customer.email,
                customer.phone,
                customer.address,
                format_datetime(&customer.created_at),
                format_datetime(&customer.updated_at),
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, customer_id: &str) -> RepositoryResult<Option<CustomerContact>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM customer_contact WHERE customer_id = ?1",
            CUSTOMER_COLUMNS
        );
        Ok(conn
            .query_row(&sql, params![customer_id], map_customer)
            .optional()?)
    }

    pub fn find_by_email(&self, email: &str) -> RepositoryResult<Option<CustomerContact>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM customer_contact WHERE email = ?1", CUSTOMER_COLUMNS);
        Ok(conn.query_row(&sql, params![email], map_customer).optional()?)
    }

    pub fn find_by_phone(&self, phone: &str) -> RepositoryResult<Option<CustomerContact>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM customer_contact WHERE phone = ?1", CUSTOMER_COLUMNS);
        Ok(conn.query_row(&sql, params![phone], map_customer).optional()?)
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<CustomerContact>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM customer_contact ORDER BY created_at ASC, name ASC",
            CUSTOMER_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let customers = stmt
            .query_map([], map_customer)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(customers)
    }

    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM customer_contact", [], |row| row.get(0))?)
    }

    /// 整行覆盖更新
    pub fn update(&self, customer: &CustomerContact) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE customer_contact
            SET name = ?2, email = ?3, phone = ?4, address = ?5, updated_at = ?6
            WHERE customer_id = ?1
            "#,
            params![
                customer.customer_id,
                customer.name,
                customer.email,
                customer.phone,
                customer.address,
                format_datetime(&customer.updated_at),
            ],
        )?;
        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "CustomerContact".to_string(),
                id: customer.customer_id.clone(),
            });
        }
        Ok(())
    }

    /// 删除客户，返回受影响行数
    pub fn delete(&self, customer_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Ok(conn.execute(
            "DELETE FROM customer_contact WHERE customer_id = ?1",
            params![customer_id],
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn repo() -> CustomerRepository {
        CustomerRepository::new(Arc::new(Mutex::new(open_in_memory().unwrap())))
    }

    #[test]
    fn test_insert_and_find() {
        let repo = repo();
        let c = CustomerContact::new("Oak & Co", "oak@example.com", "555-0101", None);
        repo.insert(&c).unwrap();

        assert_eq!(repo.find_by_id(&c.customer_id).unwrap(), Some(c.clone()));
        assert!(repo.find_by_email("oak@example.com").unwrap().is_some());
        assert!(repo.find_by_phone("555-0000").unwrap().is_none());
    }

    #[test]
    fn test_email_唯一约束() {
        let repo = repo();
        repo.insert(&CustomerContact::new("A", "dup@example.com", "1", None))
            .unwrap();
        let err = repo
            .insert(&CustomerContact::new("B", "dup@example.com", "2", None))
            .unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_update_不存在() {
        let repo = repo();
        let c = CustomerContact::new("Ghost", "ghost@example.com", "0", None);
        assert!(matches!(
            repo.update(&c),
            Err(RepositoryError::NotFound { .. })
        ));
    }
}
