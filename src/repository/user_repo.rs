// ==========================================
// 锯木厂经营管理系统 - 用户仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::types::{format_datetime, Role};
use crate::domain::user::User;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::get_datetime;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const USER_COLUMNS: &str = "user_id, name, email, role, created_at";

fn map_user(row: &Row<'_>) -> SqliteResult<User> {
    let role_raw: String = row.get(3)?;
    let role = Role::parse(&role_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("未知角色: {}", role_raw).into(),
        )
    })?;
    Ok(User {
        user_id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        role,
        created_at: get_datetime(row, 4)?,
    })
}

// ==========================================
// UserRepository - 用户仓储
// ==========================================
pub struct UserRepository {
    conn: Arc<Mutex<Connection>>,
}

impl UserRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入用户（种子数据 / 测试准备）
    pub fn insert(&self, user: &User) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO user_account (user_id, name, email, role, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.user_id,
                user.name,
                user.email,
                user.role.as_str(),
                format_datetime(&user.created_at),
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, user_id: &str) -> RepositoryResult<Option<User>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM user_account WHERE user_id = ?1", USER_COLUMNS);
        Ok(conn.query_row(&sql, params![user_id], map_user).optional()?)
    }

    pub fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM user_account WHERE email = ?1", USER_COLUMNS);
        Ok(conn.query_row(&sql, params![email], map_user).optional()?)
    }

    /// 按创建顺序取第一个指定角色的用户
    pub fn find_first_by_role(&self, role: Role) -> RepositoryResult<Option<User>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM user_account WHERE role = ?1 ORDER BY created_at ASC, user_id ASC LIMIT 1",
            USER_COLUMNS
        );
        Ok(conn.query_row(&sql, params![role.as_str()], map_user).optional()?)
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<User>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM user_account ORDER BY created_at ASC", USER_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let users = stmt
            .query_map([], map_user)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(users)
    }
}
