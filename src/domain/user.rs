// ==========================================
// 锯木厂经营管理系统 - 系统用户
// ==========================================
// 用户由外部系统维护，这里只承载查询结果
// ==========================================

use crate::domain::types::{now_naive, Role};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: NaiveDateTime,
}

impl User {
    pub fn new(name: &str, email: &str, role: Role) -> Self {
        Self {
            user_id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            created_at: now_naive(),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}
