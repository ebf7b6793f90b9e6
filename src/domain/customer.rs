// ==========================================
// 锯木厂经营管理系统 - 客户联系人
// ==========================================
// 约束: email / phone 全局唯一
// 对齐: customer_contact 表
// ==========================================

use crate::domain::types::now_naive;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerContact {
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl CustomerContact {
    pub fn new(name: &str, email: &str, phone: &str, address: Option<&str>) -> Self {
        let now = now_naive();
        Self {
            customer_id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            address: address.map(|a| a.to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    /// 对比并应用变更，返回实际发生变化的字段名
    ///
    /// address 只有在提供且与原值不同时才算变更
    pub fn apply_changes(
        &mut self,
        name: &str,
        email: &str,
        phone: &str,
        address: Option<&str>,
    ) -> Vec<String> {
        let mut changed = Vec::new();

        if self.name != name {
            self.name = name.to_string();
            changed.push("name".to_string());
        }
        if self.email != email {
            self.email = email.to_string();
            changed.push("email".to_string());
        }
        if self.phone != phone {
            self.phone = phone.to_string();
            changed.push("phone".to_string());
        }
        if let Some(addr) = address {
            if self.address.as_deref() != Some(addr) {
                self.address = Some(addr.to_string());
                changed.push("address".to_string());
            }
        }

        if !changed.is_empty() {
            self.updated_at = now_naive();
        }
        changed
    }
}
