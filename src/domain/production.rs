// ==========================================
// 锯木厂经营管理系统 - 生产记录
// ==========================================
// 引用: 操作员(User) + 原材料(RawMaterial) + 成品(FinishedProduct)
// 外键由数据库约束保证
// ==========================================

use crate::domain::inventory::{FinishedProduct, RawMaterial};
use crate::domain::types::now_naive;
use crate::domain::user::User;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    pub record_id: String,
    pub user_id: String,
    pub raw_material_id: String,
    pub finished_product_id: String,
    pub quantity_produced: i64,
    pub dimensions: String,
    pub grade: String,
    pub shift: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ProductionRecord {
    pub fn new(
        user_id: &str,
        raw_material_id: &str,
        finished_product_id: &str,
        quantity_produced: i64,
        dimensions: &str,
        grade: &str,
        shift: Option<&str>,
    ) -> Self {
        let now = now_naive();
        Self {
            record_id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            raw_material_id: raw_material_id.to_string(),
            finished_product_id: finished_product_id.to_string(),
            quantity_produced,
            dimensions: dimensions.to_string(),
            grade: grade.to_string(),
            shift: shift.map(|s| s.to_string()),
            created_at: now,
            updated_at: now,
        }
    }
}

/// 生产记录 + 关联实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionRecordDetail {
    #[serde(flatten)]
    pub record: ProductionRecord,
    pub user: Option<User>,
    pub raw_material: Option<RawMaterial>,
    pub finished_product: Option<FinishedProduct>,
}
