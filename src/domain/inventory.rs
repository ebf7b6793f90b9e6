// ==========================================
// 锯木厂经营管理系统 - 库存领域模型
// ==========================================
// 原材料 (raw_material) 与 成品 (finished_product) 两张独立表
// 红线: 数量不得为负
// ==========================================

use crate::domain::types::{now_naive, InventoryKind};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 成品未定级时的默认等级
pub const DEFAULT_GRADE: &str = "UNGRADED";

// ==========================================
// RawMaterial - 原材料
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMaterial {
    pub raw_material_id: String,
    pub material_type: String, // 类型标签（树种/规格）
    pub quantity: i64,
    pub unit: String,
    pub dimensions: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl RawMaterial {
    pub fn new(material_type: &str, quantity: i64, unit: &str, dimensions: Option<&str>) -> Self {
        let now = now_naive();
        Self {
            raw_material_id: uuid::Uuid::new_v4().to_string(),
            material_type: material_type.to_string(),
            quantity,
            unit: unit.to_string(),
            dimensions: dimensions.map(|d| d.to_string()),
            created_at: now,
            updated_at: now,
        }
    }
}

// ==========================================
// FinishedProduct - 成品
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishedProduct {
    pub finished_product_id: String,
    pub product_type: String,
    pub quantity: i64,
    pub unit: String,
    pub grade: String,
    pub dimensions: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl FinishedProduct {
    pub fn new(
        product_type: &str,
        quantity: i64,
        unit: &str,
        grade: Option<&str>,
        dimensions: Option<&str>,
    ) -> Self {
        let now = now_naive();
        Self {
            finished_product_id: uuid::Uuid::new_v4().to_string(),
            product_type: product_type.to_string(),
            quantity,
            unit: unit.to_string(),
            grade: grade.unwrap_or(DEFAULT_GRADE).to_string(),
            dimensions: dimensions.map(|d| d.to_string()),
            created_at: now,
            updated_at: now,
        }
    }
}

// ==========================================
// InventoryItem - 两种库存的统一视图
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "item_type", content = "details")]
pub enum InventoryItem {
    RawMaterial(RawMaterial),
    FinishedProduct(FinishedProduct),
}

impl InventoryItem {
    pub fn kind(&self) -> InventoryKind {
        match self {
            InventoryItem::RawMaterial(_) => InventoryKind::RawMaterial,
            InventoryItem::FinishedProduct(_) => InventoryKind::FinishedProduct,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            InventoryItem::RawMaterial(r) => &r.raw_material_id,
            InventoryItem::FinishedProduct(f) => &f.finished_product_id,
        }
    }

    pub fn type_label(&self) -> &str {
        match self {
            InventoryItem::RawMaterial(r) => &r.material_type,
            InventoryItem::FinishedProduct(f) => &f.product_type,
        }
    }

    pub fn quantity(&self) -> i64 {
        match self {
            InventoryItem::RawMaterial(r) => r.quantity,
            InventoryItem::FinishedProduct(f) => f.quantity,
        }
    }

    pub fn unit(&self) -> &str {
        match self {
            InventoryItem::RawMaterial(r) => &r.unit,
            InventoryItem::FinishedProduct(f) => &f.unit,
        }
    }

    pub fn dimensions(&self) -> Option<&str> {
        match self {
            InventoryItem::RawMaterial(r) => r.dimensions.as_deref(),
            InventoryItem::FinishedProduct(f) => f.dimensions.as_deref(),
        }
    }

    /// 原材料无等级
    pub fn grade(&self) -> Option<&str> {
        match self {
            InventoryItem::RawMaterial(_) => None,
            InventoryItem::FinishedProduct(f) => Some(&f.grade),
        }
    }
}
