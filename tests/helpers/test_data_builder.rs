// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::NaiveDateTime;
use sawmill_ops::domain::inventory::{FinishedProduct, RawMaterial};
use sawmill_ops::domain::production::ProductionRecord;

// ==========================================
// RawMaterial 构建器
// ==========================================

pub struct RawMaterialBuilder {
    material_type: String,
    quantity: i64,
    unit: String,
    dimensions: Option<String>,
}

impl RawMaterialBuilder {
    pub fn new(material_type: &str) -> Self {
        Self {
            material_type: material_type.to_string(),
            quantity: 100,
            unit: "log".to_string(),
            dimensions: None,
        }
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn unit(mut self, unit: &str) -> Self {
        self.unit = unit.to_string();
        self
    }

    pub fn dimensions(mut self, dimensions: &str) -> Self {
        self.dimensions = Some(dimensions.to_string());
        self
    }

    pub fn build(self) -> RawMaterial {
        RawMaterial::new(
            &self.material_type,
            self.quantity,
            &self.unit,
            self.dimensions.as_deref(),
        )
    }
}

// ==========================================
// FinishedProduct 构建器
// ==========================================

pub struct FinishedProductBuilder {
    product_type: String,
    quantity: i64,
    unit: String,
    grade: Option<String>,
    dimensions: Option<String>,
}

impl FinishedProductBuilder {
    pub fn new(product_type: &str) -> Self {
        Self {
            product_type: product_type.to_string(),
            quantity: 50,
            unit: "board".to_string(),
            grade: None,
            dimensions: None,
        }
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn grade(mut self, grade: &str) -> Self {
        self.grade = Some(grade.to_string());
        self
    }

    pub fn dimensions(mut self, dimensions: &str) -> Self {
        self.dimensions = Some(dimensions.to_string());
        self
    }

    pub fn build(self) -> FinishedProduct {
        FinishedProduct::new(
            &self.product_type,
            self.quantity,
            &self.unit,
            self.grade.as_deref(),
            self.dimensions.as_deref(),
        )
    }
}

// ==========================================
// ProductionRecord 构建器
// ==========================================

pub struct ProductionRecordBuilder {
    user_id: String,
    raw_material_id: String,
    finished_product_id: String,
    quantity_produced: i64,
    dimensions: String,
    grade: String,
    shift: Option<String>,
    created_at: Option<NaiveDateTime>,
}

impl ProductionRecordBuilder {
    pub fn new(user_id: &str, raw_material_id: &str, finished_product_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            raw_material_id: raw_material_id.to_string(),
            finished_product_id: finished_product_id.to_string(),
            quantity_produced: 10,
            dimensions: "2x4x8".to_string(),
            grade: "A".to_string(),
            shift: None,
            created_at: None,
        }
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity_produced = quantity;
        self
    }

    pub fn grade(mut self, grade: &str) -> Self {
        self.grade = grade.to_string();
        self
    }

    pub fn shift(mut self, shift: &str) -> Self {
        self.shift = Some(shift.to_string());
        self
    }

    /// 指定创建时间（报表 / 备份状态测试用）
    pub fn created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn build(self) -> ProductionRecord {
        let mut record = ProductionRecord::new(
            &self.user_id,
            &self.raw_material_id,
            &self.finished_product_id,
            self.quantity_produced,
            &self.dimensions,
            &self.grade,
            self.shift.as_deref(),
        );
        if let Some(ts) = self.created_at {
            record.created_at = ts;
            record.updated_at = ts;
        }
        record
    }
}
