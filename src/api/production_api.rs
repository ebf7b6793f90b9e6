// ==========================================
// 锯木厂经营管理系统 - 生产记录 API
// ==========================================
// 职责: 生产记录的登记 / 查询 / 修正 / 删除
// 两种登记入口:
// - create_production_record: 不预检引用，外键失败直接报错
// - record_production:        逐项预检引用，缺失时软失败
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::error::{ApiError, ApiResult};
use crate::api::response::{require_non_empty, require_positive, OperationStatus};
use crate::domain::production::{ProductionRecord, ProductionRecordDetail};
use crate::domain::types::{now_naive, Dimensions};
use crate::repository::{InventoryRepository, ProductionRepository, UserRepository};

pub const MSG_RECORD_CREATED: &str = "Production record created successfully!";
pub const MSG_RECORD_NOT_FOUND: &str = "No production record found with the given ID.";
pub const MSG_NO_USER: &str = "No user found with provided UserId.";
pub const MSG_NO_RAW_MATERIAL: &str = "No raw material found with provided RawMaterialId.";
pub const MSG_NO_FINISHED_PRODUCT: &str = "No finished product found with provided FinishedProductId.";

/// 新建生产记录入参
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProductionRecord {
    pub user_id: String,
    pub raw_material_id: String,
    pub finished_product_id: String,
    pub quantity_produced: i64,
    pub dimensions: String,
    pub grade: String,
    #[serde(default)]
    pub shift: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProductionResponse {
    pub confirmation_message: String,
    pub record_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordProductionResponse {
    pub success: bool,
    /// 失败时为空串
    pub production_record_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateProductionResponse {
    pub record_id: String,
    pub raw_material_type: String,
    pub finished_product_type: String,
    pub quantity_produced: i64,
    pub new_dimensions: String,
    pub new_grade: String,
}

// ==========================================
// ProductionApi - 生产记录 API
// ==========================================
pub struct ProductionApi {
    production_repo: Arc<ProductionRepository>,
    inventory_repo: Arc<InventoryRepository>,
    user_repo: Arc<UserRepository>,
}

impl ProductionApi {
    pub fn new(
        production_repo: Arc<ProductionRepository>,
        inventory_repo: Arc<InventoryRepository>,
        user_repo: Arc<UserRepository>,
    ) -> Self {
        Self {
            production_repo,
            inventory_repo,
            user_repo,
        }
    }

    /// 登记生产记录（引用由外键约束校验）
    ///
    /// # 返回
    /// - Err(ApiError::ConstraintViolation): 操作员 / 原材料 / 成品不存在
    #[instrument(skip(self))]
    pub fn create_production_record(
        &self,
        input: &NewProductionRecord,
    ) -> ApiResult<CreateProductionResponse> {
        require_positive("产量", input.quantity_produced)?;

        let record = ProductionRecord::new(
            &input.user_id,
            &input.raw_material_id,
            &input.finished_product_id,
            input.quantity_produced,
            &input.dimensions,
            &input.grade,
            input.shift.as_deref(),
        );
        self.production_repo.insert(&record)?;

        tracing::info!(record_id = %record.record_id, "生产记录已创建");
        Ok(CreateProductionResponse {
            confirmation_message: MSG_RECORD_CREATED.to_string(),
            record_id: record.record_id,
        })
    }

    /// 登记生产记录（逐项预检引用）
    ///
    /// 多个规格以逗号拼接存入 dimensions 列
    #[instrument(skip(self))]
    pub fn record_production(
        &self,
        user_id: &str,
        raw_material_id: &str,
        finished_product_id: &str,
        quantity_produced: i64,
        dimensions_list: &[Dimensions],
        grade: &str,
    ) -> ApiResult<RecordProductionResponse> {
        require_positive("产量", quantity_produced)?;

        let failed = |message: &str| RecordProductionResponse {
            success: false,
            production_record_id: String::new(),
            message: message.to_string(),
        };

        if self.user_repo.find_by_id(user_id)?.is_none() {
            tracing::warn!(user_id, "登记生产失败: 操作员不存在");
            return Ok(failed(MSG_NO_USER));
        }
        if self.inventory_repo.find_raw(raw_material_id)?.is_none() {
            tracing::warn!(raw_material_id, "登记生产失败: 原材料不存在");
            return Ok(failed(MSG_NO_RAW_MATERIAL));
        }
        if self.inventory_repo.find_finished(finished_product_id)?.is_none() {
            tracing::warn!(finished_product_id, "登记生产失败: 成品不存在");
            return Ok(failed(MSG_NO_FINISHED_PRODUCT));
        }

        let dimensions = dimensions_list
            .iter()
            .map(Dimensions::label)
            .collect::<Vec<_>>()
            .join(",");
        let record = ProductionRecord::new(
            user_id,
            raw_material_id,
            finished_product_id,
            quantity_produced,
            &dimensions,
            grade,
            None,
        );
        if let Err(e) = self.production_repo.insert(&record) {
            tracing::warn!(error = %e, "登记生产失败: 写入错误");
            return Ok(failed("Failed to record production data."));
        }

        tracing::info!(record_id = %record.record_id, "生产数据已登记");
        Ok(RecordProductionResponse {
            success: true,
            production_record_id: record.record_id,
            message: "Production data successfully recorded.".to_string(),
        })
    }

    /// 生产记录详情（含操作员 / 原材料 / 成品）
    pub fn get_production_record(&self, record_id: &str) -> ApiResult<ProductionRecordDetail> {
        require_non_empty("记录ID", record_id)?;
        let record = self
            .production_repo
            .find_by_id(record_id)?
            .ok_or_else(|| ApiError::NotFound(MSG_RECORD_NOT_FOUND.to_string()))?;
        self.attach_references(record)
    }

    pub fn get_all_production_records(&self) -> ApiResult<Vec<ProductionRecordDetail>> {
        self.production_repo
            .list_all()?
            .into_iter()
            .map(|record| self.attach_references(record))
            .collect()
    }

    fn attach_references(&self, record: ProductionRecord) -> ApiResult<ProductionRecordDetail> {
        let user = self.user_repo.find_by_id(&record.user_id)?;
        let raw_material = self.inventory_repo.find_raw(&record.raw_material_id)?;
        let finished_product = self.inventory_repo.find_finished(&record.finished_product_id)?;
        Ok(ProductionRecordDetail {
            record,
            user,
            raw_material,
            finished_product,
        })
    }

    /// 修正生产记录
    ///
    /// 新规格同步写入关联的原材料与成品，新等级同步写入成品
    #[instrument(skip(self))]
    pub fn update_production_record(
        &self,
        record_id: &str,
        raw_material_id: &str,
        finished_product_id: &str,
        quantity_produced: i64,
        new_dimensions: &str,
        new_grade: &str,
    ) -> ApiResult<UpdateProductionResponse> {
        require_positive("产量", quantity_produced)?;

        let mut record = self
            .production_repo
            .find_by_id(record_id)?
            .ok_or_else(|| ApiError::NotFound(MSG_RECORD_NOT_FOUND.to_string()))?;

        record.raw_material_id = raw_material_id.to_string();
        record.finished_product_id = finished_product_id.to_string();
        record.quantity_produced = quantity_produced;
        record.dimensions = new_dimensions.to_string();
        record.grade = new_grade.to_string();
        record.updated_at = now_naive();
        self.production_repo.update(&record)?;

        self.inventory_repo
            .update_raw_dimensions(raw_material_id, new_dimensions)?;
        self.inventory_repo
            .update_finished_spec(finished_product_id, new_dimensions, new_grade)?;

        let raw = self.inventory_repo.find_raw(raw_material_id)?.ok_or_else(|| {
            ApiError::NotFound(format!("RawMaterial(id={})不存在", raw_material_id))
        })?;
        let finished = self
            .inventory_repo
            .find_finished(finished_product_id)?
            .ok_or_else(|| {
                ApiError::NotFound(format!("FinishedProduct(id={})不存在", finished_product_id))
            })?;

        tracing::info!(record_id, "生产记录已更新");
        Ok(UpdateProductionResponse {
            record_id: record.record_id,
            raw_material_type: raw.material_type,
            finished_product_type: finished.product_type,
            quantity_produced,
            new_dimensions: new_dimensions.to_string(),
            new_grade: new_grade.to_string(),
        })
    }

    /// 删除生产记录（任何失败均为软失败）
    #[instrument(skip(self))]
    pub fn delete_production_record(&self, record_id: &str) -> ApiResult<OperationStatus> {
        match self.production_repo.delete(record_id) {
            Ok(0) => Ok(OperationStatus::failed(MSG_RECORD_NOT_FOUND)),
            Ok(_) => {
                tracing::info!(record_id, "生产记录已删除");
                Ok(OperationStatus::ok(format!(
                    "Production record with ID {} was successfully deleted.",
                    record_id
                )))
            }
            Err(e) => {
                tracing::warn!(record_id, error = %e, "删除生产记录失败");
                Ok(OperationStatus::failed(e.to_string()))
            }
        }
    }
}
