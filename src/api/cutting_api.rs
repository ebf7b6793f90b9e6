// ==========================================
// 锯木厂经营管理系统 - 下料 / 优化请求 API
// ==========================================
// 下料指令为固定比例估算，不做真实排样
// 优化请求 = 按规格批量登记成品与生产记录
// ==========================================

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::error::{ApiError, ApiResult};
use crate::api::response::{require_non_empty, require_non_negative, OperationStatus};
use crate::config::ConfigManager;
use crate::domain::inventory::FinishedProduct;
use crate::domain::production::ProductionRecord;
use crate::domain::types::Dimensions;
use crate::domain::user::User;
use crate::engine::cutting::{expected_yield_percentage, plan_cuts, CuttingPlan, UTILIZATION_NOTE};
use crate::repository::{
    InventoryRepository, PriceEstimateRepository, ProductionFilter, ProductionRepository,
    UserRepository,
};

pub const STATUS_OPTIMIZED: &str = "Optimization Successful";
pub const STATUS_INSUFFICIENT: &str = "Failed: Insufficient Material";

/// 优化请求生成的成品计量单位
const OPTIMIZED_UNIT: &str = "unit";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResponse {
    pub request_id: String,
    pub status: String,
    pub production_record_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationDetails {
    pub optimization_id: String,
    pub cutting_instructions: String,
    pub material_utilization: String,
    pub expected_yield: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRecord {
    pub id: String,
    pub date_created: NaiveDateTime,
    pub created_by: Option<User>,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationPage {
    pub optimizations: Vec<OptimizationRecord>,
    pub total_records: i64,
    pub current_page: i64,
    pub total_pages: i64,
}

// ==========================================
// CuttingApi - 下料 / 优化请求 API
// ==========================================
pub struct CuttingApi {
    inventory_repo: Arc<InventoryRepository>,
    production_repo: Arc<ProductionRepository>,
    estimate_repo: Arc<PriceEstimateRepository>,
    user_repo: Arc<UserRepository>,
    config: Arc<ConfigManager>,
}

impl CuttingApi {
    pub fn new(
        inventory_repo: Arc<InventoryRepository>,
        production_repo: Arc<ProductionRepository>,
        estimate_repo: Arc<PriceEstimateRepository>,
        user_repo: Arc<UserRepository>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            inventory_repo,
            production_repo,
            estimate_repo,
            user_repo,
            config,
        }
    }

    /// 下料指令：每个规格一条，损耗率取配置
    ///
    /// `customer_id` 与 `grade` 只记录在追踪 span 中，不参与计算
    #[instrument(skip(self, dimensions), fields(dimension_count = dimensions.len()))]
    pub fn get_cutting_instructions(
        &self,
        customer_id: &str,
        dimensions: &[Dimensions],
        quantity: i64,
        grade: &str,
    ) -> ApiResult<CuttingPlan> {
        require_non_negative("数量", quantity)?;
        let waste_ratio = self.config.cutting_waste_ratio()?;
        plan_cuts(dimensions, quantity, waste_ratio).ok_or_else(|| {
            ApiError::InvalidInput(format!(
                "总用料数溢出: quantity={}, 规格数={}",
                quantity,
                dimensions.len()
            ))
        })
    }

    /// 发起优化请求
    ///
    /// 需存在同类型且库存 ≥ 总数量的原材料；否则返回 Insufficient 状态（不写入）。
    /// 原材料库存不扣减
    #[instrument(skip(self, dimensions, quantities))]
    pub fn create_optimization_request(
        &self,
        dimensions: &[Dimensions],
        quantities: &[i64],
        material_type: &str,
        grade: &str,
        operator_id: &str,
    ) -> ApiResult<OptimizationResponse> {
        require_non_empty("材料类型", material_type)?;
        if dimensions.len() != quantities.len() {
            return Err(ApiError::InvalidInput(format!(
                "规格数({})与数量数({})不一致",
                dimensions.len(),
                quantities.len()
            )));
        }
        for quantity in quantities {
            require_non_negative("数量", *quantity)?;
        }

        let request_id = uuid::Uuid::new_v4().to_string();
        let required = quantities
            .iter()
            .try_fold(0i64, |acc, q| acc.checked_add(*q))
            .ok_or_else(|| ApiError::InvalidInput("数量合计溢出".to_string()))?;

        let Some(raw) = self
            .inventory_repo
            .find_raw_with_stock(material_type, required)?
        else {
            tracing::warn!(material_type, required, "优化请求失败: 原材料不足");
            return Ok(OptimizationResponse {
                request_id,
                status: STATUS_INSUFFICIENT.to_string(),
                production_record_ids: Vec::new(),
            });
        };

        let mut production_record_ids = Vec::with_capacity(quantities.len());
        for (dims, quantity) in dimensions.iter().zip(quantities) {
            let label = dims.label();
            let product = FinishedProduct::new(
                material_type,
                *quantity,
                OPTIMIZED_UNIT,
                Some(grade),
                Some(&label),
            );
            self.inventory_repo.insert_finished(&product)?;

            let record = ProductionRecord::new(
                operator_id,
                &raw.raw_material_id,
                &product.finished_product_id,
                *quantity,
                &label,
                grade,
                None,
            );
            self.production_repo.insert(&record)?;
            production_record_ids.push(record.record_id);
        }

        tracing::info!(
            %request_id,
            raw_material_id = %raw.raw_material_id,
            records = production_record_ids.len(),
            "优化请求已处理"
        );
        Ok(OptimizationResponse {
            request_id,
            status: STATUS_OPTIMIZED.to_string(),
            production_record_ids,
        })
    }

    /// 优化结果（读取价格估算）
    pub fn get_optimization_results(&self, optimization_id: &str) -> ApiResult<OptimizationDetails> {
        let estimate = self
            .estimate_repo
            .find_by_id(optimization_id)?
            .ok_or_else(|| ApiError::NotFound("Optimization ID not found".to_string()))?;

        Ok(OptimizationDetails {
            optimization_id: estimate.estimate_id,
            cutting_instructions: format!(
                "Optimize cuts for dimensions {}, Grade: {}",
                estimate.dimensions, estimate.grade
            ),
            material_utilization: UTILIZATION_NOTE.to_string(),
            expected_yield: expected_yield_percentage(estimate.expected_profit, estimate.price_rate),
        })
    }

    /// 优化记录分页（基于生产记录）
    pub fn list_optimizations(
        &self,
        page: i64,
        limit: i64,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
        user_id: Option<&str>,
    ) -> ApiResult<OptimizationPage> {
        if page < 1 || limit < 1 {
            return Err(ApiError::InvalidInput(format!(
                "page 与 limit 必须 >= 1: page={}, limit={}",
                page, limit
            )));
        }

        let filter = ProductionFilter {
            start,
            end,
            user_id: user_id.map(|u| u.to_string()),
            raw_material_id: None,
        };
        let offset = (page - 1).checked_mul(limit).ok_or_else(|| {
            ApiError::InvalidInput(format!("分页偏移溢出: page={}, limit={}", page, limit))
        })?;
        let total_records = self.production_repo.count_filtered(&filter)?;
        let records = self.production_repo.list_page(&filter, offset, limit)?;

        let mut optimizations = Vec::with_capacity(records.len());
        for record in records {
            optimizations.push(OptimizationRecord {
                created_by: self.user_repo.find_by_id(&record.user_id)?,
                id: record.record_id,
                date_created: record.created_at,
                details: format!(
                    "Produced {} x {} (grade {})",
                    record.quantity_produced, record.dimensions, record.grade
                ),
            });
        }

        Ok(OptimizationPage {
            optimizations,
            total_records,
            current_page: page,
            total_pages: total_records / limit + i64::from(total_records % limit != 0),
        })
    }

    #[instrument(skip(self))]
    pub fn delete_optimization_request(&self, optimization_id: &str) -> ApiResult<OperationStatus> {
        match self.estimate_repo.delete(optimization_id) {
            Ok(0) => Ok(OperationStatus::failed("Optimization request not found.")),
            Ok(_) => {
                tracing::info!(optimization_id, "优化请求已删除");
                Ok(OperationStatus::ok("Optimization request deleted successfully."))
            }
            Err(e) => {
                tracing::warn!(optimization_id, error = %e, "删除优化请求失败");
                Ok(OperationStatus::failed(format!(
                    "An error occurred during deletion: {}",
                    e
                )))
            }
        }
    }
}
