// ==========================================
// 锯木厂经营管理系统 - 报价 API
// ==========================================
// 职责: 价格估算 / 报价单 / 单价表维护
// 策略: 估算走单价表，报价走固定单价，改价走体积等级
// ==========================================

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::error::{ApiError, ApiResult};
use crate::api::response::{require_non_empty, require_positive, OperationStatus};
use crate::config::ConfigManager;
use crate::domain::pricing::{PriceEstimate, PriceRate, Quote, QuoteWithEstimates};
use crate::domain::types::{now_naive, Dimensions};
use crate::engine::pricing::{
    FlatRateStrategy, PricingRequest, PricingStrategy, RateTableStrategy, VolumeGradeStrategy,
};
use crate::repository::{PriceEstimateRepository, PriceRateRepository, QuoteRepository};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEstimateResponse {
    pub estimated_price: f64,
    pub quote_id: String,
    pub estimate_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub quote_id: String,
    pub created_at: NaiveDateTime,
    pub price_estimate_details: PriceEstimate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePriceEstimateResponse {
    pub estimate_id: String,
    pub dimensions: String,
    pub grade: String,
    pub quantity: i64,
    pub new_price: f64,
    /// 未挂报价单时为空串
    pub quote_id: String,
}

// ==========================================
// PricingApi - 报价 API
// ==========================================
pub struct PricingApi {
    rate_repo: Arc<PriceRateRepository>,
    estimate_repo: Arc<PriceEstimateRepository>,
    quote_repo: Arc<QuoteRepository>,
    config: Arc<ConfigManager>,
}

impl PricingApi {
    pub fn new(
        rate_repo: Arc<PriceRateRepository>,
        estimate_repo: Arc<PriceEstimateRepository>,
        quote_repo: Arc<QuoteRepository>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            rate_repo,
            estimate_repo,
            quote_repo,
            config,
        }
    }

    /// 按单价表估价，并生成一张包含该估算的报价单
    ///
    /// # 返回
    /// - Err(ApiError::NoRateAvailable): 单价表中没有该 (规格, 等级)
    #[instrument(skip(self))]
    pub fn create_price_estimate(
        &self,
        dimensions: &str,
        grade: &str,
        quantity: i64,
    ) -> ApiResult<PriceEstimateResponse> {
        require_non_empty("规格", dimensions)?;
        require_non_empty("等级", grade)?;

        let request = PricingRequest::from_label(dimensions, grade, quantity);
        let strategy = RateTableStrategy::new(self.rate_repo.as_ref());
        let priced = strategy.price(&request)?;

        // 报价单先落库，估算携带 quote_id 写入
        let quote = Quote::new(None);
        self.quote_repo.insert(&quote)?;

        let mut estimate = PriceEstimate::new(
            &request.dimensions_label,
            &request.grade,
            quantity,
            priced.unit_rate,
            priced.expected_profit,
        );
        estimate.quote_id = Some(quote.quote_id.clone());
        self.estimate_repo.insert(&estimate)?;

        tracing::info!(
            quote_id = %quote.quote_id,
            estimate_id = %estimate.estimate_id,
            strategy = strategy.name(),
            total = priced.total_price,
            "价格估算已创建"
        );
        Ok(PriceEstimateResponse {
            estimated_price: priced.total_price,
            quote_id: quote.quote_id,
            estimate_id: estimate.estimate_id,
        })
    }

    /// 为客户生成报价单（固定单价）
    ///
    /// 写入顺序: 估算 -> 报价单 -> 关联；中途失败会留下孤立估算
    #[instrument(skip(self))]
    pub fn create_quote(
        &self,
        customer_id: &str,
        dimensions: Dimensions,
        grade: &str,
        quantity: i64,
    ) -> ApiResult<QuoteResponse> {
        require_non_empty("客户ID", customer_id)?;
        require_non_empty("等级", grade)?;

        let strategy = FlatRateStrategy::new(self.config.flat_rate()?, self.config.profit_margin()?);
        let request = PricingRequest::from_dimensions(dimensions, grade, quantity);
        let priced = strategy.price(&request)?;

        let mut estimate = PriceEstimate::new(
            &request.dimensions_label,
            &request.grade,
            quantity,
            priced.unit_rate,
            priced.expected_profit,
        );
        self.estimate_repo.insert(&estimate)?;

        let quote = Quote::new(Some(customer_id));
        self.quote_repo.insert(&quote)?;
        self.estimate_repo
            .attach_to_quote(&estimate.estimate_id, &quote.quote_id)?;
        estimate.quote_id = Some(quote.quote_id.clone());

        tracing::info!(quote_id = %quote.quote_id, customer_id, "报价单已创建");
        Ok(QuoteResponse {
            quote_id: quote.quote_id,
            created_at: quote.created_at,
            price_estimate_details: estimate,
        })
    }

    pub fn get_price_estimate(&self, estimate_id: &str) -> ApiResult<PriceEstimate> {
        self.estimate_repo
            .find_by_id(estimate_id)?
            .ok_or_else(|| ApiError::NotFound(format!("PriceEstimate(id={})不存在", estimate_id)))
    }

    pub fn get_price_estimates(&self) -> ApiResult<Vec<PriceEstimate>> {
        Ok(self.estimate_repo.list_all()?)
    }

    /// 按体积与等级重新估价
    ///
    /// price_rate 存为 new_price / quantity；expected_profit 保持不变
    #[instrument(skip(self))]
    pub fn update_price_estimate(
        &self,
        estimate_id: &str,
        dimensions: Dimensions,
        grade: &str,
        quantity: i64,
    ) -> ApiResult<UpdatePriceEstimateResponse> {
        require_positive("数量", quantity)?;

        let mut estimate = self.get_price_estimate(estimate_id)?;

        let strategy = VolumeGradeStrategy::new(self.config.volume_base_price()?);
        let request = PricingRequest::from_dimensions(dimensions, grade, quantity);
        let priced = strategy.price(&request)?;

        estimate.dimensions = request.dimensions_label;
        estimate.grade = request.grade;
        estimate.quantity = quantity;
        estimate.price_rate = priced.unit_rate;
        estimate.updated_at = now_naive();
        self.estimate_repo.update(&estimate)?;

        tracing::info!(estimate_id, new_price = priced.total_price, "价格估算已更新");
        Ok(UpdatePriceEstimateResponse {
            estimate_id: estimate.estimate_id,
            dimensions: estimate.dimensions,
            grade: estimate.grade,
            quantity,
            new_price: priced.total_price,
            quote_id: estimate.quote_id.unwrap_or_default(),
        })
    }

    #[instrument(skip(self))]
    pub fn delete_price_estimate(&self, estimate_id: &str) -> ApiResult<OperationStatus> {
        let deleted = self.estimate_repo.delete(estimate_id)?;
        if deleted == 0 {
            return Ok(OperationStatus::failed("Price estimate not found."));
        }
        Ok(OperationStatus::ok("Price estimate deleted successfully."))
    }

    pub fn get_quote(&self, quote_id: &str) -> ApiResult<QuoteWithEstimates> {
        self.quote_repo
            .find_with_estimates(quote_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Quote(id={})不存在", quote_id)))
    }

    // ==========================================
    // 单价表维护
    // ==========================================

    /// 写入或覆盖 (规格, 等级) 的单价
    #[instrument(skip(self))]
    pub fn set_price_rate(&self, dimensions: &str, grade: &str, price_rate: f64) -> ApiResult<PriceRate> {
        require_non_empty("规格", dimensions)?;
        require_non_empty("等级", grade)?;
        if !price_rate.is_finite() || price_rate < 0.0 {
            return Err(ApiError::InvalidInput(format!("单价无效: {}", price_rate)));
        }

        self.rate_repo.upsert(dimensions.trim(), grade.trim(), price_rate)?;
        self.rate_repo
            .find(dimensions.trim(), grade.trim())?
            .ok_or_else(|| ApiError::InternalError("单价写入后未能读回".to_string()))
    }

    pub fn list_price_rates(&self) -> ApiResult<Vec<PriceRate>> {
        Ok(self.rate_repo.list_all()?)
    }
}
