// ==========================================
// 锯木厂经营管理系统 - 定价引擎
// ==========================================
// 三种互不兼容的定价模型，各自独立，不做合并:
// - RateTableStrategy:   预设单价表 (规格 + 等级) × 数量
// - FlatRateStrategy:    固定单价 × 数量，预期利润 = 金额 × 利润率
// - VolumeGradeStrategy: 基准价 × 体积 × 等级系数 × 数量
// ==========================================

use crate::domain::types::Dimensions;
use crate::repository::pricing_repo::PriceRateRepository;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::instrument;

/// 定价错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    #[error("No predefined rate available for dimensions={dimensions}, grade={grade}")]
    NoRateAvailable { dimensions: String, grade: String },

    #[error("数量必须大于0: {0}")]
    InvalidQuantity(i64),

    #[error("单价查询失败: {0}")]
    RateLookupFailed(String),
}

/// 定价输入
#[derive(Debug, Clone, PartialEq)]
pub struct PricingRequest {
    /// 查表用的规格标签（原样保留调用方输入）
    pub dimensions_label: String,
    pub dimensions: Dimensions,
    pub grade: String,
    pub quantity: i64,
}

impl PricingRequest {
    /// 由规格标签构造（标签无法解析时各分量按 1 计）
    pub fn from_label(label: &str, grade: &str, quantity: i64) -> Self {
        Self {
            dimensions_label: label.trim().to_string(),
            dimensions: Dimensions::parse(label).unwrap_or_default(),
            grade: grade.trim().to_string(),
            quantity,
        }
    }

    pub fn from_dimensions(dimensions: Dimensions, grade: &str, quantity: i64) -> Self {
        Self {
            dimensions_label: dimensions.label(),
            dimensions,
            grade: grade.trim().to_string(),
            quantity,
        }
    }
}

/// 定价结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub unit_rate: f64,
    pub total_price: f64,
    pub expected_profit: f64,
}

/// 定价策略
pub trait PricingStrategy {
    fn name(&self) -> &'static str;

    fn price(&self, request: &PricingRequest) -> Result<PriceQuote, PricingError>;
}

fn ensure_positive(quantity: i64) -> Result<f64, PricingError> {
    if quantity <= 0 {
        return Err(PricingError::InvalidQuantity(quantity));
    }
    Ok(quantity as f64)
}

// ==========================================
// 单价来源
// ==========================================

/// 预设单价来源 (规格标签, 等级) -> 单价
pub trait RateSource {
    fn lookup_rate(&self, dimensions: &str, grade: &str) -> Result<Option<f64>, PricingError>;
}

impl RateSource for PriceRateRepository {
    fn lookup_rate(&self, dimensions: &str, grade: &str) -> Result<Option<f64>, PricingError> {
        self.find(dimensions, grade)
            .map(|rate| rate.map(|r| r.price_rate))
            .map_err(|e| PricingError::RateLookupFailed(e.to_string()))
    }
}

impl RateSource for HashMap<(String, String), f64> {
    fn lookup_rate(&self, dimensions: &str, grade: &str) -> Result<Option<f64>, PricingError> {
        Ok(self
            .get(&(dimensions.to_string(), grade.to_string()))
            .copied())
    }
}

// ==========================================
// RateTableStrategy
// ==========================================
pub struct RateTableStrategy<'a, R: RateSource + ?Sized> {
    rates: &'a R,
}

impl<'a, R: RateSource + ?Sized> RateTableStrategy<'a, R> {
    pub fn new(rates: &'a R) -> Self {
        Self { rates }
    }
}

impl<R: RateSource + ?Sized> PricingStrategy for RateTableStrategy<'_, R> {
    fn name(&self) -> &'static str {
        "rate_table"
    }

    #[instrument(skip(self), fields(strategy = "rate_table"))]
    fn price(&self, request: &PricingRequest) -> Result<PriceQuote, PricingError> {
        let quantity = ensure_positive(request.quantity)?;
        let rate = self
            .rates
            .lookup_rate(&request.dimensions_label, &request.grade)?
            .ok_or_else(|| PricingError::NoRateAvailable {
                dimensions: request.dimensions_label.clone(),
                grade: request.grade.clone(),
            })?;

        Ok(PriceQuote {
            unit_rate: rate,
            total_price: rate * quantity,
            expected_profit: 0.0,
        })
    }
}

// ==========================================
// FlatRateStrategy
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct FlatRateStrategy {
    pub rate: f64,
    pub profit_margin: f64,
}

impl FlatRateStrategy {
    pub fn new(rate: f64, profit_margin: f64) -> Self {
        Self {
            rate,
            profit_margin,
        }
    }
}

impl PricingStrategy for FlatRateStrategy {
    fn name(&self) -> &'static str {
        "flat_rate"
    }

    fn price(&self, request: &PricingRequest) -> Result<PriceQuote, PricingError> {
        let quantity = ensure_positive(request.quantity)?;
        let total = quantity * self.rate;
        Ok(PriceQuote {
            unit_rate: self.rate,
            total_price: total,
            expected_profit: total * self.profit_margin,
        })
    }
}

// ==========================================
// VolumeGradeStrategy
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct VolumeGradeStrategy {
    pub base_price: f64,
}

impl VolumeGradeStrategy {
    pub fn new(base_price: f64) -> Self {
        Self { base_price }
    }

    /// 等级系数: A 1.1 / B 1.0 / 其他 0.9（区分大小写）
    pub fn grade_multiplier(grade: &str) -> f64 {
        match grade {
            "A" => 1.1,
            "B" => 1.0,
            _ => 0.9,
        }
    }
}

impl PricingStrategy for VolumeGradeStrategy {
    fn name(&self) -> &'static str {
        "volume_grade"
    }

    fn price(&self, request: &PricingRequest) -> Result<PriceQuote, PricingError> {
        let quantity = ensure_positive(request.quantity)?;
        let total = self.base_price
            * request.dimensions.volume()
            * Self::grade_multiplier(&request.grade)
            * quantity;
        Ok(PriceQuote {
            unit_rate: total / quantity,
            total_price: total,
            expected_profit: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_rate_table_查表() {
        let mut rates = HashMap::new();
        rates.insert(("2x4x8".to_string(), "A".to_string()), 5.0);
        let strategy = RateTableStrategy::new(&rates);

        let quote = strategy
            .price(&PricingRequest::from_label("2x4x8", "A", 10))
            .unwrap();
        assert!(approx(quote.total_price, 50.0));
        assert!(approx(quote.unit_rate, 5.0));

        let err = strategy
            .price(&PricingRequest::from_label("2x4x8", "C", 10))
            .unwrap_err();
        assert!(matches!(err, PricingError::NoRateAvailable { .. }));
    }

    #[test]
    fn test_flat_rate_利润() {
        let quote = FlatRateStrategy::new(2.5, 0.2)
            .price(&PricingRequest::from_label("2x4x8", "B", 100))
            .unwrap();
        assert!(approx(quote.total_price, 250.0));
        assert!(approx(quote.expected_profit, 100.0 * 2.5 * 0.2));
    }

    #[test]
    fn test_volume_grade_计算() {
        let request = PricingRequest::from_dimensions(Dimensions::new(2.0, 1.0, 1.0), "A", 3);
        let quote = VolumeGradeStrategy::new(50.0).price(&request).unwrap();
        assert!(approx(quote.total_price, 50.0 * 2.0 * 1.1 * 3.0));
        assert!(approx(quote.unit_rate, 50.0 * 2.0 * 1.1));

        let other = VolumeGradeStrategy::new(50.0)
            .price(&PricingRequest::from_dimensions(Dimensions::default(), "Z", 1))
            .unwrap();
        assert!(approx(other.total_price, 45.0));
    }

    #[test]
    fn test_grade_multiplier_精确匹配() {
        assert!(approx(VolumeGradeStrategy::grade_multiplier("A"), 1.1));
        assert!(approx(VolumeGradeStrategy::grade_multiplier("B"), 1.0));
        assert!(approx(VolumeGradeStrategy::grade_multiplier("a"), 0.9));
        assert!(approx(VolumeGradeStrategy::grade_multiplier(" B"), 0.9));
    }

    #[test]
    fn test_数量非正() {
        let err = FlatRateStrategy::new(2.5, 0.2)
            .price(&PricingRequest::from_label("2x4x8", "A", 0))
            .unwrap_err();
        assert_eq!(err, PricingError::InvalidQuantity(0));
    }
}
