// ==========================================
// 锯木厂经营管理系统 - 报价领域模型
// ==========================================
// PriceRate:     预设单价表 (规格标签 + 等级)
// PriceEstimate: 单条价格估算，可挂在某个报价单下
// Quote:         报价单，聚合多条估算
// ==========================================

use crate::domain::types::now_naive;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRate {
    pub dimensions: String,
    pub grade: String,
    pub price_rate: f64,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEstimate {
    pub estimate_id: String,
    pub dimensions: String, // 规范标签 LxWxH
    pub grade: String,
    pub quantity: i64,
    pub price_rate: f64,
    pub expected_profit: f64,
    pub quote_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl PriceEstimate {
    pub fn new(
        dimensions: &str,
        grade: &str,
        quantity: i64,
        price_rate: f64,
        expected_profit: f64,
    ) -> Self {
        let now = now_naive();
        Self {
            estimate_id: uuid::Uuid::new_v4().to_string(),
            dimensions: dimensions.to_string(),
            grade: grade.to_string(),
            quantity,
            price_rate,
            expected_profit,
            quote_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 行金额 = 单价 × 数量
    pub fn line_total(&self) -> f64 {
        self.price_rate * self.quantity as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub quote_id: String,
    pub customer_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Quote {
    pub fn new(customer_id: Option<&str>) -> Self {
        let now = now_naive();
        Self {
            quote_id: uuid::Uuid::new_v4().to_string(),
            customer_id: customer_id.map(|c| c.to_string()),
            created_at: now,
            updated_at: now,
        }
    }
}

/// 报价单 + 其下所有估算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteWithEstimates {
    #[serde(flatten)]
    pub quote: Quote,
    pub price_estimates: Vec<PriceEstimate>,
}

impl QuoteWithEstimates {
    pub fn total(&self) -> f64 {
        self.price_estimates.iter().map(PriceEstimate::line_total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_total() {
        let q = QuoteWithEstimates {
            quote: Quote::new(None),
            price_estimates: vec![
                PriceEstimate::new("2x4x8", "A", 10, 5.0, 0.0),
                PriceEstimate::new("2x6x8", "B", 4, 2.5, 2.0),
            ],
        };
        assert_eq!(q.total(), 60.0);
    }
}
