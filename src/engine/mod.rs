// ==========================================
// 锯木厂经营管理系统 - 引擎层
// ==========================================
// 职责: 定价与下料规则；单价表经 RateSource 注入
// ==========================================

pub mod cutting;
pub mod pricing;

pub use cutting::{plan_cuts, CuttingInstruction, CuttingPlan};
pub use pricing::{
    FlatRateStrategy, PriceQuote, PricingError, PricingRequest, PricingStrategy, RateSource,
    RateTableStrategy, VolumeGradeStrategy,
};
