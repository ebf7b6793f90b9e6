// ==========================================
// 锯木厂经营管理系统 - 下料指令生成
// ==========================================
// 非真实排样优化: 每个规格一条指令，损耗率取配置常量
// ==========================================

use crate::domain::types::Dimensions;
use serde::{Deserialize, Serialize};

pub const CUT_DESCRIPTION: &str = "Cut these dimensions to minimize offcuts";

/// 固定的估算利用率提示
pub const UTILIZATION_NOTE: &str = "Estimated utilization 95% based on standard cutting patterns";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuttingInstruction {
    pub length: f64,
    pub width: f64,
    pub cut_count: i64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuttingPlan {
    pub instructions: Vec<CuttingInstruction>,
    pub total_materials_used: i64,
    pub expected_waste_percentage: f64,
}

/// 每个规格各切 quantity 件
///
/// 总用料数溢出 i64 时返回 None
pub fn plan_cuts(dimensions: &[Dimensions], quantity: i64, waste_ratio: f64) -> Option<CuttingPlan> {
    let instructions = dimensions
        .iter()
        .map(|d| CuttingInstruction {
            length: d.length.unwrap_or(1.0),
            width: d.width.unwrap_or(1.0),
            cut_count: quantity,
            description: CUT_DESCRIPTION.to_string(),
        })
        .collect::<Vec<_>>();

    let total_materials_used = i64::try_from(instructions.len())
        .ok()
        .and_then(|count| quantity.checked_mul(count))?;

    Some(CuttingPlan {
        total_materials_used,
        instructions,
        expected_waste_percentage: waste_ratio * 100.0,
    })
}

/// 预期出材率 = 预期利润 / 单价 × 100（单价为 0 时返回 0）
pub fn expected_yield_percentage(expected_profit: f64, price_rate: f64) -> f64 {
    if price_rate == 0.0 {
        return 0.0;
    }
    expected_profit / price_rate * 100.0
}
