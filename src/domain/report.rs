// ==========================================
// 锯木厂经营管理系统 - 报表模型
// ==========================================
// Report:  持久化的报表快照 (content 为 JSON 数组)
// 其余为只读聚合结果
// ==========================================

use crate::domain::types::now_naive;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 报表指标行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetric {
    pub metric: String,
    pub value: f64,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub report_id: String,
    pub report_type: String,
    pub details: Vec<ReportMetric>,
    pub created_at: NaiveDateTime,
}

impl Report {
    pub fn new(report_type: &str, details: Vec<ReportMetric>) -> Self {
        Self {
            report_id: uuid::Uuid::new_v4().to_string(),
            report_type: report_type.to_string(),
            details,
            created_at: now_naive(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionReportDetails {
    pub product_type: String,
    pub number_of_days: i64,
}

/// 生产报表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionReport {
    pub date: NaiveDate,
    pub shift: String,
    pub total_volume: i64,
    pub yield_percentage: f64,
    pub additional_details: ProductionReportDetails,
}

/// 销售报表：按客户聚合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSales {
    pub customer_id: String,
    pub total_revenue: f64,
    pub sales_dates: Vec<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_revenue: f64,
    pub customers: Vec<CustomerSales>,
}

/// 出材率报表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldReport {
    pub batch_id: String,
    pub raw_material_used: i64,
    pub finished_product_output: i64,
    pub yield_percentage: f64,
}
