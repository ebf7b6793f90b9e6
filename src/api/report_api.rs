// ==========================================
// 锯木厂经营管理系统 - 报表 API
// ==========================================
// 职责: 生产 / 销售 / 出材率只读聚合；报表快照的保存与读取
// ==========================================

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::error::{ApiError, ApiResult};
use crate::api::response::require_non_empty;
use crate::domain::report::{
    CustomerSales, ProductionReport, ProductionReportDetails, Report, ReportMetric, SalesReport,
    YieldReport,
};
use crate::repository::{InvoiceRepository, ProductionFilter, ProductionRepository, ReportRepository};

/// 报表快照读取结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchReportResponse {
    pub report_type: String,
    pub summary: String,
    pub details: Vec<ReportMetric>,
}

fn ensure_range(start: NaiveDate, end: NaiveDate) -> ApiResult<()> {
    if end < start {
        return Err(ApiError::InvalidInput(format!(
            "结束日期({})早于开始日期({})",
            end, start
        )));
    }
    Ok(())
}

fn day_start(d: NaiveDate) -> NaiveDateTime {
    d.and_hms_opt(0, 0, 0).unwrap_or_default()
}

fn day_end(d: NaiveDate) -> NaiveDateTime {
    d.and_hms_opt(23, 59, 59).unwrap_or_default()
}

// ==========================================
// ReportApi - 报表 API
// ==========================================
pub struct ReportApi {
    production_repo: Arc<ProductionRepository>,
    invoice_repo: Arc<InvoiceRepository>,
    report_repo: Arc<ReportRepository>,
}

impl ReportApi {
    pub fn new(
        production_repo: Arc<ProductionRepository>,
        invoice_repo: Arc<InvoiceRepository>,
        report_repo: Arc<ReportRepository>,
    ) -> Self {
        Self {
            production_repo,
            invoice_repo,
            report_repo,
        }
    }

    /// 生产报表
    ///
    /// 统计 [start_date, end_date] 内（按天闭区间）的生产记录；
    /// 出材率 = 各记录 产量 / 成品库存 × 100 的均值，只统计成品库存 > 0 的记录
    pub fn get_production_report(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        shift: Option<&str>,
        product_type: Option<&str>,
    ) -> ApiResult<ProductionReport> {
        ensure_range(start_date, end_date)?;

        let rows = self.production_repo.list_for_report(
            day_start(start_date),
            day_end(end_date),
            shift,
            product_type,
        )?;

        let total_volume: i64 = rows.iter().map(|r| r.record.quantity_produced).sum();
        let ratios: Vec<f64> = rows
            .iter()
            .filter(|r| r.finished_quantity > 0)
            .map(|r| r.record.quantity_produced as f64 / r.finished_quantity as f64 * 100.0)
            .collect();
        let yield_percentage = if ratios.is_empty() {
            0.0
        } else {
            ratios.iter().sum::<f64>() / ratios.len() as f64
        };

        tracing::debug!(records = rows.len(), total_volume, "生产报表已汇总");
        Ok(ProductionReport {
            date: start_date,
            shift: shift.unwrap_or("All Shifts").to_string(),
            total_volume,
            yield_percentage,
            additional_details: ProductionReportDetails {
                product_type: product_type.unwrap_or("All Types").to_string(),
                number_of_days: (end_date - start_date).num_days() + 1,
            },
        })
    }

    /// 销售报表：区间内开具的发票按客户聚合
    pub fn get_sales_report(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        customer_id: Option<&str>,
    ) -> ApiResult<SalesReport> {
        ensure_range(start_date, end_date)?;

        let invoices = self
            .invoice_repo
            .list_issued_between(start_date, end_date, customer_id)?;

        let mut by_customer: BTreeMap<String, CustomerSales> = BTreeMap::new();
        for invoice in &invoices {
            let entry = by_customer
                .entry(invoice.customer_id.clone())
                .or_insert_with(|| CustomerSales {
                    customer_id: invoice.customer_id.clone(),
                    total_revenue: 0.0,
                    sales_dates: Vec::new(),
                });
            entry.total_revenue += invoice.total_amount;
            entry.sales_dates.push(invoice.issue_date);
        }

        let customers: Vec<CustomerSales> = by_customer.into_values().collect();
        Ok(SalesReport {
            start_date,
            end_date,
            total_revenue: customers.iter().map(|c| c.total_revenue).sum(),
            customers,
        })
    }

    /// 出材率报表
    ///
    /// batch_id 即原材料ID；出材率 = 产出合计 / 关联原材料数量合计 × 100
    pub fn get_yield_report(
        &self,
        batch_id: Option<&str>,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> ApiResult<YieldReport> {
        let filter = ProductionFilter {
            start,
            end,
            user_id: None,
            raw_material_id: batch_id.map(|b| b.to_string()),
        };
        let (produced, raw_used) = self.production_repo.yield_totals(&filter)?;

        let yield_percentage = if raw_used == 0 {
            0.0
        } else {
            produced as f64 / raw_used as f64 * 100.0
        };

        Ok(YieldReport {
            batch_id: batch_id.unwrap_or("All").to_string(),
            raw_material_used: raw_used,
            finished_product_output: produced,
            yield_percentage,
        })
    }

    /// 读取某类型的最新报表快照
    pub fn fetch_reports(&self, report_type: &str) -> ApiResult<FetchReportResponse> {
        require_non_empty("报表类型", report_type)?;

        let response = match self.report_repo.find_latest_by_type(report_type)? {
            Some(report) => FetchReportResponse {
                report_type: report.report_type,
                summary: format!("Latest {} report", report_type),
                details: report.details,
            },
            None => FetchReportResponse {
                report_type: report_type.to_string(),
                summary: format!("No reports found for {}", report_type),
                details: Vec::new(),
            },
        };
        Ok(response)
    }

    /// 保存报表快照
    #[instrument(skip(self, details), fields(metrics = details.len()))]
    pub fn save_report(&self, report_type: &str, details: Vec<ReportMetric>) -> ApiResult<Report> {
        require_non_empty("报表类型", report_type)?;

        let report = Report::new(report_type.trim(), details);
        self.report_repo.insert(&report)?;

        tracing::info!(report_id = %report.report_id, report_type, "报表已保存");
        Ok(report)
    }
}
