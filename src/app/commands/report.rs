use serde::Deserialize;

use crate::app::state::AppState;
use crate::domain::report::ReportMetric;

use super::common::{parse_date, parse_optional_datetime, run_blocking};

// ==========================================
// 报表相关命令
// ==========================================

#[derive(Debug, Deserialize)]
pub struct ProductionReportRequest {
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub shift: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SalesReportRequest {
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub customer_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct YieldReportRequest {
    #[serde(default)]
    pub batch_id: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FetchReportsRequest {
    pub report_type: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveReportRequest {
    pub report_type: String,
    #[serde(default)]
    pub details: Vec<ReportMetric>,
}

pub async fn get_production_report(state: &AppState, req: ProductionReportRequest) -> Result<String, String> {
    let start = parse_date(&req.start_date)?;
    let end = parse_date(&req.end_date)?;

    let api = state.report_api.clone();
    run_blocking("cmd.get_production_report", move || {
        api.get_production_report(start, end, req.shift.as_deref(), req.product_type.as_deref())
    })
    .await
}

pub async fn get_sales_report(state: &AppState, req: SalesReportRequest) -> Result<String, String> {
    let start = parse_date(&req.start_date)?;
    let end = parse_date(&req.end_date)?;

    let api = state.report_api.clone();
    run_blocking("cmd.get_sales_report", move || {
        api.get_sales_report(start, end, req.customer_id.as_deref())
    })
    .await
}

pub async fn get_yield_report(state: &AppState, req: YieldReportRequest) -> Result<String, String> {
    let start = parse_optional_datetime(req.start_date.as_deref())?;
    let end = parse_optional_datetime(req.end_date.as_deref())?;

    let api = state.report_api.clone();
    run_blocking("cmd.get_yield_report", move || {
        api.get_yield_report(req.batch_id.as_deref(), start, end)
    })
    .await
}

pub async fn fetch_reports(state: &AppState, req: FetchReportsRequest) -> Result<String, String> {
    let api = state.report_api.clone();
    run_blocking("cmd.fetch_reports", move || api.fetch_reports(&req.report_type)).await
}

pub async fn save_report(state: &AppState, req: SaveReportRequest) -> Result<String, String> {
    let api = state.report_api.clone();
    run_blocking("cmd.save_report", move || {
        api.save_report(&req.report_type, req.details)
    })
    .await
}
