use serde::Deserialize;

use crate::app::state::AppState;
use crate::domain::types::Dimensions;

use super::common::{parse_optional_datetime, run_blocking};

// ==========================================
// 下料 / 优化请求相关命令
// ==========================================

#[derive(Debug, Deserialize)]
pub struct CuttingInstructionsRequest {
    pub customer_id: String,
    pub dimensions: Vec<Dimensions>,
    pub quantity: i64,
    pub grade: String,
}

#[derive(Debug, Deserialize)]
pub struct OptimizationRequest {
    pub dimensions: Vec<Dimensions>,
    pub quantities: Vec<i64>,
    pub material_type: String,
    pub grade: String,
    pub operator_id: String,
}

#[derive(Debug, Deserialize)]
pub struct OptimizationIdRequest {
    pub optimization_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ListOptimizationsRequest {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

pub async fn get_cutting_instructions(state: &AppState, req: CuttingInstructionsRequest) -> Result<String, String> {
    let api = state.cutting_api.clone();
    run_blocking("cmd.get_cutting_instructions", move || {
        api.get_cutting_instructions(&req.customer_id, &req.dimensions, req.quantity, &req.grade)
    })
    .await
}

pub async fn create_optimization_request(state: &AppState, req: OptimizationRequest) -> Result<String, String> {
    let api = state.cutting_api.clone();
    run_blocking("cmd.create_optimization_request", move || {
        api.create_optimization_request(
            &req.dimensions,
            &req.quantities,
            &req.material_type,
            &req.grade,
            &req.operator_id,
        )
    })
    .await
}

pub async fn get_optimization_results(state: &AppState, req: OptimizationIdRequest) -> Result<String, String> {
    let api = state.cutting_api.clone();
    run_blocking("cmd.get_optimization_results", move || {
        api.get_optimization_results(&req.optimization_id)
    })
    .await
}

pub async fn list_optimizations(state: &AppState, req: ListOptimizationsRequest) -> Result<String, String> {
    let start = parse_optional_datetime(req.start_date.as_deref())?;
    let end = parse_optional_datetime(req.end_date.as_deref())?;

    let api = state.cutting_api.clone();
    run_blocking("cmd.list_optimizations", move || {
        api.list_optimizations(req.page, req.limit, start, end, req.user_id.as_deref())
    })
    .await
}

pub async fn delete_optimization_request(state: &AppState, req: OptimizationIdRequest) -> Result<String, String> {
    let api = state.cutting_api.clone();
    run_blocking("cmd.delete_optimization_request", move || {
        api.delete_optimization_request(&req.optimization_id)
    })
    .await
}
