use serde::Deserialize;

use crate::app::state::AppState;
use crate::domain::types::Dimensions;

use super::common::run_blocking;

// ==========================================
// 报价相关命令
// ==========================================

#[derive(Debug, Deserialize)]
pub struct CreatePriceEstimateRequest {
    /// 规格标签，如 "2x4x8"
    pub dimensions: String,
    pub grade: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateQuoteRequest {
    pub customer_id: String,
    pub dimensions: Dimensions,
    pub grade: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct EstimateIdRequest {
    pub estimate_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePriceEstimateRequest {
    pub estimate_id: String,
    pub dimensions: Dimensions,
    pub grade: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct QuoteIdRequest {
    pub quote_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SetPriceRateRequest {
    pub dimensions: String,
    pub grade: String,
    pub price_rate: f64,
}

pub async fn create_price_estimate(state: &AppState, req: CreatePriceEstimateRequest) -> Result<String, String> {
    let api = state.pricing_api.clone();
    run_blocking("cmd.create_price_estimate", move || {
        api.create_price_estimate(&req.dimensions, &req.grade, req.quantity)
    })
    .await
}

pub async fn create_quote(state: &AppState, req: CreateQuoteRequest) -> Result<String, String> {
    let api = state.pricing_api.clone();
    run_blocking("cmd.create_quote", move || {
        api.create_quote(&req.customer_id, req.dimensions, &req.grade, req.quantity)
    })
    .await
}

pub async fn get_price_estimate(state: &AppState, req: EstimateIdRequest) -> Result<String, String> {
    let api = state.pricing_api.clone();
    run_blocking("cmd.get_price_estimate", move || api.get_price_estimate(&req.estimate_id)).await
}

pub async fn get_price_estimates(state: &AppState) -> Result<String, String> {
    let api = state.pricing_api.clone();
    run_blocking("cmd.get_price_estimates", move || api.get_price_estimates()).await
}

pub async fn update_price_estimate(state: &AppState, req: UpdatePriceEstimateRequest) -> Result<String, String> {
    let api = state.pricing_api.clone();
    run_blocking("cmd.update_price_estimate", move || {
        api.update_price_estimate(&req.estimate_id, req.dimensions, &req.grade, req.quantity)
    })
    .await
}

pub async fn delete_price_estimate(state: &AppState, req: EstimateIdRequest) -> Result<String, String> {
    let api = state.pricing_api.clone();
    run_blocking("cmd.delete_price_estimate", move || {
        api.delete_price_estimate(&req.estimate_id)
    })
    .await
}

pub async fn get_quote(state: &AppState, req: QuoteIdRequest) -> Result<String, String> {
    let api = state.pricing_api.clone();
    run_blocking("cmd.get_quote", move || api.get_quote(&req.quote_id)).await
}

pub async fn set_price_rate(state: &AppState, req: SetPriceRateRequest) -> Result<String, String> {
    let api = state.pricing_api.clone();
    run_blocking("cmd.set_price_rate", move || {
        api.set_price_rate(&req.dimensions, &req.grade, req.price_rate)
    })
    .await
}

pub async fn list_price_rates(state: &AppState) -> Result<String, String> {
    let api = state.pricing_api.clone();
    run_blocking("cmd.list_price_rates", move || api.list_price_rates()).await
}
