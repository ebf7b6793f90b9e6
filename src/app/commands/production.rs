use serde::Deserialize;

use crate::api::NewProductionRecord;
use crate::app::state::AppState;
use crate::domain::types::Dimensions;

use super::common::run_blocking;

// ==========================================
// 生产记录相关命令
// ==========================================

#[derive(Debug, Deserialize)]
pub struct RecordProductionRequest {
    pub user_id: String,
    pub raw_material_id: String,
    pub finished_product_id: String,
    pub quantity_produced: i64,
    #[serde(default)]
    pub dimensions_list: Vec<Dimensions>,
    pub grade: String,
}

#[derive(Debug, Deserialize)]
pub struct ProductionRecordIdRequest {
    pub record_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductionRecordRequest {
    pub record_id: String,
    pub raw_material_id: String,
    pub finished_product_id: String,
    pub quantity_produced: i64,
    pub new_dimensions: String,
    pub new_grade: String,
}

pub async fn create_production_record(state: &AppState, req: NewProductionRecord) -> Result<String, String> {
    let api = state.production_api.clone();
    run_blocking("cmd.create_production_record", move || {
        api.create_production_record(&req)
    })
    .await
}

pub async fn record_production(state: &AppState, req: RecordProductionRequest) -> Result<String, String> {
    let api = state.production_api.clone();
    run_blocking("cmd.record_production", move || {
        api.record_production(
            &req.user_id,
            &req.raw_material_id,
            &req.finished_product_id,
            req.quantity_produced,
            &req.dimensions_list,
            &req.grade,
        )
    })
    .await
}

pub async fn get_production_record(state: &AppState, req: ProductionRecordIdRequest) -> Result<String, String> {
    let api = state.production_api.clone();
    run_blocking("cmd.get_production_record", move || {
        api.get_production_record(&req.record_id)
    })
    .await
}

pub async fn get_all_production_records(state: &AppState) -> Result<String, String> {
    let api = state.production_api.clone();
    run_blocking("cmd.get_all_production_records", move || {
        api.get_all_production_records()
    })
    .await
}

pub async fn update_production_record(state: &AppState, req: UpdateProductionRecordRequest) -> Result<String, String> {
    let api = state.production_api.clone();
    run_blocking("cmd.update_production_record", move || {
        api.update_production_record(
            &req.record_id,
            &req.raw_material_id,
            &req.finished_product_id,
            req.quantity_produced,
            &req.new_dimensions,
            &req.new_grade,
        )
    })
    .await
}

pub async fn delete_production_record(state: &AppState, req: ProductionRecordIdRequest) -> Result<String, String> {
    let api = state.production_api.clone();
    run_blocking("cmd.delete_production_record", move || {
        api.delete_production_record(&req.record_id)
    })
    .await
}
