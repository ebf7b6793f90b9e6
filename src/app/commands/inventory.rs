use serde::Deserialize;

use crate::api::NewInventoryItem;
use crate::app::state::AppState;
use crate::domain::types::Dimensions;

use super::common::run_blocking;

// ==========================================
// 库存相关命令
// ==========================================

#[derive(Debug, Deserialize)]
pub struct InventoryItemIdRequest {
    pub item_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct InventoryListRequest {
    #[serde(default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateInventoryRequest {
    pub item_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
    pub item_type: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteInventoryRequest {
    pub item_id: String,
    pub item_type: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListInventoryRequest {
    #[serde(default)]
    pub material_type: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
}

pub async fn add_inventory_item(state: &AppState, req: NewInventoryItem) -> Result<String, String> {
    let api = state.inventory_api.clone();
    run_blocking("cmd.add_inventory_item", move || api.add_inventory_item(&req)).await
}

pub async fn get_inventory_item(state: &AppState, req: InventoryItemIdRequest) -> Result<String, String> {
    let api = state.inventory_api.clone();
    run_blocking("cmd.get_inventory_item", move || api.get_inventory_item(&req.item_id)).await
}

pub async fn get_inventory_list(state: &AppState, req: InventoryListRequest) -> Result<String, String> {
    let api = state.inventory_api.clone();
    run_blocking("cmd.get_inventory_list", move || {
        api.get_inventory_list(req.item_type.as_deref(), req.status.as_deref())
    })
    .await
}

pub async fn update_inventory_item(state: &AppState, req: UpdateInventoryRequest) -> Result<String, String> {
    let api = state.inventory_api.clone();
    run_blocking("cmd.update_inventory_item", move || {
        api.update_inventory_item(&req.item_id, req.quantity, req.dimensions, &req.item_type)
    })
    .await
}

pub async fn delete_inventory_item(state: &AppState, req: DeleteInventoryRequest) -> Result<String, String> {
    let api = state.inventory_api.clone();
    run_blocking("cmd.delete_inventory_item", move || {
        api.delete_inventory_item(&req.item_id, &req.item_type)
    })
    .await
}

pub async fn list_inventory(state: &AppState, req: ListInventoryRequest) -> Result<String, String> {
    let api = state.inventory_api.clone();
    run_blocking("cmd.list_inventory", move || {
        api.list_inventory(req.material_type.as_deref(), req.product_type.as_deref())
    })
    .await
}
