use serde::Deserialize;

use crate::app::state::AppState;

use super::common::run_blocking;

// ==========================================
// 配置管理相关命令
// ==========================================

#[derive(Debug, Deserialize)]
pub struct ConfigKeyRequest {
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateConfigRequest {
    pub key: String,
    pub value: String,
}

pub async fn list_configs(state: &AppState) -> Result<String, String> {
    let api = state.config_api.clone();
    run_blocking("cmd.list_configs", move || api.list_configs()).await
}

pub async fn get_config(state: &AppState, req: ConfigKeyRequest) -> Result<String, String> {
    let api = state.config_api.clone();
    run_blocking("cmd.get_config", move || api.get_config(&req.key)).await
}

pub async fn update_config(state: &AppState, req: UpdateConfigRequest) -> Result<String, String> {
    let api = state.config_api.clone();
    run_blocking("cmd.update_config", move || api.update_config(&req.key, &req.value)).await
}
