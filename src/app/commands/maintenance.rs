use serde::Deserialize;

use crate::api::ApiError;
use crate::app::state::AppState;
use crate::domain::types::Role;

use super::common::{map_api_error, parse_datetime, run_blocking};

// ==========================================
// 设备维护相关命令
// ==========================================

#[derive(Debug, Deserialize)]
pub struct CreateMaintenanceLogRequest {
    pub equipment_id: String,
    pub details: String,
    pub scheduled_date: String,
    pub manager_id: String,
}

#[derive(Debug, Deserialize)]
pub struct LogMaintenanceRequest {
    pub equipment_id: String,
    pub description: String,
    pub maintenance_date: String,
    pub next_due_date: String,
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct MaintenanceLogIdRequest {
    pub log_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ListMaintenanceLogsRequest {
    #[serde(default)]
    pub sort_by: Option<String>,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMaintenanceLogRequest {
    pub log_id: String,
    pub status: String,
    pub actual_completion_date: String,
    #[serde(default)]
    pub notes: Option<String>,
}

pub async fn create_maintenance_log(state: &AppState, req: CreateMaintenanceLogRequest) -> Result<String, String> {
    let scheduled_date = parse_datetime(&req.scheduled_date)?;

    let api = state.maintenance_api.clone();
    run_blocking("cmd.create_maintenance_log", move || {
        api.create_maintenance_log(&req.equipment_id, &req.details, scheduled_date, &req.manager_id)
    })
    .await
}

pub async fn log_maintenance(state: &AppState, req: LogMaintenanceRequest) -> Result<String, String> {
    let maintenance_date = parse_datetime(&req.maintenance_date)?;
    let next_due_date = parse_datetime(&req.next_due_date)?;

    let api = state.maintenance_api.clone();
    run_blocking("cmd.log_maintenance", move || {
        api.log_maintenance(
            &req.equipment_id,
            &req.description,
            maintenance_date,
            next_due_date,
            &req.user_id,
        )
    })
    .await
}

pub async fn get_maintenance_log(state: &AppState, req: MaintenanceLogIdRequest) -> Result<String, String> {
    let api = state.maintenance_api.clone();
    run_blocking("cmd.get_maintenance_log", move || api.get_maintenance_log(&req.log_id)).await
}

/// 未知角色按无权限处理
pub async fn list_maintenance_logs(state: &AppState, req: ListMaintenanceLogsRequest) -> Result<String, String> {
    let role = Role::parse(&req.role).ok_or_else(|| {
        map_api_error(ApiError::PermissionDenied(format!("未知角色: {}", req.role)))
    })?;

    let api = state.maintenance_api.clone();
    run_blocking("cmd.list_maintenance_logs", move || {
        api.list_maintenance_logs(req.sort_by.as_deref(), role)
    })
    .await
}

pub async fn update_maintenance_log(state: &AppState, req: UpdateMaintenanceLogRequest) -> Result<String, String> {
    let completion = parse_datetime(&req.actual_completion_date)?;

    let api = state.maintenance_api.clone();
    run_blocking("cmd.update_maintenance_log", move || {
        api.update_maintenance_log(&req.log_id, &req.status, completion, req.notes.as_deref())
    })
    .await
}

pub async fn delete_maintenance_log(state: &AppState, req: MaintenanceLogIdRequest) -> Result<String, String> {
    let api = state.maintenance_api.clone();
    run_blocking("cmd.delete_maintenance_log", move || {
        api.delete_maintenance_log(&req.log_id)
    })
    .await
}
