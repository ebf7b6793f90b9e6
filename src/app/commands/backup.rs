use serde::Deserialize;

use crate::app::state::AppState;

use super::common::{parse_optional_date, run_blocking};

// ==========================================
// 备份 / 恢复相关命令
// ==========================================

#[derive(Debug, Default, Deserialize)]
pub struct RecoveryLogsRequest {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

pub async fn start_backup(state: &AppState) -> Result<String, String> {
    let api = state.backup_api.clone();
    run_blocking("cmd.start_backup", move || api.start_backup()).await
}

pub async fn backup_data(state: &AppState) -> Result<String, String> {
    let api = state.backup_api.clone();
    run_blocking("cmd.backup_data", move || api.backup_data()).await
}

pub async fn get_backup_status(state: &AppState) -> Result<String, String> {
    let api = state.backup_api.clone();
    run_blocking("cmd.get_backup_status", move || api.get_backup_status()).await
}

pub async fn start_recovery(state: &AppState) -> Result<String, String> {
    let api = state.backup_api.clone();
    run_blocking("cmd.start_recovery", move || api.start_recovery()).await
}

pub async fn get_recovery_logs(state: &AppState, req: RecoveryLogsRequest) -> Result<String, String> {
    let start = parse_optional_date(req.start_date.as_deref())?;
    let end = parse_optional_date(req.end_date.as_deref())?;

    let api = state.backup_api.clone();
    run_blocking("cmd.get_recovery_logs", move || api.get_recovery_logs(start, end)).await
}
