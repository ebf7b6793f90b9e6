use serde::Deserialize;

use crate::api::ApiError;
use crate::app::state::AppState;
use crate::domain::types::Role;
use crate::domain::User;

use super::common::{invalid_input, run_blocking};

// ==========================================
// 用户种子命令（用户由外部系统维护，此处仅用于录入）
// ==========================================

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub role: String,
}

pub async fn create_user(state: &AppState, req: CreateUserRequest) -> Result<String, String> {
    let role = Role::parse(&req.role).ok_or_else(|| invalid_input(format!("未知角色: {}", req.role)))?;
    if req.name.trim().is_empty() || req.email.trim().is_empty() {
        return Err(invalid_input("用户名与邮箱不能为空"));
    }

    let repo = state.user_repo.clone();
    run_blocking("cmd.create_user", move || {
        let user = User::new(req.name.trim(), req.email.trim(), role);
        repo.insert(&user).map_err(ApiError::from)?;
        Ok(user)
    })
    .await
}

pub async fn list_users(state: &AppState) -> Result<String, String> {
    let repo = state.user_repo.clone();
    run_blocking("cmd.list_users", move || repo.list_all().map_err(ApiError::from)).await
}
