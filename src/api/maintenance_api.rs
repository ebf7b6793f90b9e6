// ==========================================
// 锯木厂经营管理系统 - 设备维护 API
// ==========================================
// 职责: 维护日志登记 / 查询 / 完工回写 / 删除
// 权限:
// - create_maintenance_log 仅限 MAINTENANCE_MANAGER（软失败）
// - list_maintenance_logs  仅限 SYSTEM_ADMINISTRATOR / MAINTENANCE_MANAGER（报错）
// ==========================================

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::error::{ApiError, ApiResult};
use crate::api::response::{require_non_empty, OperationStatus};
use crate::domain::maintenance::MaintenanceLog;
use crate::domain::types::{now_naive, MaintenanceSortKey, Role};
use crate::repository::{MaintenanceRepository, UserRepository};

pub const STATUS_SUCCESS: &str = "Success";
pub const STATUS_UNAUTHORIZED: &str = "Failed: Unauthorized action or manager not found";
pub const MSG_LOG_NOT_FOUND: &str = "Maintenance log not found.";
pub const MSG_INVALID_COMPLETION: &str = "Invalid log ID or future completion date provided.";
pub const MSG_LOG_UPDATED: &str = "Maintenance log updated successfully.";
pub const MSG_NO_LOG_TO_DELETE: &str = "No maintenance log found with the given ID.";
pub const MSG_LOG_DELETED: &str = "Maintenance log deleted successfully.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateMaintenanceLogResponse {
    /// 失败时为空串
    pub log_id: String,
    pub equipment_id: String,
    pub details: String,
    pub scheduled_date: NaiveDateTime,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogMaintenanceResponse {
    pub success: bool,
    pub message: String,
    pub maintenance_log_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateMaintenanceLogResponse {
    pub success: bool,
    pub updated_log: Option<MaintenanceLog>,
    pub message: String,
}

// ==========================================
// MaintenanceApi - 设备维护 API
// ==========================================
pub struct MaintenanceApi {
    maintenance_repo: Arc<MaintenanceRepository>,
    user_repo: Arc<UserRepository>,
}

impl MaintenanceApi {
    pub fn new(maintenance_repo: Arc<MaintenanceRepository>, user_repo: Arc<UserRepository>) -> Self {
        Self {
            maintenance_repo,
            user_repo,
        }
    }

    /// 维护经理登记计划维护（next_due_date 取计划日期）
    #[instrument(skip(self))]
    pub fn create_maintenance_log(
        &self,
        equipment_id: &str,
        details: &str,
        scheduled_date: NaiveDateTime,
        manager_id: &str,
    ) -> ApiResult<CreateMaintenanceLogResponse> {
        let authorized = self
            .user_repo
            .find_by_id(manager_id)?
            .map(|u| u.has_role(Role::MaintenanceManager))
            .unwrap_or(false);

        if !authorized {
            tracing::warn!(manager_id, "维护登记被拒绝: 非维护经理或用户不存在");
            return Ok(CreateMaintenanceLogResponse {
                log_id: String::new(),
                equipment_id: String::new(),
                details: String::new(),
                scheduled_date,
                status: STATUS_UNAUTHORIZED.to_string(),
            });
        }

        let log = MaintenanceLog::new(
            manager_id,
            Some(equipment_id),
            details,
            scheduled_date,
            scheduled_date,
        );
        self.maintenance_repo.insert(&log)?;

        tracing::info!(log_id = %log.log_id, equipment_id, "维护计划已登记");
        Ok(CreateMaintenanceLogResponse {
            log_id: log.log_id,
            equipment_id: equipment_id.to_string(),
            details: details.to_string(),
            scheduled_date,
            status: STATUS_SUCCESS.to_string(),
        })
    }

    /// 登记已完成的维护（不做角色校验，写入失败为软失败）
    #[instrument(skip(self))]
    pub fn log_maintenance(
        &self,
        equipment_id: &str,
        description: &str,
        maintenance_date: NaiveDateTime,
        next_due_date: NaiveDateTime,
        user_id: &str,
    ) -> ApiResult<LogMaintenanceResponse> {
        let log = MaintenanceLog::new(
            user_id,
            Some(equipment_id),
            description,
            maintenance_date,
            next_due_date,
        );

        match self.maintenance_repo.insert(&log) {
            Ok(()) => {
                tracing::info!(log_id = %log.log_id, "维护日志已登记");
                Ok(LogMaintenanceResponse {
                    success: true,
                    message: "Maintenance logged successfully".to_string(),
                    maintenance_log_id: log.log_id,
                })
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "维护日志登记失败");
                Ok(LogMaintenanceResponse {
                    success: false,
                    message: format!("Failed to log maintenance: {}", e),
                    maintenance_log_id: String::new(),
                })
            }
        }
    }

    pub fn get_maintenance_log(&self, log_id: &str) -> ApiResult<MaintenanceLog> {
        require_non_empty("日志ID", log_id)?;
        self.maintenance_repo
            .find_by_id(log_id)?
            .ok_or_else(|| ApiError::NotFound(format!("MaintenanceLog(id={})不存在", log_id)))
    }

    /// 维护日志列表
    ///
    /// 角色校验先于任何查询；未知排序键按默认顺序返回
    pub fn list_maintenance_logs(
        &self,
        sort_by: Option<&str>,
        role: Role,
    ) -> ApiResult<Vec<MaintenanceLog>> {
        if !role.can_view_maintenance() {
            return Err(ApiError::PermissionDenied(
                "Not authorized to access maintenance logs.".to_string(),
            ));
        }

        let sort_key = sort_by.and_then(MaintenanceSortKey::parse);
        if sort_by.is_some() && sort_key.is_none() {
            tracing::debug!(?sort_by, "忽略未知排序键");
        }
        Ok(self.maintenance_repo.list(sort_key)?)
    }

    /// 完工回写
    ///
    /// 完工日期不得晚于当前时间；description 改写为状态文本（附备注）
    #[instrument(skip(self))]
    pub fn update_maintenance_log(
        &self,
        log_id: &str,
        status: &str,
        actual_completion_date: NaiveDateTime,
        notes: Option<&str>,
    ) -> ApiResult<UpdateMaintenanceLogResponse> {
        let Some(log) = self.maintenance_repo.find_by_id(log_id)? else {
            return Ok(UpdateMaintenanceLogResponse {
                success: false,
                updated_log: None,
                message: MSG_LOG_NOT_FOUND.to_string(),
            });
        };

        if actual_completion_date > now_naive() {
            tracing::warn!(log_id, %actual_completion_date, "完工日期晚于当前时间");
            return Ok(UpdateMaintenanceLogResponse {
                success: false,
                updated_log: Some(log),
                message: MSG_INVALID_COMPLETION.to_string(),
            });
        }

        let description = MaintenanceLog::completion_description(status, notes);
        self.maintenance_repo
            .update_completion(log_id, &description, actual_completion_date, now_naive())?;
        let updated_log = self.maintenance_repo.find_by_id(log_id)?;

        tracing::info!(log_id, status, "维护日志已更新");
        Ok(UpdateMaintenanceLogResponse {
            success: true,
            updated_log,
            message: MSG_LOG_UPDATED.to_string(),
        })
    }

    #[instrument(skip(self))]
    pub fn delete_maintenance_log(&self, log_id: &str) -> ApiResult<OperationStatus> {
        match self.maintenance_repo.delete(log_id) {
            Ok(0) => Ok(OperationStatus::failed(MSG_NO_LOG_TO_DELETE)),
            Ok(_) => {
                tracing::info!(log_id, "维护日志已删除");
                Ok(OperationStatus::ok(MSG_LOG_DELETED))
            }
            Err(e) => {
                tracing::warn!(log_id, error = %e, "删除维护日志失败");
                Ok(OperationStatus::failed(format!(
                    "Failed to delete maintenance log: {}",
                    e
                )))
            }
        }
    }
}
