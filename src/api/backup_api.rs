// ==========================================
// 锯木厂经营管理系统 - 备份 / 恢复 API
// ==========================================
// 只做角色校验并返回固定结果，不执行真实备份
// 备份状态由最近一条生产记录的创建时间推算
// ==========================================

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::types::{now_naive, Role};
use crate::repository::{MaintenanceRepository, ProductionRepository, UserRepository};

pub const STATUS_SUCCESS: &str = "Success";
pub const STATUS_FAILED: &str = "Failed";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupInitiationResponse {
    pub message: String,
    pub timestamp: NaiveDateTime,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupStatusResponse {
    /// 0..=100
    pub progress: i64,
    pub status: String,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryLogEntry {
    pub date: NaiveDateTime,
    pub description: String,
}

// ==========================================
// BackupApi - 备份 / 恢复 API
// ==========================================
pub struct BackupApi {
    user_repo: Arc<UserRepository>,
    production_repo: Arc<ProductionRepository>,
    maintenance_repo: Arc<MaintenanceRepository>,
    config: Arc<ConfigManager>,
}

impl BackupApi {
    pub fn new(
        user_repo: Arc<UserRepository>,
        production_repo: Arc<ProductionRepository>,
        maintenance_repo: Arc<MaintenanceRepository>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            user_repo,
            production_repo,
            maintenance_repo,
            config,
        }
    }

    /// 发起备份
    ///
    /// 配置的管理员邮箱必须对应一个 SYSTEM_ADMINISTRATOR 用户
    ///
    /// # 返回
    /// - Err(ApiError::Unauthorized): 管理员不存在或角色不符
    #[instrument(skip(self))]
    pub fn start_backup(&self) -> ApiResult<BackupInitiationResponse> {
        let admin_email = self.config.backup_admin_email()?;
        let authorized = self
            .user_repo
            .find_by_email(&admin_email)?
            .map(|u| u.has_role(Role::SystemAdministrator))
            .unwrap_or(false);

        if !authorized {
            tracing::warn!(%admin_email, "备份发起被拒绝");
            return Err(ApiError::Unauthorized(
                "User is not authorized to initiate backup.".to_string(),
            ));
        }

        tracing::info!(%admin_email, "备份已发起");
        Ok(BackupInitiationResponse {
            message: "Backup initiated successfully.".to_string(),
            timestamp: now_naive(),
            status: STATUS_SUCCESS.to_string(),
        })
    }

    /// 发起备份（以首个系统管理员身份，缺失时软失败）
    #[instrument(skip(self))]
    pub fn backup_data(&self) -> ApiResult<BackupInitiationResponse> {
        let response = match self.user_repo.find_first_by_role(Role::SystemAdministrator) {
            Ok(Some(admin)) => {
                tracing::info!(admin = %admin.email, "备份已发起");
                BackupInitiationResponse {
                    message: format!("Backup initiated successfully by {}", admin.email),
                    timestamp: now_naive(),
                    status: STATUS_SUCCESS.to_string(),
                }
            }
            Ok(None) => {
                tracing::warn!("备份发起失败: 没有系统管理员");
                BackupInitiationResponse {
                    message: "Unauthorized access attempt for backup initiation.".to_string(),
                    timestamp: now_naive(),
                    status: STATUS_FAILED.to_string(),
                }
            }
            Err(e) => BackupInitiationResponse {
                message: format!("Error during backup process: {}", e),
                timestamp: now_naive(),
                status: STATUS_FAILED.to_string(),
            },
        };
        Ok(response)
    }

    pub fn get_backup_status(&self) -> ApiResult<BackupStatusResponse> {
        self.get_backup_status_at(now_naive())
    }

    /// 以给定时刻推算备份状态
    ///
    /// 距最近生产记录: > 24h 为 error；> 1h 为 in progress（进度取小时内的秒数比例）；
    /// 其余为 completed
    pub fn get_backup_status_at(&self, now: NaiveDateTime) -> ApiResult<BackupStatusResponse> {
        let Some(latest) = self.production_repo.latest_created_at()? else {
            return Ok(BackupStatusResponse {
                progress: 0,
                status: "No backup available".to_string(),
                error_message: None,
            });
        };

        let elapsed = now - latest;
        let response = if elapsed > Duration::days(1) {
            BackupStatusResponse {
                progress: 100,
                status: "error".to_string(),
                error_message: Some("Backup took too long, check system".to_string()),
            }
        } else if elapsed > Duration::hours(1) {
            BackupStatusResponse {
                progress: (elapsed.num_seconds() % 3600) * 100 / 3600,
                status: "in progress".to_string(),
                error_message: None,
            }
        } else {
            BackupStatusResponse {
                progress: 100,
                status: "completed".to_string(),
                error_message: None,
            }
        };
        Ok(response)
    }

    /// 恢复（只校验用户表可读）
    #[instrument(skip(self))]
    pub fn start_recovery(&self) -> ApiResult<RecoveryResponse> {
        let response = match self.user_repo.list_all() {
            Ok(users) => {
                tracing::info!(users = users.len(), "恢复流程完成");
                RecoveryResponse {
                    status: STATUS_SUCCESS.to_string(),
                    message: "The recovery process completed successfully. All data has been restored to the last known backup state.".to_string(),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "恢复流程失败");
                RecoveryResponse {
                    status: STATUS_FAILED.to_string(),
                    message: format!("An error occurred during the recovery process: {}", e),
                }
            }
        };
        Ok(response)
    }

    /// 恢复日志：维护日期落在区间内的日志（日期闭区间）
    pub fn get_recovery_logs(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> ApiResult<Vec<RecoveryLogEntry>> {
        let start = start_date.and_then(|d| d.and_hms_opt(0, 0, 0));
        let end = end_date.and_then(|d| d.and_hms_opt(23, 59, 59));

        let logs = self.maintenance_repo.list_between(start, end)?;
        Ok(logs
            .into_iter()
            .map(|log| RecoveryLogEntry {
                date: log.maintenance_date,
                description: log.description,
            })
            .collect())
    }
}
