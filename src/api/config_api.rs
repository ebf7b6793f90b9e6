// ==========================================
// 锯木厂经营管理系统 - 配置管理 API
// ==========================================
// 职责: 业务常量的查询与更新
// 只接受已登记的配置键，数值键在写入前校验
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::error::{ApiError, ApiResult};
use crate::config::{config_keys, ConfigManager, GLOBAL_SCOPE};

/// 配置项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigItem {
    pub scope_id: String,
    pub key: String,
    pub value: String,
}

impl ConfigItem {
    fn global(key: &str, value: String) -> Self {
        Self {
            scope_id: GLOBAL_SCOPE.to_string(),
            key: key.to_string(),
            value,
        }
    }
}

/// 配置值的取值约束
#[derive(Debug, Clone, Copy, PartialEq)]
enum ValueKind {
    NonNegativeNumber,
    NonNegativeInteger,
    Ratio,
    Text,
}

fn value_kind(key: &str) -> Option<ValueKind> {
    let kind = match key {
        config_keys::FLAT_RATE | config_keys::VOLUME_BASE_PRICE => ValueKind::NonNegativeNumber,
        config_keys::PROFIT_MARGIN | config_keys::CUTTING_WASTE_RATIO => ValueKind::Ratio,
        config_keys::RAW_LOW_STOCK_THRESHOLD | config_keys::FINISHED_LOW_STOCK_THRESHOLD => {
            ValueKind::NonNegativeInteger
        }
        config_keys::BACKUP_ADMIN_EMAIL => ValueKind::Text,
        _ => return None,
    };
    Some(kind)
}

fn validate_value(key: &str, kind: ValueKind, value: &str) -> ApiResult<()> {
    let invalid = || ApiError::InvalidInput(format!("配置{}的值无效: {}", key, value));
    match kind {
        ValueKind::NonNegativeNumber => {
            let v: f64 = value.trim().parse().map_err(|_| invalid())?;
            if !v.is_finite() || v < 0.0 {
                return Err(invalid());
            }
        }
        ValueKind::Ratio => {
            let v: f64 = value.trim().parse().map_err(|_| invalid())?;
            if !(0.0..=1.0).contains(&v) {
                return Err(invalid());
            }
        }
        ValueKind::NonNegativeInteger => {
            let v: i64 = value.trim().parse().map_err(|_| invalid())?;
            if v < 0 {
                return Err(invalid());
            }
        }
        ValueKind::Text => {
            if value.trim().is_empty() {
                return Err(invalid());
            }
        }
    }
    Ok(())
}

// ==========================================
// ConfigApi - 配置管理 API
// ==========================================
pub struct ConfigApi {
    config_manager: Arc<ConfigManager>,
}

impl ConfigApi {
    pub fn new(config_manager: Arc<ConfigManager>) -> Self {
        Self { config_manager }
    }

    /// 全部配置（默认值叠加已保存的覆盖值）
    pub fn list_configs(&self) -> ApiResult<Vec<ConfigItem>> {
        let snapshot = self.config_manager.get_config_snapshot()?;
        Ok(snapshot
            .into_iter()
            .map(|(key, value)| ConfigItem::global(&key, value))
            .collect())
    }

    /// 单个配置
    ///
    /// # 返回
    /// - Err(ApiError::NotFound): 未登记的配置键
    pub fn get_config(&self, key: &str) -> ApiResult<ConfigItem> {
        let snapshot = self.config_manager.get_config_snapshot()?;
        snapshot
            .get(key)
            .map(|value| ConfigItem::global(key, value.clone()))
            .ok_or_else(|| ApiError::NotFound(format!("配置项{}不存在", key)))
    }

    /// 更新配置
    #[instrument(skip(self))]
    pub fn update_config(&self, key: &str, value: &str) -> ApiResult<ConfigItem> {
        let kind = value_kind(key)
            .ok_or_else(|| ApiError::InvalidInput(format!("未知配置项: {}", key)))?;
        validate_value(key, kind, value)?;

        let value = value.trim();
        self.config_manager.set_global_config_value(key, value)?;

        tracing::info!(key, value, "配置已更新");
        Ok(ConfigItem::global(key, value.to_string()))
    }
}
