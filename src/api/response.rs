// ==========================================
// 锯木厂经营管理系统 - 通用响应与入参校验
// ==========================================

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};

/// 软失败响应: success + 诊断信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationStatus {
    pub success: bool,
    pub message: String,
}

impl OperationStatus {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// 非空校验
pub(crate) fn require_non_empty(field: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidInput(format!("{}不能为空", field)));
    }
    Ok(())
}

/// 数量 > 0
pub(crate) fn require_positive(field: &str, value: i64) -> ApiResult<()> {
    if value <= 0 {
        return Err(ApiError::InvalidInput(format!("{}必须大于0: {}", field, value)));
    }
    Ok(())
}

/// 数量 >= 0
pub(crate) fn require_non_negative(field: &str, value: i64) -> ApiResult<()> {
    if value < 0 {
        return Err(ApiError::InvalidInput(format!("{}不能为负数: {}", field, value)));
    }
    Ok(())
}
