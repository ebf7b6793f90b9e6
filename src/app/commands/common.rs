use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::types;
use crate::perf::CommandPerfGuard;

// ==========================================
// 公共工具：错误映射、参数解析、阻塞执行
// ==========================================

/// 错误响应（返回给调用方）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误消息
    pub error: String,

    /// 错误代码
    pub code: String,
}

pub(super) fn error_payload(code: &str, message: impl Into<String>) -> String {
    let response = ErrorResponse {
        error: message.into(),
        code: code.to_string(),
    };
    serde_json::to_string(&response).unwrap_or_else(|_| response.error.clone())
}

/// 将ApiError转换为JSON字符串
pub(super) fn map_api_error(err: ApiError) -> String {
    error_payload(err.code(), err.to_string())
}

pub(super) fn invalid_input(message: impl Into<String>) -> String {
    map_api_error(ApiError::InvalidInput(message.into()))
}

/// 反序列化请求参数（null 视为空对象）
pub(super) fn parse_params<T: DeserializeOwned>(params: serde_json::Value) -> Result<T, String> {
    let params = if params.is_null() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        params
    };
    serde_json::from_value(params).map_err(|e| invalid_input(format!("参数格式错误: {}", e)))
}

pub(super) fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value)
        .map_err(|e| error_payload("INTERNAL_ERROR", format!("序列化失败: {}", e)))
}

/// 解析日期字符串
pub(super) fn parse_date(date_str: &str) -> Result<NaiveDate, String> {
    types::parse_date(date_str)
        .ok_or_else(|| invalid_input(format!("日期格式错误（应为YYYY-MM-DD）: {}", date_str)))
}

/// 解析时间字符串（兼容纯日期）
pub(super) fn parse_datetime(value: &str) -> Result<NaiveDateTime, String> {
    types::parse_datetime(value).ok_or_else(|| {
        invalid_input(format!(
            "时间格式错误（应为YYYY-MM-DD HH:MM:SS）: {}",
            value
        ))
    })
}

pub(super) fn parse_optional_date(value: Option<&str>) -> Result<Option<NaiveDate>, String> {
    value.map(parse_date).transpose()
}

pub(super) fn parse_optional_datetime(value: Option<&str>) -> Result<Option<NaiveDateTime>, String> {
    value.map(parse_datetime).transpose()
}

/// 在阻塞线程池中执行 API 调用，并统计命令耗时
pub(super) async fn run_blocking<T, F>(command: &'static str, f: F) -> Result<String, String>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Serialize + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || {
        let _perf = CommandPerfGuard::new(command);
        f()
    })
    .await
    .map_err(|e| error_payload("INTERNAL_ERROR", format!("任务执行失败: {}", e)))?
    .map_err(map_api_error)?;

    to_json(&result)
}
