// ==========================================
// 锯木厂经营管理系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换Repository/定价错误为业务错误
// ==========================================

use crate::engine::pricing::PricingError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入与业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("{0}")]
    UniquenessViolation(String),

    #[error("{0}")]
    UnsupportedType(String),

    #[error("{0}")]
    NoRateAvailable(String),

    #[error("权限不足: {0}")]
    PermissionDenied(String),

    #[error("未授权: {0}")]
    Unauthorized(String),

    #[error("约束违反: {0}")]
    ConstraintViolation(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 稳定的错误代码（命令层返回给调用方）
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::UniquenessViolation(_) => "UNIQUENESS_VIOLATION",
            ApiError::UnsupportedType(_) => "UNSUPPORTED_TYPE",
            ApiError::NoRateAvailable(_) => "NO_RATE_AVAILABLE",
            ApiError::PermissionDenied(_) => "PERMISSION_DENIED",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::ConstraintViolation(_) => "CONSTRAINT_VIOLATION",
            ApiError::DatabaseError(_) => "DATABASE_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
            ApiError::Other(_) => "OTHER_ERROR",
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => ApiError::UniquenessViolation(msg),
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::ConstraintViolation(format!("外键约束违反: {}", msg))
            }
            RepositoryError::CheckConstraintViolation(msg) => {
                ApiError::ConstraintViolation(format!("检查约束违反: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InternalError(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 PricingError 转换
// ==========================================
impl From<PricingError> for ApiError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::NoRateAvailable { .. } => ApiError::NoRateAvailable(err.to_string()),
            PricingError::InvalidQuantity(_) => ApiError::InvalidInput(err.to_string()),
            PricingError::RateLookupFailed(msg) => ApiError::DatabaseError(msg),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
