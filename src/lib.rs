// ==========================================
// 锯木厂经营管理系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 覆盖: 客户、库存、报价、发票、生产、维护、报表、备份
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 定价 / 下料规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 性能埋点（SQL 计数 / 命令耗时）
pub mod perf;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配与命令分发
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Dimensions, InventoryKind, MaintenanceSortKey, Role, StockStatus};

// 领域实体
pub use domain::{
    CustomerContact, FinishedProduct, Invoice, MaintenanceLog, PriceEstimate, ProductionRecord,
    Quote, RawMaterial, Report, User,
};

// 引擎
pub use engine::{FlatRateStrategy, PricingStrategy, RateTableStrategy, VolumeGradeStrategy};

// API
pub use api::{
    ApiError, BackupApi, ConfigApi, CustomerApi, CuttingApi, InventoryApi, InvoiceApi,
    MaintenanceApi, PricingApi, ProductionApi, ReportApi,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "锯木厂经营管理系统";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(DB_VERSION, "v0.1");
    }
}
