// ==========================================
// 锯木厂经营管理系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令层调用
// ==========================================

pub mod backup_api;
pub mod config_api;
pub mod customer_api;
pub mod cutting_api;
pub mod error;
pub mod inventory_api;
pub mod invoice_api;
pub mod maintenance_api;
pub mod pricing_api;
pub mod production_api;
pub mod report_api;
pub mod response;

// 重导出核心类型
pub use backup_api::BackupApi;
pub use config_api::{ConfigApi, ConfigItem};
pub use customer_api::CustomerApi;
pub use cutting_api::CuttingApi;
pub use error::{ApiError, ApiResult};
pub use inventory_api::{InventoryApi, NewInventoryItem};
pub use invoice_api::InvoiceApi;
pub use maintenance_api::MaintenanceApi;
pub use pricing_api::PricingApi;
pub use production_api::{NewProductionRecord, ProductionApi};
pub use report_api::ReportApi;
pub use response::OperationStatus;
