// ==========================================
// 锯木厂经营管理系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod customer_repo;
pub mod error;
pub mod inventory_repo;
pub mod invoice_repo;
pub mod maintenance_repo;
pub mod pricing_repo;
pub mod production_repo;
pub mod report_repo;
mod row_utils;
pub mod user_repo;

// 重导出核心仓储
pub use customer_repo::CustomerRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use inventory_repo::InventoryRepository;
pub use invoice_repo::InvoiceRepository;
pub use maintenance_repo::MaintenanceRepository;
pub use pricing_repo::{PriceEstimateRepository, PriceRateRepository, QuoteRepository};
pub use production_repo::{ProductionFilter, ProductionReportRow, ProductionRepository};
pub use report_repo::ReportRepository;
pub use user_repo::UserRepository;
