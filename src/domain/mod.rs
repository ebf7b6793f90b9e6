// ==========================================
// 锯木厂经营管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑
// ==========================================

pub mod customer;
pub mod inventory;
pub mod invoice;
pub mod maintenance;
pub mod pricing;
pub mod production;
pub mod report;
pub mod types;
pub mod user;

// 重导出核心类型
pub use customer::CustomerContact;
pub use inventory::{FinishedProduct, InventoryItem, RawMaterial};
pub use invoice::{Invoice, InvoiceDetail};
pub use maintenance::MaintenanceLog;
pub use pricing::{PriceEstimate, PriceRate, Quote, QuoteWithEstimates};
pub use production::{ProductionRecord, ProductionRecordDetail};
pub use report::{
    CustomerSales, ProductionReport, ProductionReportDetails, Report, ReportMetric, SalesReport,
    YieldReport,
};
pub use types::{Dimensions, InventoryKind, MaintenanceSortKey, Role, StockStatus};
pub use user::User;
