// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用辅助函数
// ==========================================

#[path = "../test_helpers.rs"]
mod test_helpers;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tempfile::NamedTempFile;

use sawmill_ops::api::{
    BackupApi, ConfigApi, CustomerApi, CuttingApi, InventoryApi, InvoiceApi, MaintenanceApi,
    PricingApi, ProductionApi, ReportApi,
};
use sawmill_ops::config::ConfigManager;
use sawmill_ops::logging;
use sawmill_ops::domain::customer::CustomerContact;
use sawmill_ops::domain::inventory::{FinishedProduct, RawMaterial};
use sawmill_ops::domain::production::ProductionRecord;
use sawmill_ops::domain::types::Role;
use sawmill_ops::domain::user::User;
use sawmill_ops::repository::{
    CustomerRepository, InventoryRepository, InvoiceRepository, MaintenanceRepository,
    PriceEstimateRepository, PriceRateRepository, ProductionRepository, QuoteRepository,
    ReportRepository, UserRepository,
};

pub use super::test_data_builder::*;
pub use test_helpers::{approx_eq, count_rows, d, dt};

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 包含所有API实例和必要的依赖
pub struct ApiTestEnv {
    pub db_path: String,
    pub conn: Arc<Mutex<Connection>>,

    pub customer_api: Arc<CustomerApi>,
    pub inventory_api: Arc<InventoryApi>,
    pub pricing_api: Arc<PricingApi>,
    pub invoice_api: Arc<InvoiceApi>,
    pub production_api: Arc<ProductionApi>,
    pub maintenance_api: Arc<MaintenanceApi>,
    pub report_api: Arc<ReportApi>,
    pub backup_api: Arc<BackupApi>,
    pub cutting_api: Arc<CuttingApi>,
    pub config_api: Arc<ConfigApi>,

    // Repository层（用于测试数据准备）
    pub user_repo: Arc<UserRepository>,
    pub customer_repo: Arc<CustomerRepository>,
    pub inventory_repo: Arc<InventoryRepository>,
    pub rate_repo: Arc<PriceRateRepository>,
    pub estimate_repo: Arc<PriceEstimateRepository>,
    pub quote_repo: Arc<QuoteRepository>,
    pub invoice_repo: Arc<InvoiceRepository>,
    pub production_repo: Arc<ProductionRepository>,
    pub maintenance_repo: Arc<MaintenanceRepository>,
    pub report_repo: Arc<ReportRepository>,
    pub config_manager: Arc<ConfigManager>,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    /// 创建新的API测试环境
    ///
    /// # 说明
    /// - 使用临时数据库文件
    /// - 初始化所有Repository和API
    pub fn new() -> Result<Self, String> {
        logging::init_test();

        let (temp_file, db_path) = test_helpers::create_test_db()
            .map_err(|e| format!("创建测试数据库失败: {}", e))?;
        let conn = test_helpers::open_shared_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let user_repo = Arc::new(UserRepository::new(conn.clone()));
        let customer_repo = Arc::new(CustomerRepository::new(conn.clone()));
        let inventory_repo = Arc::new(InventoryRepository::new(conn.clone()));
        let rate_repo = Arc::new(PriceRateRepository::new(conn.clone()));
        let estimate_repo = Arc::new(PriceEstimateRepository::new(conn.clone()));
        let quote_repo = Arc::new(QuoteRepository::new(conn.clone()));
        let invoice_repo = Arc::new(InvoiceRepository::new(conn.clone()));
        let production_repo = Arc::new(ProductionRepository::new(conn.clone()));
        let maintenance_repo = Arc::new(MaintenanceRepository::new(conn.clone()));
        let report_repo = Arc::new(ReportRepository::new(conn.clone()));
        let config_manager = Arc::new(ConfigManager::new(conn.clone()));

        // ==========================================
        // 初始化API层
        // ==========================================
        let customer_api = Arc::new(CustomerApi::new(
            customer_repo.clone(),
            quote_repo.clone(),
            invoice_repo.clone(),
        ));
        let inventory_api = Arc::new(InventoryApi::new(
            inventory_repo.clone(),
            config_manager.clone(),
        ));
        let pricing_api = Arc::new(PricingApi::new(
            rate_repo.clone(),
            estimate_repo.clone(),
            quote_repo.clone(),
            config_manager.clone(),
        ));
        let invoice_api = Arc::new(InvoiceApi::new(
            invoice_repo.clone(),
            quote_repo.clone(),
            customer_repo.clone(),
        ));
        let production_api = Arc::new(ProductionApi::new(
            production_repo.clone(),
            inventory_repo.clone(),
            user_repo.clone(),
        ));
        let maintenance_api = Arc::new(MaintenanceApi::new(
            maintenance_repo.clone(),
            user_repo.clone(),
        ));
        let report_api = Arc::new(ReportApi::new(
            production_repo.clone(),
            invoice_repo.clone(),
            report_repo.clone(),
        ));
        let backup_api = Arc::new(BackupApi::new(
            user_repo.clone(),
            production_repo.clone(),
            maintenance_repo.clone(),
            config_manager.clone(),
        ));
        let cutting_api = Arc::new(CuttingApi::new(
            inventory_repo.clone(),
            production_repo.clone(),
            estimate_repo.clone(),
            user_repo.clone(),
            config_manager.clone(),
        ));
        let config_api = Arc::new(ConfigApi::new(config_manager.clone()));

        Ok(Self {
            db_path,
            conn,
            customer_api,
            inventory_api,
            pricing_api,
            invoice_api,
            production_api,
            maintenance_api,
            report_api,
            backup_api,
            cutting_api,
            config_api,
            user_repo,
            customer_repo,
            inventory_repo,
            rate_repo,
            estimate_repo,
            quote_repo,
            invoice_repo,
            production_repo,
            maintenance_repo,
            report_repo,
            config_manager,
            _temp_file: temp_file,
        })
    }

    // ==========================================
    // 测试数据准备
    // ==========================================

    pub fn seed_user(&self, name: &str, email: &str, role: Role) -> User {
        let user = User::new(name, email, role);
        self.user_repo.insert(&user).expect("写入用户失败");
        user
    }

    pub fn seed_customer(&self, name: &str, email: &str, phone: &str) -> CustomerContact {
        self.customer_api
            .create_customer(name, email, phone, None)
            .expect("创建客户失败")
    }

    pub fn seed_raw(&self, material_type: &str, quantity: i64) -> RawMaterial {
        let raw = RawMaterialBuilder::new(material_type).quantity(quantity).build();
        self.inventory_repo.insert_raw(&raw).expect("写入原材料失败");
        raw
    }

    pub fn seed_finished(&self, product_type: &str, quantity: i64, grade: &str) -> FinishedProduct {
        let fin = FinishedProductBuilder::new(product_type)
            .quantity(quantity)
            .grade(grade)
            .build();
        self.inventory_repo.insert_finished(&fin).expect("写入成品失败");
        fin
    }

    pub fn seed_record(&self, record: ProductionRecord) -> ProductionRecord {
        self.production_repo.insert(&record).expect("写入生产记录失败");
        record
    }

    pub fn seed_rate(&self, dimensions: &str, grade: &str, rate: f64) {
        self.rate_repo.upsert(dimensions, grade, rate).expect("写入单价失败");
    }
}
