// ==========================================
// 锯木厂经营管理系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 所有仓储共享同一个数据库连接
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{
    BackupApi, ConfigApi, CustomerApi, CuttingApi, InventoryApi, InvoiceApi, MaintenanceApi,
    PricingApi, ProductionApi, ReportApi,
};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::perf::{install_sqlite_tracing, SqlPerfSettings};
use crate::repository::{
    CustomerRepository, InventoryRepository, InvoiceRepository, MaintenanceRepository,
    PriceEstimateRepository, PriceRateRepository, ProductionRepository, QuoteRepository,
    ReportRepository, UserRepository,
};

/// 数据库路径环境变量
pub const ENV_DB_PATH: &str = "SAWMILL_OPS_DB_PATH";

/// 应用状态
///
/// 包含所有API实例；drop 时关闭数据库连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

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

    /// 用户仓储（用户由外部维护，命令层只做种子写入）
    pub user_repo: Arc<UserRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 1. 打开数据库并执行建库脚本
    /// 2. 按环境变量安装 SQL 性能钩子
    /// 3. 初始化所有Repository与API
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let mut conn =
            open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("建库失败: {}", e))?;
        install_sqlite_tracing(&mut conn, SqlPerfSettings::from_env());
        let conn = Arc::new(Mutex::new(conn));

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
            rate_repo,
            estimate_repo.clone(),
            quote_repo.clone(),
            config_manager.clone(),
        ));
        let invoice_api = Arc::new(InvoiceApi::new(
            invoice_repo.clone(),
            quote_repo,
            customer_repo,
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
            invoice_repo,
            report_repo,
        ));
        let backup_api = Arc::new(BackupApi::new(
            user_repo.clone(),
            production_repo.clone(),
            maintenance_repo,
            config_manager.clone(),
        ));
        let cutting_api = Arc::new(CuttingApi::new(
            inventory_repo,
            production_repo,
            estimate_repo,
            user_repo.clone(),
            config_manager.clone(),
        ));
        let config_api = Arc::new(ConfigApi::new(config_manager));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
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
        })
    }

    /// 获取数据库路径
    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }
}

// ==========================================
// 默认数据库路径辅助函数
// ==========================================

/// 获取默认数据库路径
///
/// 优先级: SAWMILL_OPS_DB_PATH > 用户数据目录/sawmill-ops/sawmill_ops.db > ./sawmill_ops.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(ENV_DB_PATH) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("sawmill-ops");
        match std::fs::create_dir_all(&dir) {
            Ok(()) => return dir.join("sawmill_ops.db").to_string_lossy().to_string(),
            Err(e) => tracing::warn!("无法创建数据目录 {:?}: {}", dir, e),
        }
    }

    "./sawmill_ops.db".to_string()
}
