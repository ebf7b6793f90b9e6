// ==========================================
// 锯木厂经营管理系统 - 配置层
// ==========================================
// 职责: 业务常量配置（定价、库存阈值、备份、下料）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager, GLOBAL_SCOPE};
