// ==========================================
// 锯木厂经营管理系统 - 应用层
// ==========================================
// 职责: 应用状态装配 + 命令分发
// ==========================================

pub mod commands;
pub mod state;

// 重导出
pub use commands::{dispatch, ErrorResponse, COMMANDS};
pub use state::{get_default_db_path, AppState};
