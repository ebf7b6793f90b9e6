// ==========================================
// 锯木厂经营管理系统 - 命令层（按域拆分）
// ==========================================
// 职责: 命令名 + JSON 参数 -> API 调用 -> JSON 结果
// 错误统一序列化为 {"error": ..., "code": ...}
// ==========================================

mod backup;
mod common;
mod config;
mod customer;
mod cutting;
mod inventory;
mod invoice;
mod maintenance;
mod pricing;
mod production;
mod report;
mod user;

pub use backup::*;
pub use common::ErrorResponse;
pub use config::*;
pub use customer::*;
pub use cutting::*;
pub use inventory::*;
pub use invoice::*;
pub use maintenance::*;
pub use pricing::*;
pub use production::*;
pub use report::*;
pub use user::*;

use common::{error_payload, parse_params};

use crate::app::state::AppState;

/// 已注册的命令名（按域分组）
pub const COMMANDS: &[&str] = &[
    // 用户
    "create_user",
    "list_users",
    // 客户
    "create_customer",
    "get_customer",
    "list_customers",
    "update_customer",
    "delete_customer",
    // 库存
    "add_inventory_item",
    "get_inventory_item",
    "get_inventory_list",
    "update_inventory_item",
    "delete_inventory_item",
    "list_inventory",
    // 报价
    "create_price_estimate",
    "create_quote",
    "get_price_estimate",
    "get_price_estimates",
    "update_price_estimate",
    "delete_price_estimate",
    "get_quote",
    "set_price_rate",
    "list_price_rates",
    // 发票
    "create_invoice",
    "get_invoice",
    // 生产
    "create_production_record",
    "record_production",
    "get_production_record",
    "get_all_production_records",
    "update_production_record",
    "delete_production_record",
    // 维护
    "create_maintenance_log",
    "log_maintenance",
    "get_maintenance_log",
    "list_maintenance_logs",
    "update_maintenance_log",
    "delete_maintenance_log",
    // 报表
    "get_production_report",
    "get_sales_report",
    "get_yield_report",
    "fetch_reports",
    "save_report",
    // 备份 / 恢复
    "start_backup",
    "backup_data",
    "get_backup_status",
    "start_recovery",
    "get_recovery_logs",
    // 下料优化
    "get_cutting_instructions",
    "create_optimization_request",
    "get_optimization_results",
    "list_optimizations",
    "delete_optimization_request",
    // 配置
    "list_configs",
    "get_config",
    "update_config",
];

/// 按命令名分发
///
/// # 参数
/// - command: 命令名（见 [`COMMANDS`]）
/// - params: JSON 参数，无参命令可传 null
///
/// # 返回
/// - Ok: 结果 JSON
/// - Err: 错误 JSON（`ErrorResponse`）
pub async fn dispatch(
    state: &AppState,
    command: &str,
    params: serde_json::Value,
) -> Result<String, String> {
    tracing::debug!(command, "dispatch");

    match command {
        "create_user" => user::create_user(state, parse_params(params)?).await,
        "list_users" => user::list_users(state).await,

        "create_customer" => customer::create_customer(state, parse_params(params)?).await,
        "get_customer" => customer::get_customer(state, parse_params(params)?).await,
        "list_customers" => customer::list_customers(state).await,
        "update_customer" => customer::update_customer(state, parse_params(params)?).await,
        "delete_customer" => customer::delete_customer(state, parse_params(params)?).await,

        "add_inventory_item" => inventory::add_inventory_item(state, parse_params(params)?).await,
        "get_inventory_item" => inventory::get_inventory_item(state, parse_params(params)?).await,
        "get_inventory_list" => inventory::get_inventory_list(state, parse_params(params)?).await,
        "update_inventory_item" => {
            inventory::update_inventory_item(state, parse_params(params)?).await
        }
        "delete_inventory_item" => {
            inventory::delete_inventory_item(state, parse_params(params)?).await
        }
        "list_inventory" => inventory::list_inventory(state, parse_params(params)?).await,

        "create_price_estimate" => {
            pricing::create_price_estimate(state, parse_params(params)?).await
        }
        "create_quote" => pricing::create_quote(state, parse_params(params)?).await,
        "get_price_estimate" => pricing::get_price_estimate(state, parse_params(params)?).await,
        "get_price_estimates" => pricing::get_price_estimates(state).await,
        "update_price_estimate" => {
            pricing::update_price_estimate(state, parse_params(params)?).await
        }
        "delete_price_estimate" => {
            pricing::delete_price_estimate(state, parse_params(params)?).await
        }
        "get_quote" => pricing::get_quote(state, parse_params(params)?).await,
        "set_price_rate" => pricing::set_price_rate(state, parse_params(params)?).await,
        "list_price_rates" => pricing::list_price_rates(state).await,

        "create_invoice" => invoice::create_invoice(state, parse_params(params)?).await,
        "get_invoice" => invoice::get_invoice(state, parse_params(params)?).await,

        "create_production_record" => {
            production::create_production_record(state, parse_params(params)?).await
        }
        "record_production" => production::record_production(state, parse_params(params)?).await,
        "get_production_record" => {
            production::get_production_record(state, parse_params(params)?).await
        }
        "get_all_production_records" => production::get_all_production_records(state).await,
        "update_production_record" => {
            production::update_production_record(state, parse_params(params)?).await
        }
        "delete_production_record" => {
            production::delete_production_record(state, parse_params(params)?).await
        }

        "create_maintenance_log" => {
            maintenance::create_maintenance_log(state, parse_params(params)?).await
        }
        "log_maintenance" => maintenance::log_maintenance(state, parse_params(params)?).await,
        "get_maintenance_log" => {
            maintenance::get_maintenance_log(state, parse_params(params)?).await
        }
        "list_maintenance_logs" => {
            maintenance::list_maintenance_logs(state, parse_params(params)?).await
        }
        "update_maintenance_log" => {
            maintenance::update_maintenance_log(state, parse_params(params)?).await
        }
        "delete_maintenance_log" => {
            maintenance::delete_maintenance_log(state, parse_params(params)?).await
        }

        "get_production_report" => report::get_production_report(state, parse_params(params)?).await,
        "get_sales_report" => report::get_sales_report(state, parse_params(params)?).await,
        "get_yield_report" => report::get_yield_report(state, parse_params(params)?).await,
        "fetch_reports" => report::fetch_reports(state, parse_params(params)?).await,
        "save_report" => report::save_report(state, parse_params(params)?).await,

        "start_backup" => backup::start_backup(state).await,
        "backup_data" => backup::backup_data(state).await,
        "get_backup_status" => backup::get_backup_status(state).await,
        "start_recovery" => backup::start_recovery(state).await,
        "get_recovery_logs" => backup::get_recovery_logs(state, parse_params(params)?).await,

        "get_cutting_instructions" => {
            cutting::get_cutting_instructions(state, parse_params(params)?).await
        }
        "create_optimization_request" => {
            cutting::create_optimization_request(state, parse_params(params)?).await
        }
        "get_optimization_results" => {
            cutting::get_optimization_results(state, parse_params(params)?).await
        }
        "list_optimizations" => cutting::list_optimizations(state, parse_params(params)?).await,
        "delete_optimization_request" => {
            cutting::delete_optimization_request(state, parse_params(params)?).await
        }

        "list_configs" => config::list_configs(state).await,
        "get_config" => config::get_config(state, parse_params(params)?).await,
        "update_config" => config::update_config(state, parse_params(params)?).await,

        other => Err(error_payload(
            "UNKNOWN_COMMAND",
            format!("未知命令: {}", other),
        )),
    }
}
