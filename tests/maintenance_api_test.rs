// ==========================================
// MaintenanceApi 集成测试
// ==========================================
// 测试范围:
// 1. 计划维护: 仅维护经理
// 2. 列表: 角色校验 + 排序
// 3. 完工回写: 未来日期拒绝
// 4. 删除
// ==========================================

mod helpers;

use chrono::Duration;
use helpers::api_test_helper::*;
use sawmill_ops::api::maintenance_api::{
    MSG_INVALID_COMPLETION, MSG_LOG_DELETED, MSG_LOG_NOT_FOUND, MSG_NO_LOG_TO_DELETE,
    STATUS_SUCCESS, STATUS_UNAUTHORIZED,
};
use sawmill_ops::api::ApiError;
use sawmill_ops::domain::types::now_naive;
use sawmill_ops::Role;

// ==========================================
// 计划维护
// ==========================================

#[test]
fn test_create_maintenance_log_维护经理() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let manager = env.seed_user("Mia", "mia@example.com", Role::MaintenanceManager);

    let result = env
        .maintenance_api
        .create_maintenance_log("SAW-01", "Replace band blade", dt("2024-06-01 08:00:00"), &manager.user_id)
        .expect("登记失败");

    assert_eq!(result.status, STATUS_SUCCESS);
    assert!(!result.log_id.is_empty());

    let log = env
        .maintenance_api
        .get_maintenance_log(&result.log_id)
        .expect("查询失败");
    assert_eq!(log.equipment_id.as_deref(), Some("SAW-01"));
    assert_eq!(log.next_due_date, dt("2024-06-01 08:00:00"));
    assert_eq!(log.user_id, manager.user_id);
}

#[test]
fn test_create_maintenance_log_非维护经理() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let operator = env.seed_user("Op", "op@example.com", Role::Operator);

    for manager_id in [operator.user_id.as_str(), "nobody"] {
        let result = env
            .maintenance_api
            .create_maintenance_log("SAW-01", "x", dt("2024-06-01 08:00:00"), manager_id)
            .expect("应返回软失败");
        assert_eq!(result.status, STATUS_UNAUTHORIZED);
        assert!(result.log_id.is_empty());
    }
    assert_eq!(count_rows(&env.conn, "maintenance_log"), 0);
}

#[test]
fn test_log_maintenance() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let operator = env.seed_user("Op", "op@example.com", Role::Operator);

    let ok = env
        .maintenance_api
        .log_maintenance(
            "EDGER-2",
            "Greased bearings",
            dt("2024-05-01 10:00:00"),
            dt("2024-08-01 10:00:00"),
            &operator.user_id,
        )
        .expect("登记失败");
    assert!(ok.success);
    assert!(!ok.maintenance_log_id.is_empty());

    let failed = env
        .maintenance_api
        .log_maintenance(
            "EDGER-2",
            "Greased bearings",
            dt("2024-05-01 10:00:00"),
            dt("2024-08-01 10:00:00"),
            "nobody",
        )
        .expect("应返回软失败");
    assert!(!failed.success);
    assert!(failed.message.starts_with("Failed to log maintenance:"));
}

// ==========================================
// 列表
// ==========================================

#[test]
fn test_list_maintenance_logs_角色校验() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    for role in [Role::Operator, Role::SalesManager] {
        let err = env.maintenance_api.list_maintenance_logs(None, role).unwrap_err();
        assert!(matches!(err, ApiError::PermissionDenied(_)));
    }
    for role in [Role::SystemAdministrator, Role::MaintenanceManager] {
        assert!(env.maintenance_api.list_maintenance_logs(None, role).is_ok());
    }
}

#[test]
fn test_list_maintenance_logs_排序() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let user = env.seed_user("Mia", "mia@example.com", Role::MaintenanceManager);
    let api = &env.maintenance_api;

    api.log_maintenance("A", "Planer", dt("2024-03-01 00:00:00"), dt("2024-04-15 00:00:00"), &user.user_id)
        .expect("登记失败");
    api.log_maintenance("B", "Chipper", dt("2024-01-01 00:00:00"), dt("2024-09-01 00:00:00"), &user.user_id)
        .expect("登记失败");
    api.log_maintenance("C", "Kiln fan", dt("2024-02-01 00:00:00"), dt("2024-02-10 00:00:00"), &user.user_id)
        .expect("登记失败");

    let by_date = api
        .list_maintenance_logs(Some("date"), Role::MaintenanceManager)
        .expect("查询失败");
    let descs: Vec<&str> = by_date.iter().map(|l| l.description.as_str()).collect();
    assert_eq!(descs, vec!["Chipper", "Kiln fan", "Planer"]);

    let by_equipment = api
        .list_maintenance_logs(Some("equipment"), Role::MaintenanceManager)
        .expect("查询失败");
    let descs: Vec<&str> = by_equipment.iter().map(|l| l.description.as_str()).collect();
    assert_eq!(descs, vec!["Chipper", "Kiln fan", "Planer"]);

    let by_urgency = api
        .list_maintenance_logs(Some("urgency"), Role::SystemAdministrator)
        .expect("查询失败");
    let descs: Vec<&str> = by_urgency.iter().map(|l| l.description.as_str()).collect();
    assert_eq!(descs, vec!["Kiln fan", "Planer", "Chipper"]);

    let unknown = api
        .list_maintenance_logs(Some("cost"), Role::SystemAdministrator)
        .expect("未知排序键应被忽略");
    assert_eq!(unknown.len(), 3);
}

// ==========================================
// 完工回写
// ==========================================

#[test]
fn test_update_maintenance_log_完工() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let user = env.seed_user("Mia", "mia@example.com", Role::MaintenanceManager);
    let created = env
        .maintenance_api
        .log_maintenance("A", "Planer", dt("2024-03-01 00:00:00"), dt("2024-04-15 00:00:00"), &user.user_id)
        .expect("登记失败");

    let result = env
        .maintenance_api
        .update_maintenance_log(
            &created.maintenance_log_id,
            "Completed",
            dt("2024-03-02 12:00:00"),
            Some("knives sharpened"),
        )
        .expect("更新失败");

    assert!(result.success);
    let log = result.updated_log.expect("应返回更新后的日志");
    assert_eq!(log.description, "Completed\nNotes: knives sharpened");
    assert_eq!(log.maintenance_date, dt("2024-03-02 12:00:00"));
}

#[test]
fn test_update_maintenance_log_未来日期() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let user = env.seed_user("Mia", "mia@example.com", Role::MaintenanceManager);
    let created = env
        .maintenance_api
        .log_maintenance("A", "Planer", dt("2024-03-01 00:00:00"), dt("2024-04-15 00:00:00"), &user.user_id)
        .expect("登记失败");

    let future = now_naive() + Duration::days(3);
    let result = env
        .maintenance_api
        .update_maintenance_log(&created.maintenance_log_id, "Completed", future, None)
        .expect("应返回软失败");

    assert!(!result.success);
    assert_eq!(result.message, MSG_INVALID_COMPLETION);
    assert_eq!(
        result.updated_log.map(|l| l.description),
        Some("Planer".to_string()),
        "拒绝时不应改写日志"
    );
}

#[test]
fn test_update_maintenance_log_不存在() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let result = env
        .maintenance_api
        .update_maintenance_log("missing", "Completed", dt("2024-01-01 00:00:00"), None)
        .expect("应返回软失败");
    assert!(!result.success);
    assert_eq!(result.message, MSG_LOG_NOT_FOUND);
    assert!(result.updated_log.is_none());
}

// ==========================================
// 删除
// ==========================================

#[test]
fn test_delete_maintenance_log() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let user = env.seed_user("Mia", "mia@example.com", Role::MaintenanceManager);
    let created = env
        .maintenance_api
        .log_maintenance("A", "Planer", dt("2024-03-01 00:00:00"), dt("2024-04-15 00:00:00"), &user.user_id)
        .expect("登记失败");

    let ok = env
        .maintenance_api
        .delete_maintenance_log(&created.maintenance_log_id)
        .expect("删除失败");
    assert!(ok.success);
    assert_eq!(ok.message, MSG_LOG_DELETED);

    let again = env
        .maintenance_api
        .delete_maintenance_log(&created.maintenance_log_id)
        .expect("删除失败");
    assert!(!again.success);
    assert_eq!(again.message, MSG_NO_LOG_TO_DELETE);
}
