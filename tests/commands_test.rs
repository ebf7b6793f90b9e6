// ==========================================
// 命令层集成测试
// ==========================================
// 测试范围:
// 1. 分发: 未知命令 / null 参数 / 参数格式错误
// 2. 错误映射: ApiError -> {"error", "code"}
// 3. 端到端: 用户 -> 客户 -> 报价 -> 开票
// ==========================================

use serde_json::{json, Value};
use tempfile::TempDir;

use sawmill_ops::app::{dispatch, AppState, ErrorResponse, COMMANDS};
use sawmill_ops::logging;

fn setup() -> (TempDir, AppState) {
    logging::init_test();
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let db_path = dir.path().join("sawmill.db");
    let state = AppState::new(db_path.to_string_lossy().to_string()).expect("初始化AppState失败");
    (dir, state)
}

async fn call(state: &AppState, command: &str, params: Value) -> Value {
    let body = dispatch(state, command, params)
        .await
        .unwrap_or_else(|e| panic!("命令 {} 失败: {}", command, e));
    serde_json::from_str(&body).expect("结果不是合法 JSON")
}

async fn call_err(state: &AppState, command: &str, params: Value) -> ErrorResponse {
    let err = dispatch(state, command, params)
        .await
        .expect_err("命令应返回错误");
    serde_json::from_str(&err).expect("错误不是合法 JSON")
}

// ==========================================
// 分发
// ==========================================

#[test]
fn test_commands_无重复() {
    let mut names: Vec<&str> = COMMANDS.to_vec();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), COMMANDS.len());
}

#[tokio::test]
async fn test_dispatch_未知命令() {
    let (_dir, state) = setup();
    let err = call_err(&state, "drop_everything", Value::Null).await;
    assert_eq!(err.code, "UNKNOWN_COMMAND");
}

#[tokio::test]
async fn test_dispatch_null参数() {
    let (_dir, state) = setup();

    let customers = call(&state, "list_customers", Value::Null).await;
    assert_eq!(customers, json!([]));

    // 所有字段可选的请求体接受 null
    let inventory = call(&state, "get_inventory_list", Value::Null).await;
    assert_eq!(inventory, json!([]));
}

#[tokio::test]
async fn test_dispatch_参数格式错误() {
    let (_dir, state) = setup();

    let err = call_err(&state, "create_customer", json!({ "name": "Oak" })).await;
    assert_eq!(err.code, "INVALID_INPUT");

    let err = call_err(
        &state,
        "create_invoice",
        json!({
            "customer_id": "c",
            "quote_ids": [],
            "issue_date": "01/02/2024",
            "due_date": "2024-02-01"
        }),
    )
    .await;
    assert_eq!(err.code, "INVALID_INPUT");
}

// ==========================================
// 错误映射
// ==========================================

#[tokio::test]
async fn test_dispatch_错误码() {
    let (_dir, state) = setup();

    let err = call_err(&state, "get_customer", json!({ "customer_id": "missing" })).await;
    assert_eq!(err.code, "NOT_FOUND");

    let err = call_err(
        &state,
        "create_price_estimate",
        json!({ "dimensions": "2x4x8", "grade": "A", "quantity": 1 }),
    )
    .await;
    assert_eq!(err.code, "NO_RATE_AVAILABLE");

    let err = call_err(
        &state,
        "add_inventory_item",
        json!({ "item_type": "Sawdust", "quantity": 1, "unit": "kg" }),
    )
    .await;
    assert_eq!(err.code, "UNSUPPORTED_TYPE");

    let err = call_err(&state, "start_backup", Value::Null).await;
    assert_eq!(err.code, "UNAUTHORIZED");

    let err = call_err(&state, "list_maintenance_logs", json!({ "role": "OPERATOR" })).await;
    assert_eq!(err.code, "PERMISSION_DENIED");

    let err = call_err(&state, "list_maintenance_logs", json!({ "role": "JANITOR" })).await;
    assert_eq!(err.code, "PERMISSION_DENIED");

    let err = call_err(
        &state,
        "create_user",
        json!({ "name": "X", "email": "x@example.com", "role": "WIZARD" }),
    )
    .await;
    assert_eq!(err.code, "INVALID_INPUT");
}

#[tokio::test]
async fn test_dispatch_唯一性冲突() {
    let (_dir, state) = setup();
    let customer = json!({ "name": "Oak", "email": "oak@example.com", "phone": "1" });

    call(&state, "create_customer", customer.clone()).await;
    let err = call_err(&state, "create_customer", customer).await;
    assert_eq!(err.code, "UNIQUENESS_VIOLATION");
}

// ==========================================
// 端到端
// ==========================================

#[tokio::test]
async fn test_dispatch_报价到开票() {
    let (_dir, state) = setup();

    let admin = call(
        &state,
        "create_user",
        json!({ "name": "Root", "email": "system_admin@example.com", "role": "SYSTEM_ADMINISTRATOR" }),
    )
    .await;
    assert!(admin["user_id"].is_string());

    let backup = call(&state, "start_backup", Value::Null).await;
    assert_eq!(backup["status"], "Success");

    let customer = call(
        &state,
        "create_customer",
        json!({ "name": "Oak", "email": "oak@example.com", "phone": "1" }),
    )
    .await;
    let customer_id = customer["customer_id"].as_str().expect("缺少 customer_id").to_string();

    let quote = call(
        &state,
        "create_quote",
        json!({
            "customer_id": customer_id,
            "dimensions": { "length": 2.0, "width": 4.0, "height": 8.0 },
            "grade": "A",
            "quantity": 10
        }),
    )
    .await;
    let quote_id = quote["quote_id"].as_str().expect("缺少 quote_id").to_string();
    assert_eq!(quote["price_estimate_details"]["dimensions"], "2x4x8");

    let invoice = call(
        &state,
        "create_invoice",
        json!({
            "customer_id": customer_id,
            "quote_ids": [quote_id],
            "issue_date": "2024-06-01",
            "due_date": "2024-06-30"
        }),
    )
    .await;
    assert_eq!(invoice["total_amount"].as_f64(), Some(25.0));

    let detail = call(&state, "get_customer", json!({ "customer_id": customer_id })).await;
    assert_eq!(detail["quotes"].as_array().map(Vec::len), Some(1));
    assert_eq!(detail["invoices"].as_array().map(Vec::len), Some(1));

    let sales = call(
        &state,
        "get_sales_report",
        json!({ "start_date": "2024-06-01", "end_date": "2024-06-30" }),
    )
    .await;
    assert_eq!(sales["total_revenue"].as_f64(), Some(25.0));
}

#[tokio::test]
async fn test_dispatch_配置更新() {
    let (_dir, state) = setup();

    let updated = call(
        &state,
        "update_config",
        json!({ "key": "pricing.flat_rate", "value": "3.0" }),
    )
    .await;
    assert_eq!(updated["value"], "3.0");

    let config = call(&state, "get_config", json!({ "key": "pricing.flat_rate" })).await;
    assert_eq!(config["value"], "3.0");
}
