// ==========================================
// InvoiceApi 集成测试
// ==========================================
// 测试范围:
// 1. 开票: 金额 = Σ 单价 × 数量
// 2. 校验: 客户 / 报价单不存在、日期倒置
// 3. 查询: 含客户与报价ID
// ==========================================

mod helpers;

use helpers::api_test_helper::*;
use sawmill_ops::api::ApiError;
use sawmill_ops::domain::types::Dimensions;

#[test]
fn test_create_invoice_多报价单汇总() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let customer = env.seed_customer("Oak", "oak@example.com", "1");
    env.seed_rate("2x4x8", "A", 5.0);

    let q1 = env
        .pricing_api
        .create_quote(&customer.customer_id, Dimensions::new(2.0, 4.0, 8.0), "A", 10)
        .expect("报价失败");
    let q2 = env
        .pricing_api
        .create_price_estimate("2x4x8", "A", 3)
        .expect("估算失败");

    let result = env
        .invoice_api
        .create_invoice(
            &customer.customer_id,
            &[q1.quote_id.clone(), q2.quote_id.clone()],
            d("2024-05-01"),
            d("2024-05-31"),
        )
        .expect("开票失败");

    // 2.5 × 10 + 5.0 × 3
    assert!(approx_eq(result.total_amount, 40.0));
    assert_eq!(result.customer_contact_id, customer.customer_id);

    let detail = env.invoice_api.get_invoice(&result.invoice_id).expect("查询失败");
    assert_eq!(detail.quote_ids.len(), 2);
    assert!(detail.quote_ids.contains(&q1.quote_id));
    assert_eq!(
        detail.customer_contact.map(|c| c.customer_id),
        Some(customer.customer_id)
    );
    assert_eq!(detail.invoice.issue_date, d("2024-05-01"));
}

#[test]
fn test_create_invoice_金额开票后固定() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let customer = env.seed_customer("Oak", "oak@example.com", "1");
    let quote = env
        .pricing_api
        .create_quote(&customer.customer_id, Dimensions::new(1.0, 1.0, 1.0), "A", 4)
        .expect("报价失败");

    let invoice = env
        .invoice_api
        .create_invoice(&customer.customer_id, &[quote.quote_id.clone()], d("2024-01-01"), d("2024-01-10"))
        .expect("开票失败");

    env.pricing_api
        .update_price_estimate(
            &quote.price_estimate_details.estimate_id,
            Dimensions::new(1.0, 1.0, 1.0),
            "A",
            100,
        )
        .expect("改价失败");

    let detail = env.invoice_api.get_invoice(&invoice.invoice_id).expect("查询失败");
    assert!(approx_eq(detail.invoice.total_amount, 10.0));
}

#[test]
fn test_create_invoice_空报价单() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let customer = env.seed_customer("Oak", "oak@example.com", "1");

    let result = env
        .invoice_api
        .create_invoice(&customer.customer_id, &[], d("2024-01-01"), d("2024-01-01"))
        .expect("开票失败");
    assert!(approx_eq(result.total_amount, 0.0));
}

#[test]
fn test_create_invoice_校验失败() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let customer = env.seed_customer("Oak", "oak@example.com", "1");

    let err = env
        .invoice_api
        .create_invoice("missing", &[], d("2024-01-01"), d("2024-01-02"))
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = env
        .invoice_api
        .create_invoice(
            &customer.customer_id,
            &["missing-quote".to_string()],
            d("2024-01-01"),
            d("2024-01-02"),
        )
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = env
        .invoice_api
        .create_invoice(&customer.customer_id, &[], d("2024-01-10"), d("2024-01-02"))
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    assert_eq!(count_rows(&env.conn, "invoice"), 0);
}

#[test]
fn test_get_invoice_不存在() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let err = env.invoice_api.get_invoice("missing").unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}
