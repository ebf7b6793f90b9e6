// ==========================================
// ReportApi 集成测试
// ==========================================
// 测试范围:
// 1. 生产报表: 日期闭区间 / 班次 / 成品类型过滤
// 2. 销售报表: 按客户聚合
// 3. 出材率报表
// 4. 报表快照保存与读取
// ==========================================

mod helpers;

use helpers::api_test_helper::*;
use sawmill_ops::api::ApiError;
use sawmill_ops::domain::report::ReportMetric;
use sawmill_ops::{Dimensions, Role};

struct Plant {
    env: ApiTestEnv,
    user_id: String,
    raw_id: String,
    plank_id: String,
    beam_id: String,
}

/// 两种成品: Plank(库存 50) / Beam(库存 20)
fn plant() -> Plant {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let user = env.seed_user("Op", "op@example.com", Role::Operator);
    let raw = env.seed_raw("Oak", 200);
    let plank = env.seed_finished("Plank", 50, "A");
    let beam = env.seed_finished("Beam", 20, "B");
    Plant {
        user_id: user.user_id,
        raw_id: raw.raw_material_id,
        plank_id: plank.finished_product_id,
        beam_id: beam.finished_product_id,
        env,
    }
}

impl Plant {
    fn record(&self, finished_id: &str, qty: i64, shift: &str, at: &str) {
        self.env.seed_record(
            ProductionRecordBuilder::new(&self.user_id, &self.raw_id, finished_id)
                .quantity(qty)
                .shift(shift)
                .created_at(dt(at))
                .build(),
        );
    }
}

// ==========================================
// 生产报表
// ==========================================

#[test]
fn test_get_production_report_全部() {
    let p = plant();
    p.record(&p.plank_id, 10, "Day", "2024-04-01 09:00:00");
    p.record(&p.beam_id, 5, "Night", "2024-04-02 23:30:00");
    p.record(&p.plank_id, 99, "Day", "2024-04-03 00:00:01");

    let report = p
        .env
        .report_api
        .get_production_report(d("2024-04-01"), d("2024-04-02"), None, None)
        .expect("生成报表失败");

    assert_eq!(report.total_volume, 15);
    assert_eq!(report.shift, "All Shifts");
    assert_eq!(report.additional_details.product_type, "All Types");
    assert_eq!(report.additional_details.number_of_days, 2);
    assert_eq!(report.date, d("2024-04-01"));
    // (10/50 + 5/20) / 2 × 100
    assert!(approx_eq(report.yield_percentage, 22.5));
}

#[test]
fn test_get_production_report_班次与类型过滤() {
    let p = plant();
    p.record(&p.plank_id, 10, "Day", "2024-04-01 09:00:00");
    p.record(&p.plank_id, 20, "Night", "2024-04-01 21:00:00");
    p.record(&p.beam_id, 5, "Day", "2024-04-01 10:00:00");

    let day = p
        .env
        .report_api
        .get_production_report(d("2024-04-01"), d("2024-04-01"), Some("Day"), None)
        .expect("生成报表失败");
    assert_eq!(day.total_volume, 15);
    assert_eq!(day.shift, "Day");
    assert_eq!(day.additional_details.number_of_days, 1);

    let planks = p
        .env
        .report_api
        .get_production_report(d("2024-04-01"), d("2024-04-01"), None, Some("Plank"))
        .expect("生成报表失败");
    assert_eq!(planks.total_volume, 30);
    assert_eq!(planks.additional_details.product_type, "Plank");
}

#[test]
fn test_get_production_report_无记录与日期倒置() {
    let p = plant();

    let empty = p
        .env
        .report_api
        .get_production_report(d("2024-01-01"), d("2024-01-31"), None, None)
        .expect("生成报表失败");
    assert_eq!(empty.total_volume, 0);
    assert!(approx_eq(empty.yield_percentage, 0.0));

    let err = p
        .env
        .report_api
        .get_production_report(d("2024-02-01"), d("2024-01-01"), None, None)
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

// ==========================================
// 销售报表
// ==========================================

#[test]
fn test_get_sales_report_按客户聚合() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let a = env.seed_customer("A", "a@example.com", "1");
    let b = env.seed_customer("B", "b@example.com", "2");

    let quote_for = |customer_id: &str, qty: i64| {
        env.pricing_api
            .create_quote(customer_id, Dimensions::new(1.0, 1.0, 1.0), "A", qty)
            .expect("报价失败")
            .quote_id
    };

    // 2.5 × qty
    let invoices = [
        (&a.customer_id, 4, "2024-06-01"),
        (&a.customer_id, 2, "2024-06-10"),
        (&b.customer_id, 10, "2024-06-15"),
        (&b.customer_id, 10, "2024-07-15"),
    ];
    for (customer_id, qty, issued) in invoices {
        let quote_id = quote_for(customer_id, qty);
        env.invoice_api
            .create_invoice(customer_id, &[quote_id], d(issued), d(issued))
            .expect("开票失败");
    }

    let report = env
        .report_api
        .get_sales_report(d("2024-06-01"), d("2024-06-30"), None)
        .expect("生成报表失败");

    assert!(approx_eq(report.total_revenue, 40.0));
    assert_eq!(report.customers.len(), 2);

    let sales_a = report
        .customers
        .iter()
        .find(|c| c.customer_id == a.customer_id)
        .expect("应包含客户A");
    assert!(approx_eq(sales_a.total_revenue, 15.0));
    assert_eq!(sales_a.sales_dates, vec![d("2024-06-01"), d("2024-06-10")]);

    let only_b = env
        .report_api
        .get_sales_report(d("2024-06-01"), d("2024-07-31"), Some(&b.customer_id))
        .expect("生成报表失败");
    assert_eq!(only_b.customers.len(), 1);
    assert!(approx_eq(only_b.total_revenue, 50.0));
}

// ==========================================
// 出材率报表
// ==========================================

#[test]
fn test_get_yield_report() {
    let p = plant();
    let pine = p.env.seed_raw("Pine", 100);
    p.record(&p.plank_id, 40, "Day", "2024-04-01 09:00:00");
    p.record(&p.beam_id, 20, "Day", "2024-04-01 10:00:00");
    p.env.seed_record(
        ProductionRecordBuilder::new(&p.user_id, &pine.raw_material_id, &p.plank_id)
            .quantity(50)
            .created_at(dt("2024-04-05 10:00:00"))
            .build(),
    );

    // 原材料按去重计: 200 + 100
    let all = p
        .env
        .report_api
        .get_yield_report(None, None, None)
        .expect("生成报表失败");
    assert_eq!(all.batch_id, "All");
    assert_eq!(all.finished_product_output, 110);
    assert_eq!(all.raw_material_used, 300);

    let oak = p
        .env
        .report_api
        .get_yield_report(Some(&p.raw_id), None, None)
        .expect("生成报表失败");
    assert_eq!(oak.batch_id, p.raw_id);
    assert_eq!(oak.finished_product_output, 60);
    assert_eq!(oak.raw_material_used, 200);
    assert!(approx_eq(oak.yield_percentage, 30.0));

    let window = p
        .env
        .report_api
        .get_yield_report(None, Some(dt("2024-04-02 00:00:00")), Some(dt("2024-04-30 00:00:00")))
        .expect("生成报表失败");
    assert_eq!(window.finished_product_output, 50);
    assert!(approx_eq(window.yield_percentage, 50.0));
}

#[test]
fn test_get_yield_report_无数据() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let report = env
        .report_api
        .get_yield_report(Some("missing"), None, None)
        .expect("生成报表失败");
    assert_eq!(report.raw_material_used, 0);
    assert!(approx_eq(report.yield_percentage, 0.0));
}

// ==========================================
// 报表快照
// ==========================================

#[test]
fn test_fetch_reports_无快照() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let response = env.report_api.fetch_reports("sales").expect("读取失败");
    assert_eq!(response.summary, "No reports found for sales");
    assert!(response.details.is_empty());
}

#[test]
fn test_save_report_后读取() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let metric = ReportMetric {
        metric: "boards_cut".to_string(),
        value: 1250.0,
        timestamp: "2024-04-01T00:00:00".to_string(),
    };

    let saved = env
        .report_api
        .save_report("production", vec![metric.clone()])
        .expect("保存失败");
    assert_eq!(saved.report_type, "production");
    assert_eq!(count_rows(&env.conn, "report"), 1);

    let response = env.report_api.fetch_reports("production").expect("读取失败");
    assert_eq!(response.summary, "Latest production report");
    assert_eq!(response.details, vec![metric]);

    assert!(matches!(
        env.report_api.save_report(" ", Vec::new()),
        Err(ApiError::InvalidInput(_))
    ));
}
