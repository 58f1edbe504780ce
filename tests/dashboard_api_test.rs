// ==========================================
// DashboardApi 集成测试
// ==========================================
// 测试范围:
// 1. 临期报表 / 指标 / 趋势 / 品类排行
// 2. 门店员工的数据范围限定
// 3. 区间校验与上一周期对比
// 4. 完整驾驶舱快照
// ==========================================

mod helpers;

use helpers::api_test_helper::{assert_invalid_input, ApiTestEnv};
use helpers::mock_config::MockConfig;
use helpers::test_data_builder::{one_per_category, ProductBuilder};
use prazo::api::DashboardQuery;
use prazo::config::config_keys;
use prazo::domain::{DateRange, ExpirationCategory, MetricKind, TrendDirection, Viewer};
use test_helpers::{d, test_today};

fn manager_query() -> DashboardQuery {
    DashboardQuery::for_viewer(Viewer::manager()).with_today(test_today())
}

fn store_query(store_id: &str) -> DashboardQuery {
    DashboardQuery::for_viewer(Viewer::store(store_id)).with_today(test_today())
}

/// 两家门店: S1 五级各一件, S2 两件临期 + 三件已售
fn setup_env() -> ApiTestEnv {
    let env = ApiTestEnv::new().expect("Failed to create test env");
    env.seed_stores(&["S1", "S2"]).expect("Failed to seed stores");

    let today = test_today();
    let mut products = one_per_category(today, "S1");
    products.push(ProductBuilder::new("S2-A").store("S2").expires_in(today, 2).build());
    products.push(ProductBuilder::new("S2-B").store("S2").expires_in(today, -3).build());
    products.push(
        ProductBuilder::new("S2-C")
            .store("S2")
            .category("Bebidas")
            .current_price(8.0)
            .sold_on(d(2026, 1, 28))
            .build(),
    );
    products.push(
        ProductBuilder::new("S2-D")
            .store("S2")
            .category("Bebidas")
            .current_price(4.0)
            .sold_on(d(2026, 1, 30))
            .build(),
    );
    products.push(
        ProductBuilder::new("S2-E")
            .store("S2")
            .category("Frios")
            .current_price(6.0)
            .sold_on(d(2026, 1, 20))
            .build(),
    );
    env.seed_products(&products).expect("Failed to seed products");
    env
}

// ==========================================
// 临期报表
// ==========================================

#[tokio::test]
async fn test_get_expiration_report_管理者全部门店() {
    let env = setup_env();

    let report = env
        .dashboard_api
        .get_expiration_report(&manager_query())
        .await
        .expect("报表查询失败");

    assert_eq!(report.len(), 5);
    assert_eq!(report[0].category, ExpirationCategory::DeclareWriteOff);
    assert_eq!(report[0].count, 3);
    assert_eq!(report.iter().map(|r| r.count).sum::<usize>(), 7);
}

#[tokio::test]
async fn test_get_expiration_report_门店员工仅本门店() {
    let env = setup_env();

    // 请求其他门店也会被限定为本门店
    let query = store_query("S1").with_store("S2");
    let report = env
        .dashboard_api
        .get_expiration_report(&query)
        .await
        .expect("报表查询失败");

    assert!(report.iter().all(|r| r.count == 1));
    assert!(report.iter().all(|r| r.percentage == 20));
}

#[tokio::test]
async fn test_get_expiration_report_空结果() {
    let env = ApiTestEnv::new().expect("Failed to create test env");

    let report = env
        .dashboard_api
        .get_expiration_report(&manager_query())
        .await
        .expect("报表查询失败");

    assert_eq!(report.len(), 5);
    assert!(report.iter().all(|r| r.count == 0 && r.percentage == 0));
}

#[tokio::test]
async fn test_get_expiration_report_葡萄牙语标签() {
    let env = ApiTestEnv::with_config(MockConfig::portuguese()).expect("Failed to create test env");

    let report = env
        .dashboard_api
        .get_expiration_report(&manager_query())
        .await
        .expect("报表查询失败");

    assert_ne!(report[0].label, "Declare write-off");

    let english = env
        .dashboard_api
        .get_expiration_report(&manager_query().with_locale("en"))
        .await
        .expect("报表查询失败");
    assert_eq!(english[0].label, "Declare write-off");
}

#[tokio::test]
async fn test_门店员工未指定门店_返回无效输入() {
    let env = setup_env();
    let mut viewer = Viewer::store("S1");
    viewer.store_id = None;

    let result = env
        .dashboard_api
        .get_expiration_report(&DashboardQuery::for_viewer(viewer).with_today(test_today()))
        .await;
    assert_invalid_input(result);
}

// ==========================================
// 指标
// ==========================================

#[tokio::test]
async fn test_get_metrics_管理者() {
    let env = setup_env();

    let metrics = env
        .dashboard_api
        .get_metrics(&manager_query())
        .await
        .expect("指标查询失败");

    let value = |kind: MetricKind| metrics.iter().find(|m| m.kind == kind).map(|m| m.value);
    assert_eq!(value(MetricKind::InStock), Some(7.0));
    assert_eq!(value(MetricKind::Sold), Some(3.0));
    assert_eq!(value(MetricKind::Revenue), Some(18.0));
    assert_eq!(value(MetricKind::NearExpiration), Some(4.0));
    assert_eq!(value(MetricKind::AverageTicket), Some(6.0));

    // 无区间时不做周期对比
    assert!(metrics.iter().all(|m| m.change_percent.is_none()));
}

#[tokio::test]
async fn test_get_metrics_区间对比上一周期() {
    let env = setup_env();

    // 本期 1/27-1/31: 两件（8+4）;上期 1/22-1/26: 一件（6）
    env.seed_products(&[ProductBuilder::new("S2-F")
        .store("S2")
        .current_price(6.0)
        .sold_on(d(2026, 1, 24))
        .build()])
        .expect("Failed to seed products");

    let query = manager_query().with_range(DateRange::new(d(2026, 1, 27), d(2026, 1, 31)));
    let metrics = env.dashboard_api.get_metrics(&query).await.expect("指标查询失败");

    let sold = metrics.iter().find(|m| m.kind == MetricKind::Sold).expect("已售指标");
    assert_eq!(sold.value, 2.0);
    assert_eq!(sold.change_percent, Some(100.0));
    assert_eq!(sold.trend, TrendDirection::Up);

    let revenue = metrics.iter().find(|m| m.kind == MetricKind::Revenue).expect("销售额指标");
    assert_eq!(revenue.value, 12.0);
    assert_eq!(revenue.change_percent, Some(100.0));

    let in_stock = metrics.iter().find(|m| m.kind == MetricKind::InStock).expect("在库指标");
    assert_eq!(in_stock.change_percent, None);
}

#[tokio::test]
async fn test_get_metrics_临期告警阈值来自配置() {
    let env = ApiTestEnv::with_config(MockConfig::with_threshold(1)).expect("Failed to create test env");
    env.seed_stores(&["S1"]).expect("Failed to seed stores");
    env.seed_products(&one_per_category(test_today(), "S1"))
        .expect("Failed to seed products");

    let metrics = env.dashboard_api.get_metrics(&manager_query()).await.expect("指标查询失败");
    let near = metrics
        .iter()
        .find(|m| m.kind == MetricKind::NearExpiration)
        .expect("临期指标");
    assert_eq!(near.value, 2.0);
    assert_eq!(near.trend, TrendDirection::Down);
}

#[tokio::test]
async fn test_get_metrics_无效区间() {
    let env = setup_env();
    let query = manager_query().with_range(DateRange::new(d(2026, 2, 1), d(2026, 1, 1)));

    assert_invalid_input(env.dashboard_api.get_metrics(&query).await);
    assert_invalid_input(env.dashboard_api.get_dashboard(&query).await);
}

// ==========================================
// 销售趋势与品类排行
// ==========================================

#[tokio::test]
async fn test_get_sales_trend_区间内按日升序() {
    let env = setup_env();

    let query = manager_query().with_range(DateRange::new(d(2026, 1, 25), d(2026, 1, 31)));
    let trend = env.dashboard_api.get_sales_trend(&query).await.expect("趋势查询失败");

    assert_eq!(trend.len(), 2);
    assert_eq!(trend[0].date, d(2026, 1, 28));
    assert_eq!(trend[0].revenue, 8.0);
    assert_eq!(trend[1].date, d(2026, 1, 30));
}

#[tokio::test]
async fn test_get_top_categories_默认与指定条数() {
    let env = setup_env();

    let top = env
        .dashboard_api
        .get_top_categories(&manager_query(), None)
        .await
        .expect("排行查询失败");
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].category, "Bebidas");
    assert_eq!(top[0].count, 2);

    let top1 = env
        .dashboard_api
        .get_top_categories(&manager_query(), Some(1))
        .await
        .expect("排行查询失败");
    assert_eq!(top1.len(), 1);
}

#[tokio::test]
async fn test_get_top_categories_门店员工空结果() {
    let env = setup_env();

    let top = env
        .dashboard_api
        .get_top_categories(&store_query("S1"), None)
        .await
        .expect("排行查询失败");
    assert!(top.is_empty());
}

// ==========================================
// 临期清单与门店概览
// ==========================================

#[tokio::test]
async fn test_list_expiring_products_按剩余天数排序() {
    let env = setup_env();

    let items = env
        .dashboard_api
        .list_expiring_products(&manager_query(), None)
        .await
        .expect("临期清单查询失败");

    // 默认窗口 29 天: -3, 2, 5, 20
    let days: Vec<i64> = items.iter().map(|i| i.days_remaining).collect();
    assert_eq!(days, vec![-3, 2, 5, 20]);
    assert_eq!(items[0].remaining_text, "Expired 3 days ago");

    let narrow = env
        .dashboard_api
        .list_expiring_products(&manager_query(), Some(0))
        .await
        .expect("临期清单查询失败");
    assert_eq!(narrow.len(), 1);
}

#[tokio::test]
async fn test_list_expiring_products_窗口来自配置() {
    let env = setup_env();
    env.config_manager
        .set_global_config_value(config_keys::EXPIRING_WINDOW_DAYS, "45")
        .expect("配置写入失败");

    let items = env
        .dashboard_api
        .list_expiring_products(&manager_query(), None)
        .await
        .expect("临期清单查询失败");
    assert_eq!(items.len(), 5);
}

#[tokio::test]
async fn test_get_store_overview_管理者与门店员工() {
    let env = setup_env();

    let all = env
        .dashboard_api
        .get_store_overview(&manager_query())
        .await
        .expect("门店概览查询失败");
    assert_eq!(all.len(), 2);
    let s2 = all.iter().find(|o| o.store.store_id == "S2").expect("S2 概览");
    assert_eq!(s2.in_stock, 2);
    assert_eq!(s2.near_expiration, 2);
    assert_eq!(s2.stock_value, 20.0);

    let own = env
        .dashboard_api
        .get_store_overview(&store_query("S1"))
        .await
        .expect("门店概览查询失败");
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].store.store_id, "S1");
    assert_eq!(own[0].in_stock, 5);
}

// ==========================================
// 完整快照
// ==========================================

#[tokio::test]
async fn test_get_dashboard_快照一致() {
    let env = setup_env();

    let snapshot = env
        .dashboard_api
        .get_dashboard(&manager_query().with_store("S2"))
        .await
        .expect("驾驶舱查询失败");

    assert_eq!(snapshot.today, test_today());
    assert_eq!(snapshot.locale, "en");
    assert_eq!(snapshot.store_id.as_deref(), Some("S2"));
    assert_eq!(snapshot.expiration_report.iter().map(|r| r.count).sum::<usize>(), 2);
    assert_eq!(snapshot.metrics.len(), 6);
    assert_eq!(snapshot.sales_trend.len(), 3);
    assert_eq!(snapshot.top_categories[0].category, "Bebidas");
    assert_eq!(snapshot.expiring_products.len(), 2);
    assert_eq!(snapshot.store_overview.len(), 1);

    let json = serde_json::to_value(&snapshot).expect("序列化失败");
    assert_eq!(json["expiration_report"][0]["category"], "DECLARE_WRITE_OFF");
    assert_eq!(json["expiration_report"][0]["severity"], "danger");
}
