// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试范围: 默认值、global 覆写、格式错误回退、快照
// ==========================================


use prazo::config::{config_keys, ConfigManager, ConfigReader, ReportConfig};
use prazo::engine::ReferenceClock;
use test_helpers::{create_test_db, insert_test_config, open_test_connection};

#[tokio::test]
async fn test_config_默认值() {
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    assert_eq!(manager.get_near_expiration_alert_threshold().await.unwrap(), 10);
    assert_eq!(manager.get_top_categories_limit().await.unwrap(), 10);
    assert_eq!(manager.get_expiring_window_days().await.unwrap(), 29);
    assert_eq!(manager.get_default_locale().await.unwrap(), "en");
    assert_eq!(manager.get_reference_clock().await.unwrap(), ReferenceClock::Utc);
    assert_eq!(
        manager.get_import_date_formats().await.unwrap(),
        vec!["%Y-%m-%d".to_string(), "%d/%m/%Y".to_string()]
    );
}

#[tokio::test]
async fn test_config_global覆写() {
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    insert_test_config(&conn, config_keys::NEAR_EXPIRATION_ALERT_THRESHOLD, "3").unwrap();
    insert_test_config(&conn, config_keys::DEFAULT_LOCALE, "pt_br").unwrap();
    insert_test_config(&conn, config_keys::REFERENCE_TIMEZONE, "local").unwrap();
    insert_test_config(&conn, config_keys::IMPORT_DATE_FORMATS, " %d.%m.%Y , ,%Y/%m/%d").unwrap();

    let manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");
    let config = ReportConfig::load(&manager).await.expect("配置加载失败");

    assert_eq!(config.near_expiration_alert_threshold, 3);
    assert_eq!(config.default_locale, "pt-BR");
    assert_eq!(config.reference_clock, ReferenceClock::Local);
    assert_eq!(
        config.import_date_formats,
        vec!["%d.%m.%Y".to_string(), "%Y/%m/%d".to_string()]
    );
}

#[tokio::test]
async fn test_config_格式错误回退默认值() {
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    insert_test_config(&conn, config_keys::TOP_CATEGORIES_LIMIT, "abc").unwrap();
    insert_test_config(&conn, config_keys::EXPIRING_WINDOW_DAYS, "-7").unwrap();
    insert_test_config(&conn, config_keys::DEFAULT_LOCALE, "fr").unwrap();
    insert_test_config(&conn, config_keys::IMPORT_DATE_FORMATS, " , ").unwrap();

    let manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    assert_eq!(manager.get_top_categories_limit().await.unwrap(), 10);
    assert_eq!(manager.get_expiring_window_days().await.unwrap(), 0);
    assert_eq!(manager.get_default_locale().await.unwrap(), "en");
    assert_eq!(manager.get_import_date_formats().await.unwrap().len(), 2);
}

#[test]
fn test_config_写入与快照() {
    let (_temp, db_path) = create_test_db().expect("Failed to create test db");
    let manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    manager
        .set_global_config_value(config_keys::TOP_CATEGORIES_LIMIT, "5")
        .expect("配置写入失败");
    manager
        .set_global_config_value(config_keys::TOP_CATEGORIES_LIMIT, "7")
        .expect("配置写入失败");
    assert_eq!(
        manager.get_config_value(config_keys::TOP_CATEGORIES_LIMIT).unwrap(),
        Some("7".to_string())
    );
    assert_eq!(
        manager.get_config_or_default("missing_key", "fallback").unwrap(),
        "fallback"
    );
    assert!(manager.set_global_config_value("  ", "x").is_err());

    let snapshot: serde_json::Value =
        serde_json::from_str(&manager.get_config_snapshot().unwrap()).expect("快照不是合法 JSON");
    assert_eq!(snapshot[config_keys::TOP_CATEGORIES_LIMIT], "7");
}
