// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用辅助函数
// ==========================================

#![allow(dead_code)]

#[path = "../test_helpers.rs"]
mod test_helpers;

use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;

use prazo::api::{ApiError, DashboardApi, ImportApi, ProductApi};
use prazo::config::{ConfigManager, ConfigReader};
use prazo::db::open_sqlite_connection;
use prazo::domain::{Product, Store};
use prazo::repository::{ProductRepository, PromotionRepository, StoreRepository};

use super::mock_config::MockConfig;
use super::test_data_builder::StoreBuilder;

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 包含所有API实例和必要的依赖,所有仓储共享同一连接
pub struct ApiTestEnv {
    pub db_path: String,
    pub dashboard_api: Arc<DashboardApi>,
    pub product_api: Arc<ProductApi>,
    pub import_api: Arc<ImportApi>,
    pub config_manager: Arc<ConfigManager>,

    // Repository层（用于测试数据准备）
    pub product_repo: Arc<ProductRepository>,
    pub store_repo: Arc<StoreRepository>,
    pub promotion_repo: Arc<PromotionRepository>,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    /// 创建测试环境（配置来自 config_kv 表）
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        Self::build(None)
    }

    /// 创建测试环境（使用 Mock 配置）
    pub fn with_config(config: MockConfig) -> Result<Self, Box<dyn std::error::Error>> {
        Self::build(Some(Arc::new(config)))
    }

    fn build(config: Option<Arc<dyn ConfigReader>>) -> Result<Self, Box<dyn std::error::Error>> {
        prazo::logging::init_test();
        let (temp_file, db_path) = test_helpers::create_test_db()?;
        let conn = Arc::new(Mutex::new(open_sqlite_connection(&db_path)?));

        let product_repo = Arc::new(ProductRepository::from_connection(conn.clone()));
        let store_repo = Arc::new(StoreRepository::from_connection(conn.clone()));
        let promotion_repo = Arc::new(PromotionRepository::from_connection(conn.clone()));
        let config_manager = Arc::new(ConfigManager::from_connection(conn).map_err(|e| e.to_string())?);

        let config_reader: Arc<dyn ConfigReader> = match config {
            Some(config) => config,
            None => config_manager.clone(),
        };

        let dashboard_api = Arc::new(DashboardApi::new(
            product_repo.clone(),
            store_repo.clone(),
            config_reader.clone(),
        ));
        let product_api = Arc::new(ProductApi::new(
            product_repo.clone(),
            store_repo.clone(),
            promotion_repo.clone(),
            config_reader.clone(),
        ));
        let import_api = Arc::new(ImportApi::new(
            product_repo.clone(),
            store_repo.clone(),
            config_reader,
        ));

        Ok(Self {
            db_path,
            dashboard_api,
            product_api,
            import_api,
            config_manager,
            product_repo,
            store_repo,
            promotion_repo,
            _temp_file: temp_file,
        })
    }

    // ==========================================
    // 测试数据准备
    // ==========================================

    /// 插入门店（按编码生成默认名称）
    pub fn seed_stores(&self, store_ids: &[&str]) -> Result<Vec<Store>, Box<dyn std::error::Error>> {
        let mut stores = Vec::with_capacity(store_ids.len());
        for store_id in store_ids {
            let store = StoreBuilder::new(store_id).build();
            self.store_repo.insert(&store)?;
            stores.push(store);
        }
        Ok(stores)
    }

    /// 插入商品
    pub fn seed_products(&self, products: &[Product]) -> Result<usize, Box<dyn std::error::Error>> {
        Ok(self.product_repo.batch_insert(products)?)
    }
}

// ==========================================
// 断言辅助
// ==========================================

/// 断言为 InvalidInput
pub fn assert_invalid_input<T: std::fmt::Debug>(result: Result<T, ApiError>) {
    match result {
        Err(ApiError::InvalidInput(_)) => {}
        other => panic!("期望 InvalidInput, 实际: {:?}", other),
    }
}

/// 断言为 NotFound
pub fn assert_not_found<T: std::fmt::Debug>(result: Result<T, ApiError>) {
    match result {
        Err(ApiError::NotFound(_)) => {}
        other => panic!("期望 NotFound, 实际: {:?}", other),
    }
}

/// 断言为 BusinessRuleViolation
pub fn assert_business_rule_violation<T: std::fmt::Debug>(result: Result<T, ApiError>) {
    match result {
        Err(ApiError::BusinessRuleViolation(_)) => {}
        other => panic!("期望 BusinessRuleViolation, 实际: {:?}", other),
    }
}
