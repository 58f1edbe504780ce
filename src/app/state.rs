// ==========================================
// Prazo 零售库存系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::{DashboardApi, ImportApi, ProductApi};
use crate::config::{ConfigManager, ConfigReader};
use crate::db::{initialize_schema, open_sqlite_connection, read_schema_version, CURRENT_SCHEMA_VERSION};
use crate::repository::{ProductRepository, PromotionRepository, StoreRepository};

/// 应用状态
///
/// 包含所有API实例和共享资源,所有仓储共享同一数据库连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 驾驶舱API
    pub dashboard_api: Arc<DashboardApi>,

    /// 商品API
    pub product_api: Arc<ProductApi>,

    /// 入库导入API
    pub import_api: Arc<ImportApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并建表（幂等）
    /// 2. 初始化所有Repository
    /// 3. 创建所有API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        initialize_schema(&conn).map_err(|e| format!("数据库初始化失败: {}", e))?;
        match read_schema_version(&conn) {
            Ok(Some(version)) if version > CURRENT_SCHEMA_VERSION => tracing::warn!(
                version,
                expected = CURRENT_SCHEMA_VERSION,
                "数据库 schema_version 高于当前程序版本"
            ),
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "无法读取 schema_version"),
        }
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let product_repo = Arc::new(ProductRepository::from_connection(conn.clone()));
        let store_repo = Arc::new(StoreRepository::from_connection(conn.clone()));
        let promotion_repo = Arc::new(PromotionRepository::from_connection(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let config_reader: Arc<dyn ConfigReader> = config_manager.clone();

        // ==========================================
        // 初始化API层
        // ==========================================
        let dashboard_api = Arc::new(DashboardApi::new(
            product_repo.clone(),
            store_repo.clone(),
            config_reader.clone(),
        ));
        let product_api = Arc::new(ProductApi::new(
            product_repo.clone(),
            store_repo.clone(),
            promotion_repo,
            config_reader.clone(),
        ));
        let import_api = Arc::new(ImportApi::new(product_repo, store_repo, config_reader));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            config_manager,
            dashboard_api,
            product_api,
            import_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 PRAZO_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var("PRAZO_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./prazo.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("prazo");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("prazo.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Viewer;

    #[test]
    fn test_app_state_initializes_schema() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let db_path = temp.path().to_str().unwrap().to_string();

        let state = AppState::new(db_path.clone()).unwrap();
        assert_eq!(state.db_path, db_path);
        assert!(state.product_api.list_stores(&Viewer::manager()).unwrap().is_empty());

        // 重复打开同一数据库
        assert!(AppState::new(db_path).is_ok());
    }
}
