// ==========================================
// Prazo 零售库存系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::config_reader_trait::{ConfigError, ConfigReader};
use crate::db::open_sqlite_connection;
use crate::engine::expiration::ReferenceClock;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, ConfigError> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, ConfigError> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 读取配置值，不存在时返回默认值
    pub fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, ConfigError> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let key = key.trim();
        if key.is_empty() {
            return Err("配置键不能为空".into());
        }

        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at) VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        tracing::info!(config_key = key, value, "配置已更新");
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON格式,按键排序）
    pub fn get_config_snapshot(&self) -> Result<String, ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    fn parse_or_default<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr + Copy + std::fmt::Display,
    {
        let raw = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };
        match raw.trim().parse::<T>() {
            Ok(v) => Ok(v),
            Err(_) => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    default = %default,
                    "配置值格式错误，使用默认值"
                );
                Ok(default)
            }
        }
    }
}

// ==========================================
// ConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ConfigReader for ConfigManager {
    async fn get_near_expiration_alert_threshold(&self) -> Result<usize, ConfigError> {
        self.parse_or_default(
            config_keys::NEAR_EXPIRATION_ALERT_THRESHOLD,
            defaults::NEAR_EXPIRATION_ALERT_THRESHOLD,
        )
    }

    async fn get_top_categories_limit(&self) -> Result<usize, ConfigError> {
        self.parse_or_default(config_keys::TOP_CATEGORIES_LIMIT, defaults::TOP_CATEGORIES_LIMIT)
    }

    async fn get_expiring_window_days(&self) -> Result<i64, ConfigError> {
        let days =
            self.parse_or_default(config_keys::EXPIRING_WINDOW_DAYS, defaults::EXPIRING_WINDOW_DAYS)?;
        Ok(days.max(0))
    }

    async fn get_default_locale(&self) -> Result<String, ConfigError> {
        let value = self.get_config_or_default(config_keys::DEFAULT_LOCALE, defaults::DEFAULT_LOCALE)?;
        Ok(crate::i18n::normalize_locale(&value).to_string())
    }

    async fn get_reference_clock(&self) -> Result<ReferenceClock, ConfigError> {
        let value =
            self.get_config_or_default(config_keys::REFERENCE_TIMEZONE, defaults::REFERENCE_TIMEZONE)?;
        Ok(ReferenceClock::parse(&value))
    }

    async fn get_import_date_formats(&self) -> Result<Vec<String>, ConfigError> {
        let value =
            self.get_config_or_default(config_keys::IMPORT_DATE_FORMATS, defaults::IMPORT_DATE_FORMATS)?;

        let formats: Vec<String> = value
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if formats.is_empty() {
            Ok(defaults::IMPORT_DATE_FORMATS
                .split(',')
                .map(str::to_string)
                .collect())
        } else {
            Ok(formats)
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 报表
    pub const NEAR_EXPIRATION_ALERT_THRESHOLD: &str = "near_expiration_alert_threshold";
    pub const TOP_CATEGORIES_LIMIT: &str = "top_categories_limit";
    pub const EXPIRING_WINDOW_DAYS: &str = "expiring_window_days";

    // 本地化与时区
    pub const DEFAULT_LOCALE: &str = "default_locale";
    pub const REFERENCE_TIMEZONE: &str = "reference_timezone";

    // 导入
    pub const IMPORT_DATE_FORMATS: &str = "import_date_formats";
}

// ==========================================
// 配置默认值
// ==========================================
pub mod defaults {
    pub const NEAR_EXPIRATION_ALERT_THRESHOLD: usize = 10;
    pub const TOP_CATEGORIES_LIMIT: usize = 10;
    pub const EXPIRING_WINDOW_DAYS: i64 = 29;
    pub const DEFAULT_LOCALE: &str = "en";
    pub const REFERENCE_TIMEZONE: &str = "UTC";
    pub const IMPORT_DATE_FORMATS: &str = "%Y-%m-%d,%d/%m/%Y";
}
