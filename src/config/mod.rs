// ==========================================
// Prazo 零售库存系统 - 配置层
// ==========================================
// 职责: 系统配置管理（读取默认值 + global 覆写）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod config_reader_trait;
pub mod report_config;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use config_reader_trait::{ConfigError, ConfigReader};
pub use report_config::ReportConfig;
