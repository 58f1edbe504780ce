// ==========================================
// Prazo 零售库存系统 - 配置读取 Trait
// ==========================================
// 职责: 定义报表/导入所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::engine::expiration::ReferenceClock;
use async_trait::async_trait;
use std::error::Error;

pub type ConfigError = Box<dyn Error + Send + Sync>;

// ==========================================
// ConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ConfigReader: Send + Sync {
    // ===== 报表配置 =====

    /// 临期商品告警阈值
    ///
    /// # 默认值
    /// - 10
    ///
    /// # 用途
    /// - 临期数量超过该值时,指标趋势为 Down
    async fn get_near_expiration_alert_threshold(&self) -> Result<usize, ConfigError>;

    /// 热销类目 Top N
    ///
    /// # 默认值
    /// - 10
    async fn get_top_categories_limit(&self) -> Result<usize, ConfigError>;

    /// 临期告警清单的天数窗口（含）
    ///
    /// # 默认值
    /// - 29（申报报损 + 紧急）
    async fn get_expiring_window_days(&self) -> Result<i64, ConfigError>;

    // ===== 本地化与时区 =====

    /// 默认显示语言
    ///
    /// # 默认值
    /// - en
    async fn get_default_locale(&self) -> Result<String, ConfigError>;

    /// "今天"的时区口径
    ///
    /// # 默认值
    /// - UTC
    async fn get_reference_clock(&self) -> Result<ReferenceClock, ConfigError>;

    // ===== 导入配置 =====

    /// 导入时接受的日期格式（按顺序尝试）
    ///
    /// # 默认值
    /// - ["%Y-%m-%d", "%d/%m/%Y"]
    async fn get_import_date_formats(&self) -> Result<Vec<String>, ConfigError>;
}
