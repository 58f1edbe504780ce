// ==========================================
// Prazo 零售库存系统 - 报表配置快照
// ==========================================
// 职责: 一次性读取配置,交给引擎/API 使用
// ==========================================

use crate::config::config_manager::defaults;
use crate::config::config_reader_trait::{ConfigError, ConfigReader};
use crate::engine::expiration::ReferenceClock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub near_expiration_alert_threshold: usize,
    pub top_categories_limit: usize,
    pub expiring_window_days: i64,
    pub default_locale: String,
    pub reference_clock: ReferenceClock,
    pub import_date_formats: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            near_expiration_alert_threshold: defaults::NEAR_EXPIRATION_ALERT_THRESHOLD,
            top_categories_limit: defaults::TOP_CATEGORIES_LIMIT,
            expiring_window_days: defaults::EXPIRING_WINDOW_DAYS,
            default_locale: defaults::DEFAULT_LOCALE.to_string(),
            reference_clock: ReferenceClock::Utc,
            import_date_formats: defaults::IMPORT_DATE_FORMATS
                .split(',')
                .map(str::to_string)
                .collect(),
        }
    }
}

impl ReportConfig {
    /// 从配置读取器加载完整快照
    pub async fn load<C>(reader: &C) -> Result<Self, ConfigError>
    where
        C: ConfigReader + ?Sized,
    {
        Ok(Self {
            near_expiration_alert_threshold: reader.get_near_expiration_alert_threshold().await?,
            top_categories_limit: reader.get_top_categories_limit().await?,
            expiring_window_days: reader.get_expiring_window_days().await?,
            default_locale: reader.get_default_locale().await?,
            reference_clock: reader.get_reference_clock().await?,
            import_date_formats: reader.get_import_date_formats().await?,
        })
    }
}
