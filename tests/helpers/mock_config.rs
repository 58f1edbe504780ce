// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use prazo::config::{ConfigError, ConfigReader};
use prazo::engine::ReferenceClock;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub near_expiration_alert_threshold: usize,
    pub top_categories_limit: usize,
    pub expiring_window_days: i64,
    pub default_locale: String,
    pub reference_clock: ReferenceClock,
    pub import_date_formats: Vec<String>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            near_expiration_alert_threshold: 10,
            top_categories_limit: 10,
            expiring_window_days: 29,
            default_locale: "en".to_string(),
            reference_clock: ReferenceClock::Utc,
            import_date_formats: vec!["%Y-%m-%d".to_string(), "%d/%m/%Y".to_string()],
        }
    }
}

impl MockConfig {
    /// 葡萄牙语配置
    pub fn portuguese() -> Self {
        Self {
            default_locale: "pt-BR".to_string(),
            ..Self::default()
        }
    }

    /// 自定义告警阈值
    pub fn with_threshold(threshold: usize) -> Self {
        Self {
            near_expiration_alert_threshold: threshold,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ConfigReader for MockConfig {
    async fn get_near_expiration_alert_threshold(&self) -> Result<usize, ConfigError> {
        Ok(self.near_expiration_alert_threshold)
    }

    async fn get_top_categories_limit(&self) -> Result<usize, ConfigError> {
        Ok(self.top_categories_limit)
    }

    async fn get_expiring_window_days(&self) -> Result<i64, ConfigError> {
        Ok(self.expiring_window_days)
    }

    async fn get_default_locale(&self) -> Result<String, ConfigError> {
        Ok(self.default_locale.clone())
    }

    async fn get_reference_clock(&self) -> Result<ReferenceClock, ConfigError> {
        Ok(self.reference_clock)
    }

    async fn get_import_date_formats(&self) -> Result<Vec<String>, ConfigError> {
        Ok(self.import_date_formats.clone())
    }
}
