// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持英文（默认）、葡萄牙语（巴西）、中文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// 引擎路径一律显式传入 locale,不依赖全局语言状态
// ==========================================

use crate::domain::types::{ExpirationCategory, MetricKind};

/// 默认语言
pub const DEFAULT_LOCALE: &str = "en";

/// 支持的语言列表
pub const SUPPORTED_LOCALES: [&str; 3] = ["en", "pt-BR", "zh-CN"];

/// 规范化语言代码（不支持的语言回退到默认语言）
pub fn normalize_locale(locale: &str) -> &'static str {
    let wanted = locale.trim().replace('_', "-");
    SUPPORTED_LOCALES
        .iter()
        .find(|l| l.eq_ignore_ascii_case(&wanted))
        .copied()
        .unwrap_or(DEFAULT_LOCALE)
}

/// 翻译消息（指定语言）
pub fn t_in(key: &str, locale: &str) -> String {
    let locale = normalize_locale(locale);
    rust_i18n::t!(key, locale = locale).to_string()
}

/// 翻译消息（指定语言,带参数）
pub fn t_in_with_args(key: &str, locale: &str, args: &[(&str, &str)]) -> String {
    replace_args(t_in(key, locale), args)
}

fn replace_args(mut result: String, args: &[(&str, &str)]) -> String {
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 临期等级显示名
pub fn category_label(category: ExpirationCategory, locale: &str) -> String {
    t_in(&format!("expiration.category.{}", category.key()), locale)
}

/// 指标显示名
pub fn metric_label(kind: MetricKind, locale: &str) -> String {
    t_in(&format!("metric.{}", kind.key()), locale)
}
