// ==========================================
// Prazo 零售库存系统 - 临期分级引擎
// ==========================================
// 红线: 临期等级是"等级制",由剩余天数唯一决定
// 输入: 到期日 + 参考日期（今天）
// 输出: 剩余天数、临期等级、显示名、徽章严重度、剩余时间文案
// ==========================================
// 分级表（闭区间,覆盖全部整数）:
//   days ≤ 15        → DeclareWriteOff（含已过期）
//   16 ≤ days ≤ 29   → Emergency
//   30 ≤ days ≤ 59   → Urgent
//   60 ≤ days ≤ 89   → SlightlyUrgent
//   days ≥ 90        → UnderReview
// ==========================================

use crate::domain::types::{BadgeSeverity, ExpirationCategory};
use crate::i18n;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 申报报损上限（含）
pub const DECLARE_WRITE_OFF_MAX_DAYS: i64 = 15;
/// 紧急上限（含）
pub const EMERGENCY_MAX_DAYS: i64 = 29;
/// 急上限（含）
pub const URGENT_MAX_DAYS: i64 = 59;
/// 较急上限（含）
pub const SLIGHTLY_URGENT_MAX_DAYS: i64 = 89;

// ==========================================
// ReferenceClock - "今天"的时区口径
// ==========================================
// 到期日为纯日历日期;"今天"统一由此口径产生
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceClock {
    #[default]
    Utc,
    Local,
}

impl ReferenceClock {
    /// 从配置值解析（未知值回退 UTC）
    pub fn parse(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "LOCAL" => ReferenceClock::Local,
            _ => ReferenceClock::Utc,
        }
    }

    /// 当前日历日期
    pub fn today(&self) -> NaiveDate {
        match self {
            ReferenceClock::Utc => chrono::Utc::now().date_naive(),
            ReferenceClock::Local => chrono::Local::now().date_naive(),
        }
    }
}

// ==========================================
// ExpirationClassifier - 临期分级器
// ==========================================
#[derive(Debug, Clone)]
pub struct ExpirationClassifier {
    locale: &'static str,
}

impl Default for ExpirationClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpirationClassifier {
    /// 创建分级器（默认语言）
    pub fn new() -> Self {
        Self {
            locale: i18n::DEFAULT_LOCALE,
        }
    }

    /// 创建指定语言的分级器
    pub fn with_locale(locale: &str) -> Self {
        Self {
            locale: i18n::normalize_locale(locale),
        }
    }

    pub fn locale(&self) -> &'static str {
        self.locale
    }

    /// 距到期的整日数
    ///
    /// 正数: 未到期; 0: 今天到期; 负数: 已过期
    pub fn days_until_expiration(&self, expiration_date: NaiveDate, reference_date: NaiveDate) -> i64 {
        (expiration_date - reference_date).num_days()
    }

    /// 按剩余天数判定临期等级
    pub fn classify(&self, days_remaining: i64) -> ExpirationCategory {
        match days_remaining {
            d if d <= DECLARE_WRITE_OFF_MAX_DAYS => ExpirationCategory::DeclareWriteOff,
            d if d <= EMERGENCY_MAX_DAYS => ExpirationCategory::Emergency,
            d if d <= URGENT_MAX_DAYS => ExpirationCategory::Urgent,
            d if d <= SLIGHTLY_URGENT_MAX_DAYS => ExpirationCategory::SlightlyUrgent,
            _ => ExpirationCategory::UnderReview,
        }
    }

    /// 按到期日直接判定
    pub fn classify_date(&self, expiration_date: NaiveDate, reference_date: NaiveDate) -> ExpirationCategory {
        self.classify(self.days_until_expiration(expiration_date, reference_date))
    }

    /// 等级显示名
    pub fn label(&self, category: ExpirationCategory) -> String {
        i18n::category_label(category, self.locale)
    }

    /// 等级 → 徽章严重度
    pub fn badge_severity(&self, category: ExpirationCategory) -> BadgeSeverity {
        match category {
            ExpirationCategory::DeclareWriteOff => BadgeSeverity::Danger,
            ExpirationCategory::Emergency => BadgeSeverity::Danger,
            ExpirationCategory::Urgent => BadgeSeverity::Warning,
            ExpirationCategory::SlightlyUrgent => BadgeSeverity::Info,
            ExpirationCategory::UnderReview => BadgeSeverity::Success,
        }
    }

    /// 剩余时间文案（单复数随天数变化）
    pub fn format_remaining(&self, days_remaining: i64) -> String {
        let (key, count) = match days_remaining {
            d if d < -1 => ("expiration.remaining.expired_other", d.unsigned_abs()),
            -1 => ("expiration.remaining.expired_one", 1),
            0 => ("expiration.remaining.today", 0),
            1 => ("expiration.remaining.tomorrow", 1),
            d => ("expiration.remaining.days_other", d.unsigned_abs()),
        };
        let count = count.to_string();
        i18n::t_in_with_args(key, self.locale, &[("count", count.as_str())])
    }
}
