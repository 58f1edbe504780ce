// ==========================================
// Prazo 零售库存系统 - 领域类型定义
// ==========================================
// 临期等级、徽章严重度、指标趋势、用户角色
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 临期等级 (Expiration Category)
// ==========================================
// 派生值,不落库: 每次读取按剩余天数重新计算
// 顺序: 越靠前越紧急 (DeclareWriteOff < ... < UnderReview)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpirationCategory {
    DeclareWriteOff, // 申报报损 (≤15 天,含已过期)
    Emergency,       // 紧急 (16-29 天)
    Urgent,          // 急 (30-59 天)
    SlightlyUrgent,  // 较急 (60-89 天)
    UnderReview,     // 观察 (≥90 天)
}

impl ExpirationCategory {
    /// 全部等级,按紧急程度排列
    pub const ALL: [ExpirationCategory; 5] = [
        ExpirationCategory::DeclareWriteOff,
        ExpirationCategory::Emergency,
        ExpirationCategory::Urgent,
        ExpirationCategory::SlightlyUrgent,
        ExpirationCategory::UnderReview,
    ];

    /// 翻译键后缀
    pub fn key(&self) -> &'static str {
        match self {
            ExpirationCategory::DeclareWriteOff => "declare_write_off",
            ExpirationCategory::Emergency => "emergency",
            ExpirationCategory::Urgent => "urgent",
            ExpirationCategory::SlightlyUrgent => "slightly_urgent",
            ExpirationCategory::UnderReview => "under_review",
        }
    }

    /// 是否属于临期预警范围（申报报损 + 紧急）
    pub fn is_near_expiration(&self) -> bool {
        matches!(
            self,
            ExpirationCategory::DeclareWriteOff | ExpirationCategory::Emergency
        )
    }
}

impl fmt::Display for ExpirationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpirationCategory::DeclareWriteOff => write!(f, "DECLARE_WRITE_OFF"),
            ExpirationCategory::Emergency => write!(f, "EMERGENCY"),
            ExpirationCategory::Urgent => write!(f, "URGENT"),
            ExpirationCategory::SlightlyUrgent => write!(f, "SLIGHTLY_URGENT"),
            ExpirationCategory::UnderReview => write!(f, "UNDER_REVIEW"),
        }
    }
}

// ==========================================
// 徽章严重度 (Badge Severity)
// ==========================================
// 只表达语义,颜色由 UI 层主题决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeSeverity {
    Danger,
    Warning,
    Info,
    Success,
}

impl fmt::Display for BadgeSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BadgeSeverity::Danger => write!(f, "danger"),
            BadgeSeverity::Warning => write!(f, "warning"),
            BadgeSeverity::Info => write!(f, "info"),
            BadgeSeverity::Success => write!(f, "success"),
        }
    }
}

// ==========================================
// 指标趋势 (Trend Direction)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Neutral,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Up => write!(f, "up"),
            TrendDirection::Down => write!(f, "down"),
            TrendDirection::Neutral => write!(f, "neutral"),
        }
    }
}

// ==========================================
// 指标种类 (Metric Kind)
// ==========================================
// 声明顺序即报表输出顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricKind {
    InStock,          // 在库数量
    Sold,             // 已售数量
    Revenue,          // 销售额
    StockValue,       // 库存货值
    NearExpiration,   // 临期数量
    AverageTicket,    // 客单价
}

impl MetricKind {
    pub const ALL: [MetricKind; 6] = [
        MetricKind::InStock,
        MetricKind::Sold,
        MetricKind::Revenue,
        MetricKind::StockValue,
        MetricKind::NearExpiration,
        MetricKind::AverageTicket,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            MetricKind::InStock => "in_stock",
            MetricKind::Sold => "sold",
            MetricKind::Revenue => "revenue",
            MetricKind::StockValue => "stock_value",
            MetricKind::NearExpiration => "near_expiration",
            MetricKind::AverageTicket => "average_ticket",
        }
    }

    /// 数值格式
    pub fn format(&self) -> MetricFormat {
        match self {
            MetricKind::InStock | MetricKind::Sold | MetricKind::NearExpiration => {
                MetricFormat::Count
            }
            MetricKind::Revenue | MetricKind::StockValue | MetricKind::AverageTicket => {
                MetricFormat::Currency
            }
        }
    }

    /// 数值越大越好的指标（趋势向上）
    pub fn is_positive_good(&self) -> bool {
        matches!(self, MetricKind::Sold | MetricKind::Revenue)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricFormat {
    Count,
    Currency,
}

// ==========================================
// 用户角色 (User Role)
// ==========================================
// gestor: 管理全部门店; loja: 仅本门店
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "gestor")]
    Manager,
    #[serde(rename = "loja")]
    Store,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Manager => write!(f, "gestor"),
            UserRole::Store => write!(f, "loja"),
        }
    }
}

impl UserRole {
    /// 从字符串解析角色（未知值返回 None）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gestor" | "manager" => Some(UserRole::Manager),
            "loja" | "store" => Some(UserRole::Store),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order_follows_urgency() {
        let mut sorted = ExpirationCategory::ALL;
        sorted.sort();
        assert_eq!(sorted, ExpirationCategory::ALL);
        assert!(ExpirationCategory::DeclareWriteOff < ExpirationCategory::UnderReview);
    }

    #[test]
    fn test_near_expiration_flags() {
        assert!(ExpirationCategory::DeclareWriteOff.is_near_expiration());
        assert!(ExpirationCategory::Emergency.is_near_expiration());
        assert!(!ExpirationCategory::Urgent.is_near_expiration());
        assert!(!ExpirationCategory::UnderReview.is_near_expiration());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ExpirationCategory::SlightlyUrgent).unwrap();
        assert_eq!(json, "\"SLIGHTLY_URGENT\"");
        let json = serde_json::to_string(&BadgeSeverity::Danger).unwrap();
        assert_eq!(json, "\"danger\"");
        let role: UserRole = serde_json::from_str("\"loja\"").unwrap();
        assert_eq!(role, UserRole::Store);
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(UserRole::parse("Gestor"), Some(UserRole::Manager));
        assert_eq!(UserRole::parse(" loja "), Some(UserRole::Store));
        assert_eq!(UserRole::parse("admin"), None);
    }
}
