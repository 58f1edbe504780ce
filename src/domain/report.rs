// ==========================================
// Prazo 零售库存系统 - 报表值对象
// ==========================================
// 每次请求即时计算,不落库
// ==========================================

use crate::domain::product::Store;
use crate::domain::types::{
    BadgeSeverity, ExpirationCategory, MetricFormat, MetricKind, TrendDirection,
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

// ==========================================
// DateRange - 日期区间（闭区间）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// 是否包含指定日期（start > end 时恒为 false）
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    /// 区间天数（含首尾）
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// 紧邻的上一个等长区间
    pub fn previous(&self) -> Self {
        let len = self.len_days().max(1);
        let end = self.start - Duration::days(1);
        let start = end - Duration::days(len - 1);
        Self { start, end }
    }
}

// ==========================================
// Metric - 指标卡片
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub kind: MetricKind,
    pub label: String,
    pub value: f64,
    pub format: MetricFormat,
    pub trend: TrendDirection,
    /// 相对上一周期的变化百分比
    pub change_percent: Option<f64>,
}

// ==========================================
// SalesPoint - 日销售点
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesPoint {
    pub date: NaiveDate,
    pub count: usize,
    pub revenue: f64,
}

// ==========================================
// CategoryVolume - 品类销量
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryVolume {
    pub category: String,
    pub count: usize,
}

// ==========================================
// ExpirationReportRow - 临期报表行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpirationReportRow {
    pub category: ExpirationCategory,
    pub label: String,
    pub severity: BadgeSeverity,
    pub count: usize,
    /// round(count / total × 100), total=0 时为 0
    pub percentage: u32,
}

// ==========================================
// ExpiringProduct - 临期预警条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiringProduct {
    pub product_id: String,
    pub name: String,
    pub store_id: String,
    pub expiration_date: NaiveDate,
    pub days_remaining: i64,
    pub category: ExpirationCategory,
    pub severity: BadgeSeverity,
    pub remaining_text: String,
}

// ==========================================
// StoreOverview - 门店概览（管理者视图）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreOverview {
    pub store: Store,
    pub in_stock: usize,
    pub near_expiration: usize,
    pub stock_value: f64,
}
