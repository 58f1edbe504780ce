// ==========================================
// Prazo 零售库存系统 - 商品/门店/促销实体
// ==========================================
// 实体由数据仓储提供,引擎只读
// ==========================================

use crate::domain::types::UserRole;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Product - 商品
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    pub name: String,
    /// 商品品类（自由文本,与临期等级无关）
    pub category: String,
    pub brand: Option<String>,
    pub quantity: u32,
    /// 到期日（纯日历日期）
    pub expiration_date: NaiveDate,
    pub original_price: f64,
    pub current_price: f64,
    pub store_id: String,
    pub sold: bool,
    /// 售出时间（sold=true 时有值）
    pub sold_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// 在库（未售出）
    pub fn is_in_stock(&self) -> bool {
        !self.sold
    }

    /// 售出日期（UTC 日历日）
    pub fn sold_date(&self) -> Option<NaiveDate> {
        if !self.sold {
            return None;
        }
        self.sold_at.map(|at| at.date_naive())
    }

    /// 库存货值 = 现价 × 数量
    pub fn stock_value(&self) -> f64 {
        self.current_price * self.quantity as f64
    }
}

// ==========================================
// Store - 门店
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub store_id: String,
    pub name: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ==========================================
// Promotion - 促销
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub promotion_id: String,
    pub product_id: String,
    pub store_id: String,
    /// 折扣百分比 (0, 100]
    pub discount_percent: f64,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Promotion {
    /// 指定日期是否在促销期内（闭区间）
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.starts_on <= date && date <= self.ends_on
    }
}

// ==========================================
// Viewer - 当前查看者
// ==========================================
/// 角色 + 所属门店,用于数据范围限定（认证不在本系统内）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewer {
    pub role: UserRole,
    pub store_id: Option<String>,
}

impl Viewer {
    pub fn manager() -> Self {
        Self {
            role: UserRole::Manager,
            store_id: None,
        }
    }

    pub fn store(store_id: &str) -> Self {
        Self {
            role: UserRole::Store,
            store_id: Some(store_id.to_string()),
        }
    }
}
