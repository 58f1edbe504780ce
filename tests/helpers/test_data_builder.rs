// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use prazo::domain::{Product, Store};

// ==========================================
// Product 构建器
// ==========================================

pub struct ProductBuilder {
    product_id: String,
    name: String,
    category: String,
    brand: Option<String>,
    quantity: u32,
    expiration_date: NaiveDate,
    original_price: f64,
    current_price: Option<f64>,
    store_id: String,
    sold_at: Option<DateTime<Utc>>,
}

impl ProductBuilder {
    pub fn new(product_id: &str) -> Self {
        Self {
            product_id: product_id.to_string(),
            name: format!("商品{}", product_id),
            category: "Laticínios".to_string(),
            brand: None,
            quantity: 1,
            expiration_date: NaiveDate::from_ymd_opt(2026, 6, 1).expect("合法日期"),
            original_price: 10.0,
            current_price: None,
            store_id: "S1".to_string(),
            sold_at: None,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn brand(mut self, brand: &str) -> Self {
        self.brand = Some(brand.to_string());
        self
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn expires_on(mut self, date: NaiveDate) -> Self {
        self.expiration_date = date;
        self
    }

    /// 到期日 = today + days（可为负）
    pub fn expires_in(mut self, today: NaiveDate, days: i64) -> Self {
        self.expiration_date = today + Duration::days(days);
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.original_price = price;
        self
    }

    pub fn current_price(mut self, price: f64) -> Self {
        self.current_price = Some(price);
        self
    }

    pub fn store(mut self, store_id: &str) -> Self {
        self.store_id = store_id.to_string();
        self
    }

    pub fn sold_at(mut self, at: DateTime<Utc>) -> Self {
        self.sold_at = Some(at);
        self
    }

    /// 当天中午售出（UTC）
    pub fn sold_on(self, date: NaiveDate) -> Self {
        let at = Utc
            .from_utc_datetime(&date.and_hms_opt(12, 0, 0).expect("合法时间"));
        self.sold_at(at)
    }

    pub fn build(self) -> Product {
        let now = Utc::now();
        Product {
            product_id: self.product_id,
            name: self.name,
            category: self.category,
            brand: self.brand,
            quantity: self.quantity,
            expiration_date: self.expiration_date,
            original_price: self.original_price,
            current_price: self.current_price.unwrap_or(self.original_price),
            store_id: self.store_id,
            sold: self.sold_at.is_some(),
            sold_at: self.sold_at,
            created_at: now,
            updated_at: now,
        }
    }
}

// ==========================================
// Store 构建器
// ==========================================

pub struct StoreBuilder {
    store_id: String,
    name: String,
    address: Option<String>,
}

impl StoreBuilder {
    pub fn new(store_id: &str) -> Self {
        Self {
            store_id: store_id.to_string(),
            name: format!("Loja {}", store_id),
            address: None,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn address(mut self, address: &str) -> Self {
        self.address = Some(address.to_string());
        self
    }

    pub fn build(self) -> Store {
        Store {
            store_id: self.store_id,
            name: self.name,
            address: self.address,
            created_at: Utc::now(),
        }
    }
}

// ==========================================
// 常用场景
// ==========================================

/// 五个等级各一件: today+5/20/40/70/100
pub fn one_per_category(today: NaiveDate, store_id: &str) -> Vec<Product> {
    [5, 20, 40, 70, 100]
        .iter()
        .map(|days| {
            ProductBuilder::new(&format!("{}-D{}", store_id, days))
                .store(store_id)
                .expires_in(today, *days)
                .build()
        })
        .collect()
}
