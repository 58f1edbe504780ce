// ==========================================
// Prazo 零售库存系统 - 促销计算引擎
// ==========================================
// 职责: 折扣百分比、促销价、有效促销筛选
// 红线: 纯计算,不改写商品
// ==========================================

use crate::domain::product::Promotion;
use crate::engine::aggregation::round_cents;
use chrono::NaiveDate;

pub struct PromotionEngine;

impl PromotionEngine {
    pub fn new() -> Self {
        Self
    }

    /// 现价相对原价的折扣百分比（四舍五入取整）
    ///
    /// 原价 ≤ 0 或现价 ≥ 原价时为 0
    pub fn discount_percent(&self, original_price: f64, current_price: f64) -> u32 {
        if original_price <= 0.0 || current_price >= original_price {
            return 0;
        }
        let current = current_price.max(0.0);
        ((original_price - current) / original_price * 100.0).round() as u32
    }

    /// 按折扣计算促销价（折扣限定在 [0, 100],保留两位小数）
    pub fn promotional_price(&self, original_price: f64, discount_percent: f64) -> f64 {
        let percent = discount_percent.clamp(0.0, 100.0);
        round_cents(original_price * (100.0 - percent) / 100.0)
    }

    /// 指定日期有效的促销
    pub fn active_promotions<'a>(
        &self,
        promotions: &'a [Promotion],
        today: NaiveDate,
    ) -> Vec<&'a Promotion> {
        promotions.iter().filter(|p| p.is_active_on(today)).collect()
    }
}

impl Default for PromotionEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_discount_percent() {
        let engine = PromotionEngine::new();
        assert_eq!(engine.discount_percent(10.0, 7.5), 25);
        assert_eq!(engine.discount_percent(3.0, 2.0), 33);
        assert_eq!(engine.discount_percent(10.0, 10.0), 0);
        assert_eq!(engine.discount_percent(10.0, 12.0), 0);
        assert_eq!(engine.discount_percent(0.0, 0.0), 0);
    }

    #[test]
    fn test_promotional_price() {
        let engine = PromotionEngine::new();
        assert_eq!(engine.promotional_price(19.9, 30.0), 13.93);
        assert_eq!(engine.promotional_price(10.0, 150.0), 0.0);
        assert_eq!(engine.promotional_price(10.0, -5.0), 10.0);
    }

    #[test]
    fn test_active_promotions() {
        let engine = PromotionEngine::new();
        let d = |day: u32| NaiveDate::from_ymd_opt(2026, 2, day).unwrap();
        let promo = |id: &str, start: u32, end: u32| Promotion {
            promotion_id: id.to_string(),
            product_id: "P1".to_string(),
            store_id: "S1".to_string(),
            discount_percent: 10.0,
            starts_on: d(start),
            ends_on: d(end),
            created_at: Utc::now(),
        };
        let promotions = vec![promo("a", 1, 3), promo("b", 3, 9), promo("c", 10, 12)];

        let active = engine.active_promotions(&promotions, d(3));
        let ids: Vec<&str> = active.iter().map(|p| p.promotion_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
