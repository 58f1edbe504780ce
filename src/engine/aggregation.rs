// ==========================================
// Prazo 零售库存系统 - 报表聚合引擎
// ==========================================
// 职责: 将商品集合转换为驾驶舱数据（分级计数、指标、趋势、品类排行）
// 输入: 调用方已加载的商品/门店集合 + 显式"今天"
// 输出: 报表值对象（不落库）
// 红线: 纯计算,无 I/O;空输入返回零值,除零一律返回 0
// ==========================================

use crate::domain::product::{Product, Store};
use crate::domain::report::{
    CategoryVolume, DateRange, ExpirationReportRow, ExpiringProduct, Metric, SalesPoint,
    StoreOverview,
};
use crate::domain::types::{ExpirationCategory, MetricKind, TrendDirection};
use crate::engine::expiration::ExpirationClassifier;
use crate::i18n;
use chrono::NaiveDate;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// 临期数量告警阈值默认值（超过则趋势为 down）
pub const DEFAULT_NEAR_EXPIRATION_THRESHOLD: usize = 10;

/// 品类排行默认条数
pub const DEFAULT_TOP_CATEGORIES: usize = 10;

// ==========================================
// AggregationEngine - 报表聚合引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct AggregationEngine {
    classifier: ExpirationClassifier,
    near_expiration_threshold: usize,
}

impl Default for AggregationEngine {
    fn default() -> Self {
        Self::new(ExpirationClassifier::new(), DEFAULT_NEAR_EXPIRATION_THRESHOLD)
    }
}

impl AggregationEngine {
    /// 创建聚合引擎
    ///
    /// # 参数
    /// - classifier: 临期分级器（决定显示语言）
    /// - near_expiration_threshold: 临期数量告警阈值
    pub fn new(classifier: ExpirationClassifier, near_expiration_threshold: usize) -> Self {
        Self {
            classifier,
            near_expiration_threshold,
        }
    }

    pub fn classifier(&self) -> &ExpirationClassifier {
        &self.classifier
    }

    // ==========================================
    // 临期分级统计
    // ==========================================

    /// 按临期等级计数（仅统计未售商品）
    ///
    /// 五个等级始终存在;计数之和 = 未售商品数
    pub fn count_by_category(
        &self,
        products: &[Product],
        today: NaiveDate,
    ) -> BTreeMap<ExpirationCategory, usize> {
        let mut counts: BTreeMap<ExpirationCategory, usize> =
            ExpirationCategory::ALL.iter().map(|c| (*c, 0)).collect();

        for product in products.iter().filter(|p| p.is_in_stock()) {
            let category = self
                .classifier
                .classify_date(product.expiration_date, today);
            *counts.entry(category).or_insert(0) += 1;
        }

        counts
    }

    /// 临期报表（固定顺序: 申报报损 → 观察）
    #[instrument(skip(self, products), fields(count = products.len()))]
    pub fn expiration_report(
        &self,
        products: &[Product],
        today: NaiveDate,
    ) -> Vec<ExpirationReportRow> {
        let counts = self.count_by_category(products, today);
        let total: usize = counts.values().sum();

        ExpirationCategory::ALL
            .iter()
            .map(|category| {
                let count = counts.get(category).copied().unwrap_or(0);
                ExpirationReportRow {
                    category: *category,
                    label: self.classifier.label(*category),
                    severity: self.classifier.badge_severity(*category),
                    count,
                    percentage: percentage_of(count, total),
                }
            })
            .collect()
    }

    // ==========================================
    // 销售统计
    // ==========================================

    /// 按售出日期分组的销售趋势（日期升序）
    ///
    /// 指定区间时先过滤（闭区间）再分组
    pub fn sales_trend(&self, products: &[Product], range: Option<&DateRange>) -> Vec<SalesPoint> {
        let mut by_date: BTreeMap<NaiveDate, SalesPoint> = BTreeMap::new();

        for product in products.iter().filter(|p| p.sold) {
            let Some(date) = product.sold_date() else {
                debug!(product_id = %product.product_id, "已售商品缺少售出时间,跳过");
                continue;
            };
            if let Some(range) = range {
                if !range.contains(date) {
                    continue;
                }
            }

            let point = by_date.entry(date).or_insert_with(|| SalesPoint {
                date,
                count: 0,
                revenue: 0.0,
            });
            point.count += 1;
            point.revenue += product.current_price;
        }

        by_date
            .into_values()
            .map(|mut point| {
                point.revenue = round_cents(point.revenue);
                point
            })
            .collect()
    }

    /// 畅销品类排行（按销量降序,同量保持首次出现顺序）
    pub fn top_categories(&self, products: &[Product], n: usize) -> Vec<CategoryVolume> {
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for product in products.iter().filter(|p| p.sold) {
            *counts.entry(product.category.as_str()).or_insert(0) += 1;
        }

        let mut volumes: Vec<CategoryVolume> = counts
            .into_iter()
            .map(|(category, count)| CategoryVolume {
                category: category.to_string(),
                count,
            })
            .collect();

        // 稳定排序,保证同量时先出现者在前
        volumes.sort_by(|a, b| b.count.cmp(&a.count));
        volumes.truncate(n);
        volumes
    }

    // ==========================================
    // 指标卡片
    // ==========================================

    /// 计算指标（固定顺序: 在库、已售、销售额、库存货值、临期、客单价）
    ///
    /// # 参数
    /// - stock_products: 在库商品集合（已售记录会被忽略）
    /// - sold_products: 已售商品集合
    /// - range: 售出日期过滤区间（None 表示全部）
    /// - today: 参考日期
    #[instrument(skip(self, stock_products, sold_products), fields(
        stock = stock_products.len(),
        sold = sold_products.len()
    ))]
    pub fn metrics(
        &self,
        stock_products: &[Product],
        sold_products: &[Product],
        range: Option<&DateRange>,
        today: NaiveDate,
    ) -> Vec<Metric> {
        let in_stock: Vec<&Product> = stock_products.iter().filter(|p| p.is_in_stock()).collect();
        let sold_in_range: Vec<&Product> = sold_products
            .iter()
            .filter(|p| p.sold)
            .filter(|p| match range {
                Some(r) => p.sold_date().map(|d| r.contains(d)).unwrap_or(false),
                None => true,
            })
            .collect();

        let in_stock_count = in_stock.len();
        let sold_count = sold_in_range.len();
        let revenue: f64 = sold_in_range.iter().map(|p| p.current_price).sum();
        let stock_value: f64 = in_stock.iter().map(|p| p.stock_value()).sum();
        let near_expiration = in_stock
            .iter()
            .filter(|p| {
                self.classifier
                    .classify_date(p.expiration_date, today)
                    .is_near_expiration()
            })
            .count();
        let average_ticket = if sold_count == 0 {
            0.0
        } else {
            revenue / sold_count as f64
        };

        let values = [
            (MetricKind::InStock, in_stock_count as f64),
            (MetricKind::Sold, sold_count as f64),
            (MetricKind::Revenue, round_cents(revenue)),
            (MetricKind::StockValue, round_cents(stock_value)),
            (MetricKind::NearExpiration, near_expiration as f64),
            (MetricKind::AverageTicket, round_cents(average_ticket)),
        ];

        values
            .into_iter()
            .map(|(kind, value)| Metric {
                kind,
                label: i18n::metric_label(kind, self.classifier.locale()),
                value,
                format: kind.format(),
                trend: self.trend_for(kind, value),
                change_percent: None,
            })
            .collect()
    }

    /// 指标趋势判定
    ///
    /// - 已售/销售额 > 0 → up
    /// - 临期数量 > 阈值 → down
    /// - 其他 → neutral
    fn trend_for(&self, kind: MetricKind, value: f64) -> TrendDirection {
        if kind.is_positive_good() && value > 0.0 {
            return TrendDirection::Up;
        }
        if kind == MetricKind::NearExpiration && value > self.near_expiration_threshold as f64 {
            return TrendDirection::Down;
        }
        TrendDirection::Neutral
    }

    /// 用上一周期指标填充变化百分比（按指标种类匹配）
    pub fn compare_metrics(&self, current: Vec<Metric>, previous: &[Metric]) -> Vec<Metric> {
        current
            .into_iter()
            .map(|mut metric| {
                metric.change_percent = previous
                    .iter()
                    .find(|p| p.kind == metric.kind)
                    .and_then(|p| percentage_change(metric.value, p.value));
                metric
            })
            .collect()
    }

    // ==========================================
    // 预警与门店视图
    // ==========================================

    /// 临期预警列表: 未售且剩余天数 ≤ within_days,按剩余天数升序
    pub fn expiring_products(
        &self,
        products: &[Product],
        today: NaiveDate,
        within_days: i64,
    ) -> Vec<ExpiringProduct> {
        let mut items: Vec<ExpiringProduct> = products
            .iter()
            .filter(|p| p.is_in_stock())
            .filter_map(|p| {
                let days = self.classifier.days_until_expiration(p.expiration_date, today);
                if days > within_days {
                    return None;
                }
                let category = self.classifier.classify(days);
                Some(ExpiringProduct {
                    product_id: p.product_id.clone(),
                    name: p.name.clone(),
                    store_id: p.store_id.clone(),
                    expiration_date: p.expiration_date,
                    days_remaining: days,
                    category,
                    severity: self.classifier.badge_severity(category),
                    remaining_text: self.classifier.format_remaining(days),
                })
            })
            .collect();

        items.sort_by(|a, b| {
            a.days_remaining
                .cmp(&b.days_remaining)
                .then_with(|| a.name.cmp(&b.name))
        });
        items
    }

    /// 门店概览（按门店列表顺序）
    pub fn store_overview(
        &self,
        products: &[Product],
        stores: &[Store],
        today: NaiveDate,
    ) -> Vec<StoreOverview> {
        stores
            .iter()
            .map(|store| {
                let in_stock: Vec<&Product> = products
                    .iter()
                    .filter(|p| p.store_id == store.store_id && p.is_in_stock())
                    .collect();
                let near_expiration = in_stock
                    .iter()
                    .filter(|p| {
                        self.classifier
                            .classify_date(p.expiration_date, today)
                            .is_near_expiration()
                    })
                    .count();
                let stock_value: f64 = in_stock.iter().map(|p| p.stock_value()).sum();

                StoreOverview {
                    store: store.clone(),
                    in_stock: in_stock.len(),
                    near_expiration,
                    stock_value: round_cents(stock_value),
                }
            })
            .collect()
    }
}

// ==========================================
// 数值工具
// ==========================================

/// round(part / total × 100),total=0 时为 0
pub fn percentage_of(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u32
}

/// 变化百分比（保留一位小数）,上一周期为 0 时无意义
pub fn percentage_change(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    let change = (current - previous) / previous * 100.0;
    Some((change * 10.0).round() / 10.0)
}

/// 金额保留两位小数
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
