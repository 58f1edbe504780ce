// ==========================================
// Prazo 零售库存系统 - 驾驶舱 API
// ==========================================
// 职责: 加载商品数据,按查看者范围过滤,调用聚合引擎生成报表
// 架构: API 层 → Repository（取数）→ Engine（纯计算）
// ==========================================

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::api::scope::resolve_store_scope;
use crate::config::{ConfigReader, ReportConfig};
use crate::domain::product::{Store, Viewer};
use crate::domain::report::{
    CategoryVolume, DateRange, ExpirationReportRow, ExpiringProduct, Metric, SalesPoint,
    StoreOverview,
};
use crate::domain::types::MetricKind;
use crate::engine::{AggregationEngine, ExpirationClassifier};
use crate::i18n;
use crate::repository::{ProductRepository, StoreRepository};

// ==========================================
// DashboardQuery - 驾驶舱查询条件
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardQuery {
    pub viewer: Viewer,
    /// 门店过滤（仅管理者有效）
    pub store_id: Option<String>,
    /// 售出日期区间（闭区间）
    pub range: Option<DateRange>,
    /// 显示语言（None 时使用配置的默认语言）
    pub locale: Option<String>,
    /// 参考日期（None 时按配置的时区口径取今天）
    pub today: Option<NaiveDate>,
}

impl DashboardQuery {
    pub fn for_viewer(viewer: Viewer) -> Self {
        Self {
            viewer,
            store_id: None,
            range: None,
            locale: None,
            today: None,
        }
    }

    pub fn with_store(mut self, store_id: &str) -> Self {
        self.store_id = Some(store_id.to_string());
        self
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locale = Some(locale.to_string());
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }
}

// ==========================================
// DashboardSnapshot - 驾驶舱完整快照
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub today: NaiveDate,
    pub locale: String,
    pub store_id: Option<String>,
    pub range: Option<DateRange>,
    pub expiration_report: Vec<ExpirationReportRow>,
    pub metrics: Vec<Metric>,
    pub sales_trend: Vec<SalesPoint>,
    pub top_categories: Vec<CategoryVolume>,
    pub expiring_products: Vec<ExpiringProduct>,
    pub store_overview: Vec<StoreOverview>,
}

// 单次请求解析后的上下文
struct ResolvedQuery {
    scope: Option<String>,
    range: Option<DateRange>,
    today: NaiveDate,
    locale: &'static str,
    config: ReportConfig,
    engine: AggregationEngine,
}

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================
pub struct DashboardApi {
    product_repo: Arc<ProductRepository>,
    store_repo: Arc<StoreRepository>,
    config: Arc<dyn ConfigReader>,
}

impl DashboardApi {
    pub fn new(
        product_repo: Arc<ProductRepository>,
        store_repo: Arc<StoreRepository>,
        config: Arc<dyn ConfigReader>,
    ) -> Self {
        Self {
            product_repo,
            store_repo,
            config,
        }
    }

    async fn resolve(&self, query: &DashboardQuery) -> ApiResult<ResolvedQuery> {
        if let Some(range) = &query.range {
            if !range.is_valid() {
                return Err(ApiError::InvalidInput(format!(
                    "日期区间无效: {} > {}",
                    range.start, range.end
                )));
            }
        }

        let scope = resolve_store_scope(&query.viewer, query.store_id.as_deref())?;
        let config = ReportConfig::load(self.config.as_ref())
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        let locale = i18n::normalize_locale(query.locale.as_deref().unwrap_or(config.default_locale.as_str()));
        let today = query.today.unwrap_or_else(|| config.reference_clock.today());
        let engine = AggregationEngine::new(
            ExpirationClassifier::with_locale(locale),
            config.near_expiration_alert_threshold,
        );

        debug!(scope = ?scope, %today, locale, "驾驶舱查询上下文");
        Ok(ResolvedQuery {
            scope,
            range: query.range,
            today,
            locale,
            config,
            engine,
        })
    }

    // ==========================================
    // 单项查询
    // ==========================================

    /// 临期分级报表（在库商品）
    pub async fn get_expiration_report(&self, query: &DashboardQuery) -> ApiResult<Vec<ExpirationReportRow>> {
        let ctx = self.resolve(query).await?;
        self.expiration_report(&ctx)
    }

    /// 指标卡片（指定区间时附带与上一等长周期的对比）
    pub async fn get_metrics(&self, query: &DashboardQuery) -> ApiResult<Vec<Metric>> {
        let ctx = self.resolve(query).await?;
        self.metrics(&ctx)
    }

    /// 销售趋势（按售出日期）
    pub async fn get_sales_trend(&self, query: &DashboardQuery) -> ApiResult<Vec<SalesPoint>> {
        let ctx = self.resolve(query).await?;
        self.sales_trend(&ctx)
    }

    /// 热销品类排行（limit 为 None 时取配置值）
    pub async fn get_top_categories(
        &self,
        query: &DashboardQuery,
        limit: Option<usize>,
    ) -> ApiResult<Vec<CategoryVolume>> {
        let ctx = self.resolve(query).await?;
        self.top_categories(&ctx, limit)
    }

    /// 临期预警清单（within_days 为 None 时取配置值）
    pub async fn list_expiring_products(
        &self,
        query: &DashboardQuery,
        within_days: Option<i64>,
    ) -> ApiResult<Vec<ExpiringProduct>> {
        let ctx = self.resolve(query).await?;
        self.expiring_products(&ctx, within_days)
    }

    /// 门店概览（管理者看全部门店,门店员工只看本门店）
    pub async fn get_store_overview(&self, query: &DashboardQuery) -> ApiResult<Vec<StoreOverview>> {
        let ctx = self.resolve(query).await?;
        self.store_overview(&ctx)
    }

    /// 驾驶舱完整快照
    #[instrument(skip(self, query), fields(role = %query.viewer.role))]
    pub async fn get_dashboard(&self, query: &DashboardQuery) -> ApiResult<DashboardSnapshot> {
        let ctx = self.resolve(query).await?;

        let snapshot = DashboardSnapshot {
            generated_at: Utc::now(),
            today: ctx.today,
            locale: ctx.locale.to_string(),
            store_id: ctx.scope.clone(),
            range: ctx.range,
            expiration_report: self.expiration_report(&ctx)?,
            metrics: self.metrics(&ctx)?,
            sales_trend: self.sales_trend(&ctx)?,
            top_categories: self.top_categories(&ctx, None)?,
            expiring_products: self.expiring_products(&ctx, None)?,
            store_overview: self.store_overview(&ctx)?,
        };

        info!(
            store = ?snapshot.store_id,
            expiring = snapshot.expiring_products.len(),
            "驾驶舱快照生成完成"
        );
        Ok(snapshot)
    }

    // ==========================================
    // 内部实现（共享同一请求上下文）
    // ==========================================

    fn expiration_report(&self, ctx: &ResolvedQuery) -> ApiResult<Vec<ExpirationReportRow>> {
        let stock = self.product_repo.list_in_stock(ctx.scope.as_deref())?;
        Ok(ctx.engine.expiration_report(&stock, ctx.today))
    }

    fn metrics(&self, ctx: &ResolvedQuery) -> ApiResult<Vec<Metric>> {
        let scope = ctx.scope.as_deref();
        let stock = self.product_repo.list_in_stock(scope)?;
        let sold = self.product_repo.list_sold(scope, ctx.range.as_ref())?;
        let current = ctx.engine.metrics(&stock, &sold, ctx.range.as_ref(), ctx.today);

        let range = match ctx.range {
            Some(r) => r,
            None => return Ok(current),
        };

        // 只有销售类指标可以与上一周期比较
        let previous_range = range.previous();
        let previous_sold = self.product_repo.list_sold(scope, Some(&previous_range))?;
        let previous: Vec<Metric> = ctx
            .engine
            .metrics(&[], &previous_sold, Some(&previous_range), ctx.today)
            .into_iter()
            .filter(|m| {
                matches!(
                    m.kind,
                    MetricKind::Sold | MetricKind::Revenue | MetricKind::AverageTicket
                )
            })
            .collect();

        Ok(ctx.engine.compare_metrics(current, &previous))
    }

    fn sales_trend(&self, ctx: &ResolvedQuery) -> ApiResult<Vec<SalesPoint>> {
        let sold = self
            .product_repo
            .list_sold(ctx.scope.as_deref(), ctx.range.as_ref())?;
        Ok(ctx.engine.sales_trend(&sold, ctx.range.as_ref()))
    }

    fn top_categories(&self, ctx: &ResolvedQuery, limit: Option<usize>) -> ApiResult<Vec<CategoryVolume>> {
        let sold = self
            .product_repo
            .list_sold(ctx.scope.as_deref(), ctx.range.as_ref())?;
        let n = limit.unwrap_or(ctx.config.top_categories_limit);
        Ok(ctx.engine.top_categories(&sold, n))
    }

    fn expiring_products(&self, ctx: &ResolvedQuery, within_days: Option<i64>) -> ApiResult<Vec<ExpiringProduct>> {
        let stock = self.product_repo.list_in_stock(ctx.scope.as_deref())?;
        let window = within_days.unwrap_or(ctx.config.expiring_window_days);
        Ok(ctx.engine.expiring_products(&stock, ctx.today, window))
    }

    fn store_overview(&self, ctx: &ResolvedQuery) -> ApiResult<Vec<StoreOverview>> {
        let stores: Vec<Store> = match ctx.scope.as_deref() {
            Some(store_id) => self.store_repo.find_by_id(store_id)?.into_iter().collect(),
            None => self.store_repo.list_all()?,
        };
        let stock = self.product_repo.list_in_stock(ctx.scope.as_deref())?;
        Ok(ctx.engine.store_overview(&stock, &stores, ctx.today))
    }
}
