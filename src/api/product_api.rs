// ==========================================
// Prazo 零售库存系统 - 商品 API
// ==========================================
// 职责: 商品登记、查询、售出、促销;门店登记
// 校验: 输入合法性在 API 层完成,仓储只负责落库
// ==========================================

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::api::dashboard_api::DashboardQuery;
use crate::api::error::{ApiError, ApiResult};
use crate::api::scope::resolve_store_scope;
use crate::config::{ConfigReader, ReportConfig};
use crate::domain::product::{Product, Promotion, Store, Viewer};
use crate::domain::types::{BadgeSeverity, ExpirationCategory};
use crate::engine::{ExpirationClassifier, PromotionEngine};
use crate::i18n;
use crate::repository::{ProductRepository, PromotionRepository, StoreRepository};

// ==========================================
// 请求/视图结构
// ==========================================

/// 商品登记请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterProductRequest {
    /// 商品编码（为空时自动生成）
    pub product_id: Option<String>,
    pub name: String,
    pub category: String,
    pub brand: Option<String>,
    pub quantity: u32,
    pub expiration_date: NaiveDate,
    pub original_price: f64,
    /// 现价（为空时等于原价）
    pub current_price: Option<f64>,
    pub store_id: String,
}

/// 门店登记请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterStoreRequest {
    pub store_id: String,
    pub name: String,
    pub address: Option<String>,
}

/// 促销请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyPromotionRequest {
    pub product_id: String,
    /// 折扣百分比 (0, 100]
    pub discount_percent: f64,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
}

/// 商品列表视图（商品 + 临期信息）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub days_remaining: i64,
    pub expiration_category: ExpirationCategory,
    pub category_label: String,
    pub severity: BadgeSeverity,
    pub remaining_text: String,
    pub discount_percent: u32,
}

// ==========================================
// ProductApi - 商品 API
// ==========================================
pub struct ProductApi {
    product_repo: Arc<ProductRepository>,
    store_repo: Arc<StoreRepository>,
    promotion_repo: Arc<PromotionRepository>,
    config: Arc<dyn ConfigReader>,
    promotion_engine: PromotionEngine,
}

impl ProductApi {
    pub fn new(
        product_repo: Arc<ProductRepository>,
        store_repo: Arc<StoreRepository>,
        promotion_repo: Arc<PromotionRepository>,
        config: Arc<dyn ConfigReader>,
    ) -> Self {
        Self {
            product_repo,
            store_repo,
            promotion_repo,
            config,
            promotion_engine: PromotionEngine::new(),
        }
    }

    // ==========================================
    // 门店
    // ==========================================

    /// 登记门店
    pub fn register_store(&self, request: RegisterStoreRequest) -> ApiResult<Store> {
        let store_id = request.store_id.trim();
        let name = request.name.trim();
        if store_id.is_empty() {
            return Err(ApiError::InvalidInput("门店编码不能为空".to_string()));
        }
        if name.is_empty() {
            return Err(ApiError::InvalidInput("门店名称不能为空".to_string()));
        }

        let store = Store {
            store_id: store_id.to_string(),
            name: name.to_string(),
            address: request.address.filter(|a| !a.trim().is_empty()),
            created_at: Utc::now(),
        };
        self.store_repo.insert(&store)?;
        info!(store_id = %store.store_id, "门店登记完成");
        Ok(store)
    }

    pub fn list_stores(&self, viewer: &Viewer) -> ApiResult<Vec<Store>> {
        match resolve_store_scope(viewer, None)? {
            Some(store_id) => Ok(self.store_repo.find_by_id(&store_id)?.into_iter().collect()),
            None => Ok(self.store_repo.list_all()?),
        }
    }

    // ==========================================
    // 商品
    // ==========================================

    /// 登记商品
    ///
    /// # 错误
    /// - InvalidInput: 名称/品类/门店为空,价格为负
    /// - NotFound: 门店不存在
    #[instrument(skip(self, viewer, request), fields(store_id = %request.store_id))]
    pub fn register_product(&self, viewer: &Viewer, request: RegisterProductRequest) -> ApiResult<Product> {
        let name = request.name.trim();
        let category = request.category.trim();
        if name.is_empty() {
            return Err(ApiError::InvalidInput("商品名称不能为空".to_string()));
        }
        if category.is_empty() {
            return Err(ApiError::InvalidInput("品类不能为空".to_string()));
        }

        let scope = resolve_store_scope(viewer, Some(&request.store_id))?;
        let store_id = scope.ok_or_else(|| ApiError::InvalidInput("门店不能为空".to_string()))?;
        if self.store_repo.find_by_id(&store_id)?.is_none() {
            return Err(ApiError::NotFound(format!("门店(id={})不存在", store_id)));
        }

        let current_price = request.current_price.unwrap_or(request.original_price);
        for (field, price) in [("original_price", request.original_price), ("current_price", current_price)] {
            if !price.is_finite() || price < 0.0 {
                return Err(ApiError::InvalidInput(format!("{} 不能为负: {}", field, price)));
            }
        }
        if current_price > request.original_price {
            warn!(
                original_price = request.original_price,
                current_price, "现价高于原价"
            );
        }

        let now = Utc::now();
        let product = Product {
            product_id: request
                .product_id
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: name.to_string(),
            category: category.to_string(),
            brand: request.brand.filter(|b| !b.trim().is_empty()),
            quantity: request.quantity,
            expiration_date: request.expiration_date,
            original_price: request.original_price,
            current_price,
            store_id,
            sold: false,
            sold_at: None,
            created_at: now,
            updated_at: now,
        };

        if self.product_repo.find_by_id(&product.product_id)?.is_some() {
            return Err(ApiError::BusinessRuleViolation(format!(
                "商品编码已存在: {}",
                product.product_id
            )));
        }
        self.product_repo.batch_insert(std::slice::from_ref(&product))?;

        info!(product_id = %product.product_id, "商品登记完成");
        Ok(product)
    }

    /// 商品列表（按到期日升序,附临期信息）
    pub async fn list_products(&self, query: &DashboardQuery, include_sold: bool) -> ApiResult<Vec<ProductView>> {
        let scope = resolve_store_scope(&query.viewer, query.store_id.as_deref())?;
        let config = ReportConfig::load(self.config.as_ref())
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        let locale = i18n::normalize_locale(query.locale.as_deref().unwrap_or(config.default_locale.as_str()));
        let today = query.today.unwrap_or_else(|| config.reference_clock.today());
        let classifier = ExpirationClassifier::with_locale(locale);

        let mut products = if include_sold {
            self.product_repo.list_all(scope.as_deref())?
        } else {
            self.product_repo.list_in_stock(scope.as_deref())?
        };
        products.sort_by(|a, b| {
            a.expiration_date
                .cmp(&b.expiration_date)
                .then_with(|| a.name.cmp(&b.name))
        });

        Ok(products
            .into_iter()
            .map(|product| {
                let days = classifier.days_until_expiration(product.expiration_date, today);
                let category = classifier.classify(days);
                ProductView {
                    days_remaining: days,
                    expiration_category: category,
                    category_label: classifier.label(category),
                    severity: classifier.badge_severity(category),
                    remaining_text: classifier.format_remaining(days),
                    discount_percent: self
                        .promotion_engine
                        .discount_percent(product.original_price, product.current_price),
                    product,
                }
            })
            .collect())
    }

    /// 售出商品（sold_at 为空时取当前时间）
    pub fn sell_product(
        &self,
        viewer: &Viewer,
        product_id: &str,
        sold_at: Option<DateTime<Utc>>,
    ) -> ApiResult<Product> {
        let product = self.visible_product(viewer, product_id)?;
        self.product_repo
            .mark_sold(&product.product_id, sold_at.unwrap_or_else(Utc::now))?;

        info!(product_id, store_id = %product.store_id, "商品已售出");
        self.visible_product(viewer, product_id)
    }

    // ==========================================
    // 促销
    // ==========================================

    /// 设置促销: 按原价计算促销价写入现价,并记录促销
    ///
    /// # 错误
    /// - InvalidInput: 折扣不在 (0, 100] 或开始日期晚于结束日期
    /// - NotFound: 商品不存在或不在查看范围内
    /// - BusinessRuleViolation: 商品已售出
    #[instrument(skip(self, viewer, request), fields(product_id = %request.product_id))]
    pub fn apply_promotion(&self, viewer: &Viewer, request: ApplyPromotionRequest) -> ApiResult<Promotion> {
        if !(request.discount_percent > 0.0 && request.discount_percent <= 100.0) {
            return Err(ApiError::InvalidInput(format!(
                "折扣必须在 (0, 100] 之间: {}",
                request.discount_percent
            )));
        }
        if request.starts_on > request.ends_on {
            return Err(ApiError::InvalidInput(format!(
                "促销开始日期晚于结束日期: {} > {}",
                request.starts_on, request.ends_on
            )));
        }

        let product = self.visible_product(viewer, &request.product_id)?;
        if product.sold {
            return Err(ApiError::BusinessRuleViolation(format!(
                "商品 {} 已售出，不能设置促销",
                product.product_id
            )));
        }

        let promotional_price = self
            .promotion_engine
            .promotional_price(product.original_price, request.discount_percent);
        let promotion = Promotion {
            promotion_id: Uuid::new_v4().to_string(),
            product_id: product.product_id.clone(),
            store_id: product.store_id.clone(),
            discount_percent: request.discount_percent,
            starts_on: request.starts_on,
            ends_on: request.ends_on,
            created_at: Utc::now(),
        };
        self.promotion_repo.apply(&promotion, promotional_price)?;

        info!(
            promotion_id = %promotion.promotion_id,
            promotional_price,
            "促销设置完成"
        );
        Ok(promotion)
    }

    /// 指定日期有效的促销
    pub fn list_active_promotions(&self, viewer: &Viewer, date: NaiveDate) -> ApiResult<Vec<Promotion>> {
        let scope = resolve_store_scope(viewer, None)?;
        let promotions = self.promotion_repo.list_by_store(scope.as_deref())?;
        Ok(self
            .promotion_engine
            .active_promotions(&promotions, date)
            .into_iter()
            .cloned()
            .collect())
    }

    // 查看范围外的商品按不存在处理
    fn visible_product(&self, viewer: &Viewer, product_id: &str) -> ApiResult<Product> {
        let scope = resolve_store_scope(viewer, None)?;
        let not_found = || ApiError::NotFound(format!("Product(id={})不存在", product_id));

        let product = self.product_repo.find_by_id(product_id)?.ok_or_else(not_found)?;
        match scope {
            Some(store_id) if store_id != product.store_id => Err(not_found()),
            _ => Ok(product),
        }
    }
}
