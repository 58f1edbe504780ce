// ==========================================
// Prazo 零售库存系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 临期商品分级、促销与门店报表
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 分级与聚合规则
pub mod engine;

// 导入层 - 入库文件
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    BadgeSeverity, ExpirationCategory, MetricFormat, MetricKind, TrendDirection, UserRole,
};

// 领域实体与报表
pub use domain::{
    CategoryVolume, DateRange, ExpirationReportRow, ExpiringProduct, ImportSummary, Metric,
    Product, Promotion, SalesPoint, Store, StoreOverview, Viewer,
};

// 引擎
pub use engine::{AggregationEngine, ExpirationClassifier, PromotionEngine, ReferenceClock};

// API
pub use api::{DashboardApi, DashboardQuery, ImportApi, ProductApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Prazo";
