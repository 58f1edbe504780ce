// ==========================================
// Prazo 零售库存系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、报表值对象
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod import;
pub mod product;
pub mod report;
pub mod types;

// 重导出核心类型
pub use import::{ImportSummary, ImportViolation, ViolationLevel};
pub use product::{Product, Promotion, Store, Viewer};
pub use report::{
    CategoryVolume, DateRange, ExpirationReportRow, ExpiringProduct, Metric, SalesPoint,
    StoreOverview,
};
pub use types::{
    BadgeSeverity, ExpirationCategory, MetricFormat, MetricKind, TrendDirection, UserRole,
};
