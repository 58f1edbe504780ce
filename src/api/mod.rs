// ==========================================
// Prazo 零售库存系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供界面/命令行调用
// ==========================================

pub mod dashboard_api;
pub mod error;
pub mod import_api;
pub mod product_api;
pub mod scope;

// 重导出核心类型
pub use dashboard_api::{DashboardApi, DashboardQuery, DashboardSnapshot};
pub use error::{ApiError, ApiResult};
pub use import_api::ImportApi;
pub use product_api::{
    ApplyPromotionRequest, ProductApi, ProductView, RegisterProductRequest, RegisterStoreRequest,
};
pub use scope::resolve_store_scope;
