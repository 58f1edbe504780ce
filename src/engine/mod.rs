// ==========================================
// Prazo 零售库存系统 - 引擎层
// ==========================================
// 职责: 业务规则（临期分级、报表聚合、促销计算）
// 红线: 纯函数,无 I/O,无全局可变状态
// ==========================================

pub mod aggregation;
pub mod expiration;
pub mod promotion;

pub use aggregation::AggregationEngine;
pub use expiration::{ExpirationClassifier, ReferenceClock};
pub use promotion::PromotionEngine;
