// ==========================================
// Prazo 零售库存系统 - 入库导入结果
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ViolationLevel - 违规级别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationLevel {
    Error,   // 阻断,该行不入库
    Warning, // 警告,照常入库
}

// ==========================================
// ImportViolation - 行级违规记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportViolation {
    pub row_number: usize,          // 原始文件行号（表头后从 1 起）
    pub product_id: Option<String>, // 商品编码（如果可解析）
    pub level: ViolationLevel,
    pub field: String,
    pub message: String,
}

impl ImportViolation {
    pub fn error(row_number: usize, field: &str, message: impl Into<String>) -> Self {
        Self {
            row_number,
            product_id: None,
            level: ViolationLevel::Error,
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn warning(row_number: usize, field: &str, message: impl Into<String>) -> Self {
        Self {
            row_number,
            product_id: None,
            level: ViolationLevel::Warning,
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn with_product_id(mut self, product_id: Option<String>) -> Self {
        self.product_id = product_id;
        self
    }
}

// ==========================================
// ImportSummary - 单个文件的导入汇总
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub batch_id: String,
    pub file_name: String,
    pub total_rows: usize,
    pub imported: usize,
    pub skipped: usize,
    pub violations: Vec<ImportViolation>,
    pub elapsed_ms: u64,
}

impl ImportSummary {
    pub fn error_count(&self) -> usize {
        self.violations
            .iter()
            .filter(|v| v.level == ViolationLevel::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.violations
            .iter()
            .filter(|v| v.level == ViolationLevel::Warning)
            .count()
    }
}
