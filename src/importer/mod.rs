// ==========================================
// Prazo 零售库存系统 - 导入层
// ==========================================
// 职责: 入库文件导入,生成商品记录
// 支持: Excel, CSV
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod product_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::{FieldMapper, RawProductRecord};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRow, UniversalFileParser};
pub use product_importer::{ProductImporter, ProductImporterImpl};
