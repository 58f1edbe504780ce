// ==========================================
// Prazo 零售库存系统 - 字段映射器实现
// ==========================================
// 阶段 1: 源列名 → 标准字段 + 类型转换
// 支持英文/葡萄牙语表头,列名大小写与空格不敏感
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRow;
use chrono::{Duration, NaiveDate};

// ==========================================
// 标准字段与列名别名
// ==========================================
pub mod fields {
    pub const PRODUCT_ID: &str = "product_id";
    pub const NAME: &str = "name";
    pub const CATEGORY: &str = "category";
    pub const BRAND: &str = "brand";
    pub const QUANTITY: &str = "quantity";
    pub const EXPIRATION_DATE: &str = "expiration_date";
    pub const ORIGINAL_PRICE: &str = "original_price";
    pub const CURRENT_PRICE: &str = "current_price";
    pub const STORE_ID: &str = "store_id";
}

fn aliases(field: &str) -> &'static [&'static str] {
    match field {
        fields::PRODUCT_ID => &["product_id", "id", "sku", "codigo", "código"],
        fields::NAME => &["name", "product", "nome", "produto"],
        fields::CATEGORY => &["category", "categoria"],
        fields::BRAND => &["brand", "marca"],
        fields::QUANTITY => &["quantity", "qty", "quantidade", "qtd"],
        fields::EXPIRATION_DATE => &[
            "expiration_date",
            "expiration",
            "expires_on",
            "validade",
            "data_de_validade",
            "data_validade",
            "vencimento",
        ],
        fields::ORIGINAL_PRICE => &[
            "original_price",
            "price",
            "preco_original",
            "preço_original",
            "preco",
            "preço",
        ],
        fields::CURRENT_PRICE => &["current_price", "preco_atual", "preço_atual", "preco_promocional"],
        fields::STORE_ID => &["store_id", "store", "loja", "id_loja"],
        _ => &[],
    }
}

/// 规范化列名: 去空白、小写、空格/连字符 → 下划线
fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

// Excel 序列日期的起点（1900 日期系统）
fn excel_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)
}

// ==========================================
// RawProductRecord - 映射后的中间结构
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct RawProductRecord {
    pub row_number: usize,
    pub product_id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub quantity: Option<i64>,
    pub expiration_date: Option<NaiveDate>,
    pub original_price: Option<f64>,
    pub current_price: Option<f64>,
    pub store_id: Option<String>,
}

// ==========================================
// FieldMapper - 字段映射器
// ==========================================
pub struct FieldMapper {
    date_formats: Vec<String>,
}

impl FieldMapper {
    pub fn new(date_formats: Vec<String>) -> Self {
        Self { date_formats }
    }

    /// 检查表头是否包含必需列（基于首行记录的列集合）
    pub fn check_required_columns(&self, row: &RawRow) -> ImportResult<()> {
        let present: Vec<String> = row.keys().map(|k| normalize_header(k)).collect();
        for field in [fields::NAME, fields::CATEGORY, fields::EXPIRATION_DATE, fields::STORE_ID] {
            let found = aliases(field).iter().any(|a| present.iter().any(|p| p == a));
            if !found {
                return Err(ImportError::MissingColumn(field.to_string()));
            }
        }
        Ok(())
    }

    /// 将原始行记录映射为 RawProductRecord
    pub fn map_row(&self, row: &RawRow, row_number: usize) -> ImportResult<RawProductRecord> {
        Ok(RawProductRecord {
            row_number,
            product_id: self.get_string(row, fields::PRODUCT_ID),
            name: self.get_string(row, fields::NAME),
            category: self.get_string(row, fields::CATEGORY),
            brand: self.get_string(row, fields::BRAND),
            quantity: self.parse_i64(row, fields::QUANTITY, row_number)?,
            expiration_date: self.parse_date(row, fields::EXPIRATION_DATE, row_number)?,
            original_price: self.parse_price(row, fields::ORIGINAL_PRICE, row_number)?,
            current_price: self.parse_price(row, fields::CURRENT_PRICE, row_number)?,
            store_id: self.get_string(row, fields::STORE_ID),
        })
    }

    /// 提取字符串字段（按别名依次查找,空值视为缺失）
    fn get_string(&self, row: &RawRow, field: &str) -> Option<String> {
        let wanted = aliases(field);
        row.iter()
            .filter(|(k, _)| wanted.contains(&normalize_header(k).as_str()))
            .map(|(_, v)| v.trim())
            .find(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn parse_i64(&self, row: &RawRow, field: &str, row_number: usize) -> ImportResult<Option<i64>> {
        let value = match self.get_string(row, field) {
            None => return Ok(None),
            Some(v) => v,
        };

        // Excel 数字单元格会带 ".0"
        let parsed = value
            .parse::<i64>()
            .ok()
            .or_else(|| value.parse::<f64>().ok().filter(|f| f.fract() == 0.0).map(|f| f as i64));

        parsed.map(Some).ok_or_else(|| ImportError::TypeConversionError {
            row: row_number,
            field: field.to_string(),
            message: format!("无法解析为整数: {}", value),
        })
    }

    /// 解析价格（兼容 "R$ 12,50" / "12.50"）
    fn parse_price(&self, row: &RawRow, field: &str, row_number: usize) -> ImportResult<Option<f64>> {
        let value = match self.get_string(row, field) {
            None => return Ok(None),
            Some(v) => v,
        };

        let mut cleaned: String = value
            .chars()
            .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
            .collect();
        // 最后出现的分隔符为小数点,另一个为千分位
        match (cleaned.rfind(','), cleaned.rfind('.')) {
            (Some(comma), Some(dot)) if comma > dot => {
                cleaned = cleaned.replace('.', "").replace(',', ".");
            }
            (Some(_), Some(_)) => cleaned = cleaned.replace(',', ""),
            (Some(_), None) => cleaned = cleaned.replace(',', "."),
            _ => {}
        }

        cleaned
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ImportError::TypeConversionError {
                row: row_number,
                field: field.to_string(),
                message: format!("无法解析为金额: {}", value),
            })
    }

    /// 解析日期（按配置格式依次尝试,最后兼容 Excel 序列日期）
    fn parse_date(&self, row: &RawRow, field: &str, row_number: usize) -> ImportResult<Option<NaiveDate>> {
        let value = match self.get_string(row, field) {
            None => return Ok(None),
            Some(v) => v,
        };

        for format in &self.date_formats {
            if let Ok(date) = NaiveDate::parse_from_str(&value, format) {
                return Ok(Some(date));
            }
        }

        // 日期单元格被读成 "2026-02-01 00:00:00" 时取日期部分
        if let Some(date_part) = value.split_whitespace().next() {
            if let Ok(date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
                return Ok(Some(date));
            }
        }

        if let Ok(serial) = value.parse::<f64>() {
            if serial >= 1.0 && serial.fract() == 0.0 {
                if let Some(date) = excel_epoch().and_then(|epoch| {
                    epoch.checked_add_signed(Duration::days(serial as i64))
                }) {
                    return Ok(Some(date));
                }
            }
        }

        Err(ImportError::DateFormatError {
            row: row_number,
            field: field.to_string(),
            value,
        })
    }
}
