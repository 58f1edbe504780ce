// ==========================================
// Prazo 零售库存系统 - 商品仓储
// ==========================================
// 职责: 管理 products 表的读写
// 红线: 不含业务逻辑,只负责数据访问
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::product::Product;
use crate::domain::report::DateRange;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const PRODUCT_COLUMNS: &str = r#"
    product_id, name, category, brand, quantity, expiration_date,
    original_price, current_price, store_id, sold, sold_at,
    created_at, updated_at
"#;

// ==========================================
// ProductRepository - 商品仓储
// ==========================================
pub struct ProductRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepository {
    /// 创建新的 ProductRepository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 批量写入商品（事务内执行,任一编码已存在则整批回滚）
    ///
    /// # 返回
    /// - Ok(usize): 写入的记录数
    /// - Err(UniqueConstraintViolation): 商品编码已存在
    pub fn batch_insert(&self, products: &[Product]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for product in products {
            tx.execute(
                &format!(
                    "INSERT INTO products ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                    PRODUCT_COLUMNS
                ),
                params![
                    product.product_id,
                    product.name,
                    product.category,
                    product.brand,
                    product.quantity,
                    product.expiration_date.to_string(),
                    product.original_price,
                    product.current_price,
                    product.store_id,
                    product.sold,
                    product.sold_at.map(|dt| dt.to_rfc3339()),
                    product.created_at.to_rfc3339(),
                    product.updated_at.to_rfc3339(),
                ],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }

    /// 按 product_id 查询
    pub fn find_by_id(&self, product_id: &str) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;
        let product = conn
            .query_row(
                &format!("SELECT {} FROM products WHERE product_id = ?1", PRODUCT_COLUMNS),
                params![product_id],
                map_product_row,
            )
            .optional()?;
        Ok(product)
    }

    /// 全部商品编码
    pub fn list_ids(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT product_id FROM products")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// 在库商品（store_id 为 None 时查询全部门店）
    pub fn list_in_stock(&self, store_id: Option<&str>) -> RepositoryResult<Vec<Product>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM products
             WHERE sold = 0 AND (?1 IS NULL OR store_id = ?1)
             ORDER BY expiration_date ASC, name ASC",
            PRODUCT_COLUMNS
        ))?;
        let rows = stmt.query_map(params![store_id], map_product_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// 已售商品（可按售出日期区间过滤,UTC 日历日,闭区间）
    pub fn list_sold(
        &self,
        store_id: Option<&str>,
        range: Option<&DateRange>,
    ) -> RepositoryResult<Vec<Product>> {
        let start = range.map(|r| r.start.to_string());
        let end = range.map(|r| r.end.to_string());

        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM products
             WHERE sold = 1
               AND (?1 IS NULL OR store_id = ?1)
               AND (?2 IS NULL OR substr(sold_at, 1, 10) >= ?2)
               AND (?3 IS NULL OR substr(sold_at, 1, 10) <= ?3)
             ORDER BY sold_at ASC",
            PRODUCT_COLUMNS
        ))?;
        let rows = stmt.query_map(params![store_id, start, end], map_product_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// 全部商品（在库 + 已售）
    pub fn list_all(&self, store_id: Option<&str>) -> RepositoryResult<Vec<Product>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM products
             WHERE (?1 IS NULL OR store_id = ?1)
             ORDER BY created_at ASC, product_id ASC",
            PRODUCT_COLUMNS
        ))?;
        let rows = stmt.query_map(params![store_id], map_product_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// 标记售出
    ///
    /// # 错误
    /// - NotFound: 商品不存在
    /// - BusinessRuleViolation: 商品已售出
    pub fn mark_sold(&self, product_id: &str, sold_at: DateTime<Utc>) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let sold: Option<bool> = conn
            .query_row(
                "SELECT sold FROM products WHERE product_id = ?1",
                params![product_id],
                |row| row.get(0),
            )
            .optional()?;

        match sold {
            None => Err(RepositoryError::NotFound {
                entity: "Product".to_string(),
                id: product_id.to_string(),
            }),
            Some(true) => Err(RepositoryError::BusinessRuleViolation(format!(
                "商品 {} 已售出",
                product_id
            ))),
            Some(false) => {
                conn.execute(
                    "UPDATE products SET sold = 1, sold_at = ?2, updated_at = ?3 WHERE product_id = ?1",
                    params![product_id, sold_at.to_rfc3339(), Utc::now().to_rfc3339()],
                )?;
                Ok(())
            }
        }
    }
}

// ==========================================
// 行映射
// ==========================================

fn map_product_row(row: &Row) -> rusqlite::Result<Product> {
    Ok(Product {
        product_id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        brand: row.get(3)?,
        quantity: row.get(4)?,
        expiration_date: parse_date_column(row, 5)?,
        original_price: row.get(6)?,
        current_price: row.get(7)?,
        store_id: row.get(8)?,
        sold: row.get(9)?,
        sold_at: parse_optional_timestamp_column(row, 10)?,
        created_at: parse_timestamp_column(row, 11)?,
        updated_at: parse_timestamp_column(row, 12)?,
    })
}

// 日期/时间列解析失败视为数据错误（不静默替换）

pub(crate) fn parse_date_column(row: &Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn parse_timestamp_column(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_rfc3339(idx, &raw)
}

pub(crate) fn parse_optional_timestamp_column(
    row: &Row,
    idx: usize,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    row.get::<_, Option<String>>(idx)?
        .map(|raw| parse_rfc3339(idx, &raw))
        .transpose()
}

fn parse_rfc3339(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
