// ==========================================
// Prazo 零售库存系统 - 促销仓储
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::product::Promotion;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::product_repo::{parse_date_column, parse_timestamp_column};
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

const PROMOTION_COLUMNS: &str =
    "promotion_id, product_id, store_id, discount_percent, starts_on, ends_on, created_at";

pub struct PromotionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PromotionRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 设置促销: 写入商品现价并记录促销（同一事务）
    ///
    /// # 错误
    /// - FieldValueError: 促销价为负或非有限值
    /// - NotFound: 商品不存在
    /// - UniqueConstraintViolation: 促销编号已存在（现价不变）
    pub fn apply(&self, promotion: &Promotion, promotional_price: f64) -> RepositoryResult<()> {
        if promotional_price < 0.0 || !promotional_price.is_finite() {
            return Err(RepositoryError::FieldValueError {
                field: "current_price".to_string(),
                message: format!("价格不能为负: {}", promotional_price),
            });
        }

        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let affected = tx.execute(
            "UPDATE products SET current_price = ?2, updated_at = ?3 WHERE product_id = ?1",
            params![
                promotion.product_id,
                promotional_price,
                Utc::now().to_rfc3339()
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Product".to_string(),
                id: promotion.product_id.clone(),
            });
        }

        tx.execute(
            &format!(
                "INSERT INTO promotions ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                PROMOTION_COLUMNS
            ),
            params![
                promotion.promotion_id,
                promotion.product_id,
                promotion.store_id,
                promotion.discount_percent,
                promotion.starts_on.to_string(),
                promotion.ends_on.to_string(),
                promotion.created_at.to_rfc3339(),
            ],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// 按门店查询促销（store_id 为 None 时查询全部）
    pub fn list_by_store(&self, store_id: Option<&str>) -> RepositoryResult<Vec<Promotion>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM promotions
             WHERE (?1 IS NULL OR store_id = ?1)
             ORDER BY starts_on ASC, promotion_id ASC",
            PROMOTION_COLUMNS
        ))?;
        let rows = stmt.query_map(params![store_id], map_promotion_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn map_promotion_row(row: &Row) -> rusqlite::Result<Promotion> {
    Ok(Promotion {
        promotion_id: row.get(0)?,
        product_id: row.get(1)?,
        store_id: row.get(2)?,
        discount_percent: row.get(3)?,
        starts_on: parse_date_column(row, 4)?,
        ends_on: parse_date_column(row, 5)?,
        created_at: parse_timestamp_column(row, 6)?,
    })
}
