// ==========================================
// Prazo 零售库存系统 - 门店仓储
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::product::Store;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::product_repo::parse_timestamp_column;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

pub struct StoreRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StoreRepository {
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

    /// 新增门店（门店号重复时返回唯一约束错误）
    pub fn insert(&self, store: &Store) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO stores (store_id, name, address, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                store.store_id,
                store.name,
                store.address,
                store.created_at.to_rfc3339()
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, store_id: &str) -> RepositoryResult<Option<Store>> {
        let conn = self.get_conn()?;
        let store = conn
            .query_row(
                "SELECT store_id, name, address, created_at FROM stores WHERE store_id = ?1",
                params![store_id],
                map_store_row,
            )
            .optional()?;
        Ok(store)
    }

    /// 全部门店（按名称排序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Store>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT store_id, name, address, created_at FROM stores ORDER BY name ASC, store_id ASC",
        )?;
        let rows = stmt.query_map([], map_store_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn map_store_row(row: &Row) -> rusqlite::Result<Store> {
    Ok(Store {
        store_id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        created_at: parse_timestamp_column(row, 3)?,
    })
}
