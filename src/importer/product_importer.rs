// ==========================================
// Prazo 零售库存系统 - 商品入库导入器
// ==========================================
// 职责: 整合导入流程，从文件到数据库
// 流程: 解析 → 映射 → 校验 → 落库
// 红线: 有 ERROR 的行不入库,其余行照常入库
//       已存在的商品编码不覆盖（售出记录与到期日不可变）
// ==========================================

use crate::domain::import::{ImportSummary, ImportViolation, ViolationLevel};
use crate::domain::product::Product;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{fields, FieldMapper, RawProductRecord};
use crate::importer::file_parser::{FileParser, UniversalFileParser};
use crate::repository::{ProductRepository, StoreRepository};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// ProductImporter Trait
// ==========================================
#[async_trait]
pub trait ProductImporter: Send + Sync {
    /// 从文件导入商品（CSV / Excel,按扩展名识别）
    ///
    /// # 返回
    /// - Ok(ImportSummary): 导入汇总（含行级违规明细）
    /// - Err: 文件不存在、格式不支持、缺少必需列、数据库错误
    async fn import_from_file<P: AsRef<Path> + Send>(&self, file_path: P) -> ImportResult<ImportSummary>;

    /// 批量导入多个文件（并发执行）
    ///
    /// # 说明
    /// - 每个文件的导入是独立的，互不影响
    /// - 返回顺序与输入顺序一致
    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Vec<Result<ImportSummary, String>>;
}

// ==========================================
// ProductImporterImpl - 商品导入器实现
// ==========================================
pub struct ProductImporterImpl {
    product_repo: Arc<ProductRepository>,
    store_repo: Arc<StoreRepository>,
    file_parser: Box<dyn FileParser>,
    field_mapper: FieldMapper,
}

impl ProductImporterImpl {
    /// 创建导入器
    ///
    /// # 参数
    /// - date_formats: 到期日接受的日期格式（按顺序尝试）
    pub fn new(
        product_repo: Arc<ProductRepository>,
        store_repo: Arc<StoreRepository>,
        date_formats: Vec<String>,
    ) -> Self {
        Self {
            product_repo,
            store_repo,
            file_parser: Box::new(UniversalFileParser),
            field_mapper: FieldMapper::new(date_formats),
        }
    }

    /// 校验映射结果,通过时生成 Product
    fn validate_record(
        &self,
        record: RawProductRecord,
        known_stores: &HashSet<String>,
        existing_ids: &HashSet<String>,
        seen_ids: &mut HashSet<String>,
        violations: &mut Vec<ImportViolation>,
    ) -> Option<Product> {
        let row = record.row_number;
        let before = violations.len();
        let mut push = |v: ImportViolation| violations.push(v.with_product_id(record.product_id.clone()));

        if record.name.is_none() {
            push(ImportViolation::error(row, fields::NAME, "商品名称为空"));
        }
        if record.category.is_none() {
            push(ImportViolation::error(row, fields::CATEGORY, "品类为空"));
        }
        if record.expiration_date.is_none() {
            push(ImportViolation::error(row, fields::EXPIRATION_DATE, "到期日为空"));
        }
        match record.store_id.as_deref() {
            None => push(ImportViolation::error(row, fields::STORE_ID, "门店为空")),
            Some(store_id) if !known_stores.contains(store_id) => push(ImportViolation::error(
                row,
                fields::STORE_ID,
                format!("门店不存在: {}", store_id),
            )),
            Some(_) => {}
        }

        let quantity = record.quantity.unwrap_or(1);
        if quantity < 0 || quantity > u32::MAX as i64 {
            push(ImportViolation::error(
                row,
                fields::QUANTITY,
                format!("数量超出范围: {}", quantity),
            ));
        }

        match record.original_price {
            None => push(ImportViolation::error(row, fields::ORIGINAL_PRICE, "原价为空")),
            Some(p) if p < 0.0 => push(ImportViolation::error(
                row,
                fields::ORIGINAL_PRICE,
                format!("原价不能为负: {}", p),
            )),
            Some(_) => {}
        }

        let current_price = record.current_price.or(record.original_price);
        if let Some(p) = record.current_price {
            if p < 0.0 {
                push(ImportViolation::error(
                    row,
                    fields::CURRENT_PRICE,
                    format!("现价不能为负: {}", p),
                ));
            } else if record.original_price.is_some_and(|orig| p > orig) {
                push(ImportViolation::warning(row, fields::CURRENT_PRICE, "现价高于原价"));
            }
        }

        if let Some(id) = record.product_id.as_deref() {
            if existing_ids.contains(id) {
                push(ImportViolation::error(
                    row,
                    fields::PRODUCT_ID,
                    format!("商品编码已存在: {}", id),
                ));
            } else if !seen_ids.insert(id.to_string()) {
                push(ImportViolation::error(
                    row,
                    fields::PRODUCT_ID,
                    format!("文件内商品编码重复: {}", id),
                ));
            }
        }

        let has_error = violations[before..]
            .iter()
            .any(|v| v.level == ViolationLevel::Error);
        if has_error {
            return None;
        }

        // 上面已保证各必需字段存在
        let now = Utc::now();
        Some(Product {
            product_id: record
                .product_id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: record.name?,
            category: record.category?,
            brand: record.brand,
            quantity: quantity as u32,
            expiration_date: record.expiration_date?,
            original_price: record.original_price?,
            current_price: current_price?,
            store_id: record.store_id?,
            sold: false,
            sold_at: None,
            created_at: now,
            updated_at: now,
        })
    }
}

#[async_trait]
impl ProductImporter for ProductImporterImpl {
    #[instrument(skip(self, file_path), fields(batch_id = tracing::field::Empty))]
    async fn import_from_file<P: AsRef<Path> + Send>(&self, file_path: P) -> ImportResult<ImportSummary> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());

        let path = file_path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        info!(file = %file_name, "开始导入商品数据");

        // === 步骤 1: 解析文件 ===
        let raw_rows = self.file_parser.parse_to_raw_records(path).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;
        let total_rows = raw_rows.len();
        debug!(total_rows, "文件解析完成");

        if let Some(first) = raw_rows.first() {
            self.field_mapper.check_required_columns(first)?;
        }

        // === 步骤 2: 字段映射 ===
        let mut violations = Vec::new();
        let mut records = Vec::with_capacity(total_rows);
        for (idx, row) in raw_rows.iter().enumerate() {
            let row_number = idx + 1;
            match self.field_mapper.map_row(row, row_number) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(row_number, error = %e, "字段映射失败");
                    let field = match &e {
                        ImportError::TypeConversionError { field, .. }
                        | ImportError::DateFormatError { field, .. } => field.clone(),
                        _ => String::new(),
                    };
                    violations.push(ImportViolation::error(row_number, &field, e.to_string()));
                }
            }
        }

        // === 步骤 3: 校验 ===
        let known_stores: HashSet<String> = self
            .store_repo
            .list_all()?
            .into_iter()
            .map(|s| s.store_id)
            .collect();

        let existing_ids: HashSet<String> = self.product_repo.list_ids()?.into_iter().collect();

        let mut seen_ids = HashSet::new();
        let products: Vec<Product> = records
            .into_iter()
            .filter_map(|record| {
                self.validate_record(
                    record,
                    &known_stores,
                    &existing_ids,
                    &mut seen_ids,
                    &mut violations,
                )
            })
            .collect();

        // === 步骤 4: 落库（事务化）===
        let imported = self.product_repo.batch_insert(&products)?;

        violations.sort_by_key(|v| v.row_number);
        let summary = ImportSummary {
            batch_id,
            file_name,
            total_rows,
            imported,
            skipped: total_rows - imported,
            violations,
            elapsed_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            total_rows,
            imported = summary.imported,
            skipped = summary.skipped,
            errors = summary.error_count(),
            warnings = summary.warning_count(),
            elapsed_ms = summary.elapsed_ms,
            "商品导入完成"
        );
        Ok(summary)
    }

    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Vec<Result<ImportSummary, String>> {
        use futures::future::join_all;

        info!(count = file_paths.len(), "开始批量导入文件");

        let import_tasks = file_paths.into_iter().map(|path| {
            let path_str = path.as_ref().display().to_string();
            async move {
                match self.import_from_file(path).await {
                    Ok(summary) => Ok(summary),
                    Err(e) => {
                        error!(file = %path_str, error = %e, "文件导入失败");
                        Err(format!("文件 {} 导入失败: {}", path_str, e))
                    }
                }
            }
        });

        let results = join_all(import_tasks).await;

        info!(
            total = results.len(),
            success = results.iter().filter(|r| r.is_ok()).count(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "批量导入完成"
        );

        results
    }
}
