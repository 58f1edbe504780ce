// ==========================================
// Prazo 零售库存系统 - 入库导入 API
// ==========================================
// 职责: 封装商品入库导入（单文件 / 批量并发）
// ==========================================

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigReader, ReportConfig};
use crate::domain::import::ImportSummary;
use crate::importer::{ProductImporter, ProductImporterImpl};
use crate::repository::{ProductRepository, StoreRepository};

/// 导入API
pub struct ImportApi {
    product_repo: Arc<ProductRepository>,
    store_repo: Arc<StoreRepository>,
    config: Arc<dyn ConfigReader>,
}

impl ImportApi {
    pub fn new(
        product_repo: Arc<ProductRepository>,
        store_repo: Arc<StoreRepository>,
        config: Arc<dyn ConfigReader>,
    ) -> Self {
        Self {
            product_repo,
            store_repo,
            config,
        }
    }

    // 每次导入按最新配置创建导入器
    async fn create_importer(&self) -> ApiResult<ProductImporterImpl> {
        let config = ReportConfig::load(self.config.as_ref())
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        Ok(ProductImporterImpl::new(
            self.product_repo.clone(),
            self.store_repo.clone(),
            config.import_date_formats,
        ))
    }

    /// 导入商品文件（CSV / Excel）
    ///
    /// # 返回
    /// - Ok(ImportSummary): 导入汇总（有错误的行被跳过并列入违规明细）
    /// - Err(ApiError): 文件不存在、格式不支持、缺少必需列
    #[instrument(skip(self))]
    pub async fn import_products(&self, file_path: &str) -> ApiResult<ImportSummary> {
        if file_path.trim().is_empty() {
            return Err(ApiError::InvalidInput("文件路径不能为空".to_string()));
        }

        let importer = self.create_importer().await?;
        let summary = importer.import_from_file(Path::new(file_path)).await?;

        info!(
            batch_id = %summary.batch_id,
            imported = summary.imported,
            skipped = summary.skipped,
            "导入完成"
        );
        Ok(summary)
    }

    /// 批量导入（并发执行,单个文件失败不影响其他文件）
    pub async fn batch_import_products(
        &self,
        file_paths: &[String],
    ) -> ApiResult<Vec<Result<ImportSummary, String>>> {
        if file_paths.is_empty() {
            return Err(ApiError::InvalidInput("文件列表不能为空".to_string()));
        }

        let importer = self.create_importer().await?;
        let paths: Vec<&Path> = file_paths.iter().map(Path::new).collect();
        Ok(importer.batch_import(paths).await)
    }
}
