// ==========================================
// 员工导入API
// ==========================================
// 职责: 封装员工 CSV 导入与模板下载
// 状态: 无行级错误 → 201，有行级错误 → 207，文件无效 → 400
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, ImportConfigReader};
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::employee_import::ImportResult;
use crate::importer::{
    import_template, ConflictHandlerImpl, CsvParser, DataCleanerImpl, DqValidatorImpl,
    EmployeeImporter, EmployeeImporterImpl,
};
use crate::repository::{EmployeeImportRepositoryImpl, RepositoryError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// 导入结果状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    /// 全部成功
    Created,
    /// 部分成功（存在行级错误）
    MultiStatus,
}

impl ImportStatus {
    pub fn status_code(&self) -> u16 {
        match self {
            ImportStatus::Created => 201,
            ImportStatus::MultiStatus => 207,
        }
    }

    fn from_result(result: &ImportResult) -> Self {
        if result.has_errors() {
            ImportStatus::MultiStatus
        } else {
            ImportStatus::Created
        }
    }
}

/// 导入API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportApiResponse {
    pub status: ImportStatus,
    pub result: ImportResult,
}

/// 导入API
pub struct ImportApi {
    db_path: String,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    pub fn new(db_path: String) -> Self {
        Self { db_path }
    }

    /// 导入员工数据
    ///
    /// # 参数
    /// - bytes: 上传的 CSV 内容
    ///
    /// # 返回
    /// - Ok(ImportApiResponse): 201 / 207
    /// - Err(ApiError::InvalidImportFile): 文件级错误（400）
    pub async fn import_employees(&self, bytes: &[u8]) -> ApiResult<ImportApiResponse> {
        let importer = self.create_importer().await?;

        let result = importer.import_from_bytes(bytes).await.map_err(|e| {
            warn!(error = %e, "员工导入失败");
            ApiError::from(e)
        })?;

        Ok(Self::to_response(result))
    }

    /// 从本地文件导入员工数据
    pub async fn import_employees_from_file(
        &self,
        file_path: impl AsRef<Path> + Send,
    ) -> ApiResult<ImportApiResponse> {
        let importer = self.create_importer().await?;
        let result = importer.import_from_file(file_path).await?;
        Ok(Self::to_response(result))
    }

    /// 获取导入模板
    pub fn get_import_template(&self) -> String {
        import_template()
    }

    fn to_response(result: ImportResult) -> ImportApiResponse {
        let status = ImportStatus::from_result(&result);
        info!(
            status = status.status_code(),
            created = result.created_count,
            failed = result.failed_count,
            "员工导入响应"
        );
        ImportApiResponse { status, result }
    }

    /// 创建导入器（每次调用独立，不共享可变状态）
    ///
    /// 打开连接后先执行幂等 schema 初始化，空库也可直接导入
    async fn create_importer(
        &self,
    ) -> ApiResult<EmployeeImporterImpl<EmployeeImportRepositoryImpl, ConfigManager>> {
        let conn = open_sqlite_connection(&self.db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn).map_err(RepositoryError::from)?;
        let conn = Arc::new(Mutex::new(conn));

        let import_repo = EmployeeImportRepositoryImpl::from_connection(conn.clone());
        let config = ConfigManager::from_connection(conn);
        let dni_min_length = config.get_dni_min_length().await?;

        Ok(EmployeeImporterImpl::new(
            import_repo,
            config,
            Box::new(CsvParser),
            Box::new(DataCleanerImpl),
            Box::new(DqValidatorImpl::new(dni_min_length)),
            Box::new(ConflictHandlerImpl),
        ))
    }
}
