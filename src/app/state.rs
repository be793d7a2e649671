// ==========================================
// 人事后台 - 应用状态
// ==========================================
// 职责: 按数据库路径装配仓储与 API
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::{EmployeeApi, ImportApi};
use crate::config::{ConfigManager, ImportConfigReader};
use crate::db::{init_schema, open_sqlite_connection};
use crate::importer::DqValidatorImpl;
use crate::repository::EmployeeRepository;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "BACKOFFICE_DB_PATH";

/// 应用状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 员工API
    pub employee_api: Arc<EmployeeApi>,

    /// 员工导入API
    pub import_api: Arc<ImportApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建AppState（打开数据库并确保表结构存在）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub async fn new(db_path: String) -> Result<Self, String> {
        tracing::info!(db_path = %db_path, "初始化AppState");

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库表结构初始化失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let employee_repo = Arc::new(EmployeeRepository::from_connection(conn.clone()));
        let config_manager = Arc::new(ConfigManager::from_connection(conn));

        let dni_min_length = config_manager
            .get_dni_min_length()
            .await
            .map_err(|e| format!("读取配置失败: {}", e))?;
        let validator = Arc::new(DqValidatorImpl::new(dni_min_length));

        // ==========================================
        // 初始化API层
        // ==========================================
        let employee_api = Arc::new(EmployeeApi::new(employee_repo, validator));
        let import_api = Arc::new(ImportApi::new(db_path.clone()));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            employee_api,
            import_api,
            config_manager,
        })
    }
}

/// 获取默认数据库路径
///
/// # 返回
/// - 环境变量 BACKOFFICE_DB_PATH（非空时）
/// - 否则: 用户数据目录/hr-backoffice/hr_backoffice.db
/// - 无法获取用户数据目录时: ./hr_backoffice.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./hr_backoffice.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("hr-backoffice");
        // 目录创建失败时沿用当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("hr_backoffice.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_db_path_file_name() {
        let path = get_default_db_path();
        assert!(path.ends_with(".db"));
    }

    #[tokio::test]
    async fn test_app_state_wires_apis() {
        let temp_file = NamedTempFile::new().unwrap();
        let db_path = temp_file.path().to_str().unwrap().to_string();

        let state = AppState::new(db_path.clone()).await.unwrap();

        assert_eq!(state.db_path, db_path);
        assert!(state.employee_api.list_employees().unwrap().is_empty());
        assert!(state
            .import_api
            .get_import_template()
            .starts_with("dni,firstName"));
    }
}
