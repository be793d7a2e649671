// ==========================================
// 人事后台 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、写入
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::{
    ImportConfigReader, DEFAULT_DNI_MIN_LENGTH, DEFAULT_MAX_FILE_BYTES,
};
use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置的快照
    pub fn get_config_snapshot(&self) -> RepositoryResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let snapshot = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(snapshot)
    }

    /// 读取正整数配置，缺失或格式错误时回落默认值
    fn get_usize_or_default(&self, key: &str, default: usize) -> RepositoryResult<usize> {
        let value = self.get_global_config_value(key)?;
        Ok(value
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(default))
    }
}

#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_max_file_bytes(&self) -> RepositoryResult<usize> {
        self.get_usize_or_default(config_keys::IMPORT_MAX_FILE_BYTES, DEFAULT_MAX_FILE_BYTES)
    }

    async fn get_dni_min_length(&self) -> RepositoryResult<usize> {
        self.get_usize_or_default(config_keys::IMPORT_DNI_MIN_LENGTH, DEFAULT_DNI_MIN_LENGTH)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 员工导入
    pub const IMPORT_MAX_FILE_BYTES: &str = "import.max_file_bytes";
    pub const IMPORT_DNI_MIN_LENGTH: &str = "import.dni_min_length";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn setup() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[tokio::test]
    async fn test_defaults_when_missing() {
        let config = setup();
        assert_eq!(config.get_max_file_bytes().await.unwrap(), DEFAULT_MAX_FILE_BYTES);
        assert_eq!(config.get_dni_min_length().await.unwrap(), DEFAULT_DNI_MIN_LENGTH);
    }

    #[tokio::test]
    async fn test_override_and_malformed_fallback() {
        let config = setup();
        config
            .set_global_config_value(config_keys::IMPORT_DNI_MIN_LENGTH, "8")
            .unwrap();
        config
            .set_global_config_value(config_keys::IMPORT_MAX_FILE_BYTES, "lots")
            .unwrap();

        assert_eq!(config.get_dni_min_length().await.unwrap(), 8);
        assert_eq!(config.get_max_file_bytes().await.unwrap(), DEFAULT_MAX_FILE_BYTES);

        let snapshot = config.get_config_snapshot().unwrap();
        assert_eq!(snapshot.len(), 2);
    }
}
