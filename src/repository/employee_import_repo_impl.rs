// ==========================================
// 人事后台 - 员工导入 Repository 实现
// ==========================================
// 职责: 实现导入相关数据访问（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::employee::Employee;
use crate::domain::employee_import::ExistingEmployeeKey;
use crate::repository::employee_import_repo::EmployeeImportRepository;
use crate::repository::employee_repo::insert_employee;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params_from_iter, Connection};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// 单条 IN 查询的最大绑定参数数（低于 SQLite 变量上限）
const LOOKUP_CHUNK_SIZE: usize = 10_000;

/// 生成 `?, ?, ?` 占位符
fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// 按单列分块查询已存在的 (dni, email)，按 dni 去重后追加到 keys
fn collect_keys_by_column(
    conn: &Connection,
    column: &str,
    values: &[String],
    seen: &mut HashSet<String>,
    keys: &mut Vec<ExistingEmployeeKey>,
) -> RepositoryResult<()> {
    for chunk in values.chunks(LOOKUP_CHUNK_SIZE) {
        let sql = format!(
            "SELECT dni, email FROM employee WHERE {} IN ({})",
            column,
            placeholders(chunk.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| {
            Ok(ExistingEmployeeKey {
                dni: row.get(0)?,
                email: row.get(1)?,
            })
        })?;

        for key in rows {
            let key = key?;
            if seen.insert(key.dni.clone()) {
                keys.push(key);
            }
        }
    }
    Ok(())
}

// ==========================================
// EmployeeImportRepositoryImpl
// ==========================================
pub struct EmployeeImportRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl EmployeeImportRepositoryImpl {
    /// 创建新的 Repository 实例
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

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

#[async_trait]
impl EmployeeImportRepository for EmployeeImportRepositoryImpl {
    async fn find_existing_keys(
        &self,
        dnis: &[String],
        emails: &[String],
    ) -> RepositoryResult<Vec<ExistingEmployeeKey>> {
        if dnis.is_empty() && emails.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.get_conn()?;
        let mut seen = HashSet::new();
        let mut keys = Vec::new();
        collect_keys_by_column(&conn, "dni", dnis, &mut seen, &mut keys)?;
        collect_keys_by_column(&conn, "email", emails, &mut seen, &mut keys)?;

        Ok(keys)
    }

    async fn batch_insert_employees(&self, employees: Vec<Employee>) -> RepositoryResult<usize> {
        if employees.is_empty() {
            return Ok(0);
        }

        let conn = self.get_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut count = 0;
        for employee in &employees {
            // 失败时 tx 被 drop，整体回滚
            insert_employee(&tx, employee)?;
            count += 1;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(count)
    }
}
