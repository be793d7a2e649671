// ==========================================
// 人事后台 - 员工主数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑，只负责数据访问
// 约束: 所有查询使用参数化，防止 SQL 注入
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::employee::Employee;
use crate::domain::types::{EmployeeStatus, TaxStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

pub(crate) const EMPLOYEE_COLUMNS: &str = "id, dni, first_name, last_name, email, tax_status, \
     status, roles, hired_at, created_at, updated_at";

/// 解析 RFC3339 时间列
fn parse_timestamp(idx: usize, raw: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// 行映射（列顺序与 EMPLOYEE_COLUMNS 一致）
pub(crate) fn map_employee_row(row: &Row<'_>) -> rusqlite::Result<Employee> {
    let tax_status: String = row.get(5)?;
    let status: String = row.get(6)?;
    let roles_json: String = row.get(7)?;
    let roles: Vec<String> = serde_json::from_str(&roles_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Employee {
        id: row.get(0)?,
        dni: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        email: row.get(4)?,
        tax_status: TaxStatus::from_db_str(&tax_status),
        status: EmployeeStatus::from_db_str(&status),
        roles,
        hired_at: parse_timestamp(8, row.get(8)?)?,
        created_at: parse_timestamp(9, row.get(9)?)?,
        updated_at: parse_timestamp(10, row.get(10)?)?,
    })
}

/// 插入单条员工记录（调用方决定是否处于事务中）
pub(crate) fn insert_employee(conn: &Connection, employee: &Employee) -> RepositoryResult<()> {
    conn.execute(
        r#"
        INSERT INTO employee (
            id, dni, first_name, last_name, email, tax_status,
            status, roles, hired_at, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
        params![
            employee.id,
            employee.dni,
            employee.first_name,
            employee.last_name,
            employee.email,
            employee.tax_status.to_db_str(),
            employee.status.to_db_str(),
            serde_json::to_string(&employee.roles)?,
            employee.hired_at.to_rfc3339(),
            employee.created_at.to_rfc3339(),
            employee.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

// ==========================================
// EmployeeRepository - 员工主数据仓储
// ==========================================
/// 员工主数据仓储
/// 职责: 管理 employee 表的 CRUD 操作
pub struct EmployeeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EmployeeRepository {
    /// 创建新的 EmployeeRepository 实例
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

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入员工
    ///
    /// # 返回
    /// - Err(UniqueConstraintViolation): dni 或 email 已存在
    pub fn insert(&self, employee: &Employee) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        insert_employee(&conn, employee)
    }

    /// 按内部 ID 查询
    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Employee>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM employee WHERE id = ?1", EMPLOYEE_COLUMNS);
        let employee = conn
            .query_row(&sql, params![id], map_employee_row)
            .optional()?;
        Ok(employee)
    }

    /// 按 dni 查询
    pub fn find_by_dni(&self, dni: &str) -> RepositoryResult<Option<Employee>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM employee WHERE dni = ?1", EMPLOYEE_COLUMNS);
        let employee = conn
            .query_row(&sql, params![dni], map_employee_row)
            .optional()?;
        Ok(employee)
    }

    /// 列出全部员工（按创建时间倒序）
    pub fn list(&self) -> RepositoryResult<Vec<Employee>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM employee ORDER BY created_at DESC, rowid DESC",
            EMPLOYEE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let employees = stmt
            .query_map([], map_employee_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(employees)
    }

    /// 整体覆盖更新（id 不变）
    ///
    /// # 返回
    /// - Err(NotFound): 记录不存在
    pub fn update(&self, employee: &Employee) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE employee
            SET dni = ?2, first_name = ?3, last_name = ?4, email = ?5,
                tax_status = ?6, status = ?7, roles = ?8, hired_at = ?9,
                updated_at = ?10
            WHERE id = ?1
            "#,
            params![
                employee.id,
                employee.dni,
                employee.first_name,
                employee.last_name,
                employee.email,
                employee.tax_status.to_db_str(),
                employee.status.to_db_str(),
                serde_json::to_string(&employee.roles)?,
                employee.hired_at.to_rfc3339(),
                employee.updated_at.to_rfc3339(),
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Employee".to_string(),
                id: employee.id.clone(),
            });
        }
        Ok(())
    }

    /// 员工总数
    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM employee", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// 清空员工表（测试 / 重置用）
    pub fn delete_all(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM employee", [])?;
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, init_schema};
    use crate::domain::employee::NewEmployee;

    fn setup_repo() -> EmployeeRepository {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        EmployeeRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn new_employee(dni: &str, email: &str) -> Employee {
        NewEmployee {
            dni: dni.to_string(),
            first_name: "Ana".to_string(),
            last_name: "Lopez".to_string(),
            email: email.to_string(),
            tax_status: TaxStatus::Registered,
            status: EmployeeStatus::Active,
            hired_at: None,
        }
        .into_employee()
    }

    #[test]
    fn test_insert_and_find_by_id() {
        let repo = setup_repo();
        let employee = new_employee("12345678", "ana@example.com");
        repo.insert(&employee).unwrap();

        let found = repo.find_by_id(&employee.id).unwrap().unwrap();
        assert_eq!(found.dni, "12345678");
        assert_eq!(found.tax_status, TaxStatus::Registered);
        assert!(found.roles.is_empty());

        assert!(repo.find_by_id("missing").unwrap().is_none());
    }

    #[test]
    fn test_insert_duplicate_email_is_unique_violation() {
        let repo = setup_repo();
        repo.insert(&new_employee("12345678", "ana@example.com")).unwrap();

        let err = repo
            .insert(&new_employee("87654321", "ana@example.com"))
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[test]
    fn test_update_missing_returns_not_found() {
        let repo = setup_repo();
        let employee = new_employee("12345678", "ana@example.com");

        let err = repo.update(&employee).unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[test]
    fn test_roles_round_trip_through_json_column() {
        let repo = setup_repo();
        let mut employee = new_employee("12345678", "ana@example.com");
        repo.insert(&employee).unwrap();

        employee.roles = vec!["driver".to_string(), "manager".to_string()];
        repo.update(&employee).unwrap();

        let found = repo.find_by_dni("12345678").unwrap().unwrap();
        assert_eq!(found.roles, employee.roles);
        assert_eq!(repo.count().unwrap(), 1);
    }
}
