// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================

#![allow(dead_code)]

use hr_backoffice::db::{init_schema, open_sqlite_connection};
use hr_backoffice::domain::{Employee, EmployeeStatus, NewEmployee, TaxStatus};
use hr_backoffice::repository::EmployeeRepository;
use std::error::Error;
use tempfile::NamedTempFile;

/// 导入文件表头
pub const HEADER: &str = "dni,firstName,lastName,email,taxStatus,status,hiredAt";

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 拼接 CSV 内容（表头 + 数据行）
pub fn csv_with_rows(rows: &[&str]) -> String {
    let mut content = String::from(HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    content
}

/// 直接写入一名员工（模拟库内已有数据）
pub fn seed_employee(db_path: &str, dni: &str, email: &str) -> Result<Employee, Box<dyn Error>> {
    let repo = EmployeeRepository::new(db_path)?;
    let employee = NewEmployee {
        dni: dni.to_string(),
        first_name: "Existing".to_string(),
        last_name: "Employee".to_string(),
        email: email.to_string(),
        tax_status: TaxStatus::Registered,
        status: EmployeeStatus::Active,
        hired_at: None,
    }
    .into_employee();
    repo.insert(&employee)?;
    Ok(employee)
}
