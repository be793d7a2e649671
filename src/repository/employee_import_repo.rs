// ==========================================
// 人事后台 - 员工导入 Repository Trait
// ==========================================
// 职责: 定义导入相关数据访问接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::employee::Employee;
use crate::domain::employee_import::ExistingEmployeeKey;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// EmployeeImportRepository Trait
// ==========================================
// 用途: 员工导入相关数据访问
// 实现者: EmployeeImportRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait EmployeeImportRepository: Send + Sync {
    /// 批量查询已存在的唯一键（单次查询）
    ///
    /// # 参数
    /// - dnis: 待检测的 dni 集合
    /// - emails: 待检测的 email 集合
    ///
    /// # 返回
    /// - Ok(Vec<ExistingEmployeeKey>): dni 或 email 命中任一集合的库内记录
    async fn find_existing_keys(
        &self,
        dnis: &[String],
        emails: &[String],
    ) -> RepositoryResult<Vec<ExistingEmployeeKey>>;

    /// 批量插入员工（事务化，INSERT 策略，不覆盖）
    ///
    /// # 返回
    /// - Ok(usize): 成功插入的记录数
    /// - Err(UniqueConstraintViolation): 唯一键冲突（整个事务回滚）
    async fn batch_insert_employees(&self, employees: Vec<Employee>) -> RepositoryResult<usize>;
}
