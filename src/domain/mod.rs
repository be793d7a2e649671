// ==========================================
// 人事后台 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、导入管道结构
// 红线: 不含数据访问逻辑
// ==========================================

pub mod employee;
pub mod employee_import;
pub mod types;

// 重导出核心类型
pub use employee::{Employee, EmployeeUpdate, NewEmployee};
pub use employee_import::{
    Candidate, ExistingEmployeeKey, ImportError, ImportResult, ImportRow, PartialCandidate,
    UniqueKey,
};
pub use types::{EmployeeStatus, TaxStatus};
