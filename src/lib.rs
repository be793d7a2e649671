// ==========================================
// 人事后台 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 员工主数据维护 + CSV 批量导入
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 员工 CSV 导入
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{EmployeeStatus, TaxStatus};

// 领域实体
pub use domain::{Employee, EmployeeUpdate, ImportError, ImportResult, NewEmployee};

// 导入
pub use importer::{EmployeeImporter, EmployeeImporterImpl, ImporterError};

// API
pub use api::{ApiError, EmployeeApi, ImportApi, ImportStatus};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "人事后台";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
