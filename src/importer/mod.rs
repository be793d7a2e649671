// ==========================================
// 人事后台 - 导入层
// ==========================================
// 职责: 员工 CSV 批量导入，生成逐行错误报告
// 支持: CSV（UTF-8，可带 BOM）
// ==========================================

// 模块声明
pub mod conflict_handler;
pub mod data_cleaner;
pub mod dq_validator;
pub mod employee_importer_impl;
pub mod employee_importer_trait;
pub mod error;
pub mod error_ledger;
pub mod file_parser;
pub mod template;

// 重导出核心类型
pub use conflict_handler::ConflictHandler as ConflictHandlerImpl;
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use dq_validator::{DqValidator as DqValidatorImpl, FieldViolation};
pub use employee_importer_impl::EmployeeImporterImpl;
pub use error::{ImporterError, ImporterResult};
pub use error_ledger::ImportErrorLedger;
pub use file_parser::CsvParser;
pub use template::{import_template, EMPLOYEE_IMPORT_HEADERS};

// 重导出 Trait 接口
pub use employee_importer_trait::{
    ConflictHandler, EmployeeImporter, FileParser, RowNormalizer, RowValidator,
};
