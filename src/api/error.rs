// ==========================================
// 人事后台 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换下层错误为用户可理解的错误消息
// 映射: status_code() 给出对应的 HTTP 状态码
// ==========================================

use crate::importer::error::ImporterError;
use crate::importer::FieldViolation;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    /// 上传文件无效（消息直接面向用户）
    #[error("{0}")]
    InvalidImportFile(String),

    /// 字段校验失败（带逐字段原因）
    #[error("数据验证失败: {reason}")]
    ValidationError {
        reason: String,
        violations: Vec<FieldViolation>,
    },

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("唯一约束冲突: {0}")]
    Conflict(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ==========================================
    // 导入错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidInput(_)
            | ApiError::InvalidImportFile(_)
            | ApiError::ValidationError { .. } => 400,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::DatabaseError(_)
            | ApiError::ImportError(_)
            | ApiError::InternalError(_)
            | ApiError::Other(_) => 500,
        }
    }

    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        let reason = violations
            .iter()
            .map(|v| format!("{}: {}", v.field, v.message))
            .collect::<Vec<_>>()
            .join("; ");
        ApiError::ValidationError { reason, violations }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::UniqueConstraintViolation(msg) => ApiError::Conflict(msg),
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::InvalidInput(format!("外键约束违反: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::DatabaseConnectionError(msg)
            | RepositoryError::DatabaseTransactionError(msg)
            | RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::InternalError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 ImporterError 转换
// ==========================================
impl From<ImporterError> for ApiError {
    fn from(err: ImporterError) -> Self {
        match err {
            ImporterError::InvalidFile(msg) => ApiError::InvalidImportFile(msg),
            ImporterError::Repository(repo_err) => repo_err.into(),
            ImporterError::FileReadError(msg) => ApiError::ImportError(msg),
            ImporterError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let api_err: ApiError = RepositoryError::NotFound {
            entity: "Employee".to_string(),
            id: "E001".to_string(),
        }
        .into();
        match &api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("Employee"));
                assert!(msg.contains("E001"));
            }
            _ => panic!("Expected NotFound"),
        }
        assert_eq!(api_err.status_code(), 404);

        let api_err: ApiError =
            RepositoryError::UniqueConstraintViolation("employee.email".to_string()).into();
        assert!(matches!(api_err, ApiError::Conflict(_)));
        assert_eq!(api_err.status_code(), 409);
    }

    #[test]
    fn test_importer_error_conversion() {
        let api_err: ApiError =
            ImporterError::InvalidFile("CSV file is missing the header row.".to_string()).into();

        assert_eq!(api_err.status_code(), 400);
        assert_eq!(api_err.to_string(), "CSV file is missing the header row.");

        let api_err: ApiError =
            ImporterError::Repository(RepositoryError::LockError("poisoned".to_string())).into();
        assert!(matches!(api_err, ApiError::InternalError(_)));
        assert_eq!(api_err.status_code(), 500);

        let api_err: ApiError = ImporterError::Repository(
            RepositoryError::DatabaseTransactionError("commit failed".to_string()),
        )
        .into();
        assert!(matches!(api_err, ApiError::DatabaseError(_)));
        assert_eq!(api_err.status_code(), 500);
    }

    #[test]
    fn test_validation_error_reason() {
        let api_err = ApiError::validation(vec![FieldViolation {
            field: "email".to_string(),
            message: "Invalid email".to_string(),
        }]);

        assert_eq!(api_err.status_code(), 400);
        assert!(api_err.to_string().contains("email: Invalid email"));
    }
}
