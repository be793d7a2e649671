// ==========================================
// 人事后台 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 这里只包含“整文件级”致命错误；行级错误见 domain::ImportError
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImporterError {
    // ===== 文件级致命错误（不产生 ImportResult）=====
    /// 上传文件无效（空文件 / 缺表头 / 缺列 / 无法解析 / 无数据行 / 超出大小）
    #[error("{0}")]
    InvalidFile(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    // ===== 数据库错误 =====
    #[error("数据库操作失败: {0}")]
    Repository(#[from] RepositoryError),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImporterError {
    /// 是否为文件级无效错误（上层映射为 400）
    pub fn is_invalid_file(&self) -> bool {
        matches!(self, ImporterError::InvalidFile(_))
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImporterError {
    fn from(err: std::io::Error) -> Self {
        ImporterError::FileReadError(err.to_string())
    }
}

/// Result 类型别名
pub type ImporterResult<T> = Result<T, ImporterError>;
