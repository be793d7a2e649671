// ==========================================
// 人事后台 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

/// 上传文件大小上限默认值（5 MiB）
pub const DEFAULT_MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

/// dni 最小长度默认值
pub const DEFAULT_DNI_MIN_LENGTH: usize = 6;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块与单条创建共享的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取上传文件大小上限（字节）
    ///
    /// # 默认值
    /// - 5 MiB
    async fn get_max_file_bytes(&self) -> RepositoryResult<usize>;

    /// 获取 dni 最小长度
    ///
    /// # 默认值
    /// - 6
    async fn get_dni_min_length(&self) -> RepositoryResult<usize>;
}
