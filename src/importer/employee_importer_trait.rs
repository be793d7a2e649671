// ==========================================
// 人事后台 - 员工导入 Trait
// ==========================================
// 职责: 定义员工导入接口（不包含实现）
// 管道: 解析 → 规范化 → 校验 → 文件内重复 → 库内冲突 → 落库 → 汇总
// ==========================================

use crate::domain::employee_import::{
    Candidate, ExistingEmployeeKey, ImportError, ImportResult, ImportRow, PartialCandidate,
    UniqueKey,
};
use crate::importer::error::ImporterResult;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// EmployeeImporter Trait
// ==========================================
// 用途: 员工导入主接口
// 实现者: EmployeeImporterImpl
#[async_trait]
pub trait EmployeeImporter: Send + Sync {
    /// 从上传内容导入员工
    ///
    /// # 返回
    /// - Ok(ImportResult): 导入汇总（可能包含行级错误）
    /// - Err(ImporterError::InvalidFile): 文件级致命错误，未落库任何记录
    ///
    /// # 导入流程
    /// 1. 解码、表头检查
    /// 2. CSV 结构解析
    /// 3. 逐行规范化 + 校验
    /// 4. 文件内重复检测（dni / email）
    /// 5. 库内冲突检测（单次批量查询）
    /// 6. 批量落库
    /// 7. 汇总（错误按行号、字段排序）
    async fn import_from_bytes(&self, bytes: &[u8]) -> ImporterResult<ImportResult>;

    /// 从本地 CSV 文件导入员工
    async fn import_from_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImporterResult<ImportResult>;

    /// 导入模板（表头 + 示例行）
    fn import_template(&self) -> String;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 1-2）
// 实现者: CsvParser
pub trait FileParser: Send + Sync {
    /// 解析上传内容为行记录
    ///
    /// # 返回
    /// - Ok(Vec<ImportRow>): 至少一行数据，行号 = 序号 + 2
    /// - Err(InvalidFile): 空文件 / 缺表头 / 缺列 / 无法解析 / 无数据行
    fn parse_bytes(&self, bytes: &[u8]) -> ImporterResult<Vec<ImportRow>>;
}

// ==========================================
// RowNormalizer Trait
// ==========================================
// 用途: 行规范化接口（阶段 3a）
// 实现者: DataCleaner
pub trait RowNormalizer: Send + Sync {
    /// 规范化单行
    ///
    /// # 返回
    /// - PartialCandidate: 已 TRIM / 小写化的候选
    /// - Vec<ImportError>: 规范化阶段产生的行级错误（如无法解析的入职日期）
    fn normalize(&self, row: &ImportRow) -> (PartialCandidate, Vec<ImportError>);
}

// ==========================================
// RowValidator Trait
// ==========================================
// 用途: 创建 schema 校验接口（阶段 3b）
// 实现者: DqValidator
pub trait RowValidator: Send + Sync {
    /// 校验单行候选
    ///
    /// # 返回
    /// - Ok(Candidate): 通过校验且已补全默认值
    /// - Err(Vec<ImportError>): 每条违反的规则一条错误
    fn validate(
        &self,
        row_number: usize,
        partial: PartialCandidate,
    ) -> Result<Candidate, Vec<ImportError>>;
}

// ==========================================
// ConflictHandler Trait
// ==========================================
// 用途: 重复 / 冲突检测接口（阶段 4-5）
// 实现者: ConflictHandler
pub trait ConflictHandler: Send + Sync {
    /// 检测文件内重复（首次出现者保留）
    ///
    /// # 返回
    /// - Vec<ImportError>: 除最小行号外每次重复出现一条错误
    fn detect_duplicates(&self, candidates: &[Candidate], key: UniqueKey) -> Vec<ImportError>;

    /// 检测与库内记录的冲突
    ///
    /// # 参数
    /// - candidates: 尚未失败的候选
    /// - existing: 批量查询得到的库内唯一键
    fn detect_persisted_conflicts(
        &self,
        candidates: &[&Candidate],
        existing: &[ExistingEmployeeKey],
    ) -> Vec<ImportError>;
}
