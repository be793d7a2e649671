// ==========================================
// 人事后台 - 员工导入器实现
// ==========================================
// 职责: 整合导入流程，从上传内容到数据库
// 流程: 解析 → 规范化 → 校验 → 文件内重复 → 库内冲突 → 落库 → 汇总
// 说明: 行级问题全部进入错误台账，只有文件级问题中断导入
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::employee::Employee;
use crate::domain::employee_import::{Candidate, ImportError, ImportResult, UniqueKey};
use crate::importer::employee_importer_trait::{
    ConflictHandler, EmployeeImporter, FileParser, RowNormalizer, RowValidator,
};
use crate::importer::error::{ImporterError, ImporterResult};
use crate::importer::error_ledger::ImportErrorLedger;
use crate::importer::template;
use crate::repository::EmployeeImportRepository;
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

// ==========================================
// EmployeeImporterImpl - 员工导入器实现
// ==========================================
pub struct EmployeeImporterImpl<R, C>
where
    R: EmployeeImportRepository,
    C: ImportConfigReader,
{
    // 数据访问层
    import_repo: R,

    // 配置读取器
    config: C,

    // 导入组件
    file_parser: Box<dyn FileParser>,
    row_normalizer: Box<dyn RowNormalizer>,
    row_validator: Box<dyn RowValidator>,
    conflict_handler: Box<dyn ConflictHandler>,
}

impl<R, C> EmployeeImporterImpl<R, C>
where
    R: EmployeeImportRepository,
    C: ImportConfigReader,
{
    /// 创建新的 EmployeeImporter 实例
    ///
    /// # 参数
    /// - import_repo: 导入数据仓储
    /// - config: 配置读取器
    /// - file_parser: 文件解析器
    /// - row_normalizer: 行规范化器
    /// - row_validator: 行校验器
    /// - conflict_handler: 冲突处理器
    pub fn new(
        import_repo: R,
        config: C,
        file_parser: Box<dyn FileParser>,
        row_normalizer: Box<dyn RowNormalizer>,
        row_validator: Box<dyn RowValidator>,
        conflict_handler: Box<dyn ConflictHandler>,
    ) -> Self {
        Self {
            import_repo,
            config,
            file_parser,
            row_normalizer,
            row_validator,
            conflict_handler,
        }
    }
}

#[async_trait::async_trait]
impl<R, C> EmployeeImporter for EmployeeImporterImpl<R, C>
where
    R: EmployeeImportRepository + Send + Sync,
    C: ImportConfigReader + Send + Sync,
{
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn import_from_bytes(&self, bytes: &[u8]) -> ImporterResult<ImportResult> {
        let start_time = Instant::now();
        info!("开始导入员工数据");

        // === 步骤 1: 大小检查 ===
        let max_file_bytes = self.config.get_max_file_bytes().await?;
        if bytes.len() > max_file_bytes {
            warn!(size = bytes.len(), max_file_bytes, "上传文件超出大小限制");
            return Err(ImporterError::InvalidFile(format!(
                "CSV file is too large. The maximum allowed size is {} bytes.",
                max_file_bytes
            )));
        }

        // === 步骤 2: 解析文件 ===
        debug!("步骤 2: 解析文件");
        let rows = self.file_parser.parse_bytes(bytes)?;
        let total_rows = rows.len();
        info!(total_rows, "文件解析完成");

        // === 步骤 3: 逐行规范化 + 校验 ===
        debug!("步骤 3: 规范化 + 校验");
        let mut ledger = ImportErrorLedger::new();
        let mut candidates: Vec<Candidate> = Vec::with_capacity(total_rows);
        for row in &rows {
            let (partial, normalize_errors) = self.row_normalizer.normalize(row);
            ledger.record_all(normalize_errors);

            match self.row_validator.validate(row.row_number, partial) {
                Ok(candidate) => candidates.push(candidate),
                Err(errors) => {
                    debug!(row_number = row.row_number, errors = errors.len(), "行校验失败");
                    ledger.record_all(errors);
                }
            }
        }
        info!(
            valid = candidates.len(),
            failed_rows = ledger.failed_row_count(),
            "行校验完成"
        );

        // === 步骤 4: 文件内重复检测 ===
        // 覆盖全部通过校验的行（含已因入职日期失败的行）
        debug!("步骤 4: 文件内重复检测");
        for key in [UniqueKey::Dni, UniqueKey::Email] {
            let duplicates = self.conflict_handler.detect_duplicates(&candidates, key);
            if !duplicates.is_empty() {
                debug!(field = key.field(), count = duplicates.len(), "发现文件内重复");
            }
            ledger.record_all(duplicates);
        }

        // === 步骤 5: 库内冲突检测 ===
        debug!("步骤 5: 库内冲突检测");
        let surviving: Vec<&Candidate> = candidates
            .iter()
            .filter(|c| !ledger.is_failed(c.row_number))
            .collect();
        if !surviving.is_empty() {
            let conflicts = self.check_persisted_conflicts(&surviving).await?;
            ledger.record_all(conflicts);
        }

        // === 步骤 6: 批量落库 ===
        debug!("步骤 6: 批量落库");
        let insertable: Vec<&Candidate> = candidates
            .iter()
            .filter(|c| !ledger.is_failed(c.row_number))
            .collect();
        let created_count = self.commit(&insertable, &mut ledger).await?;

        // === 步骤 7: 汇总 ===
        let failed_count = total_rows - created_count;
        let errors = ledger.into_sorted_errors();

        info!(
            total_rows,
            created = created_count,
            failed = failed_count,
            errors = errors.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "员工数据导入完成"
        );

        Ok(ImportResult {
            total_rows,
            created_count,
            failed_count,
            errors,
        })
    }

    async fn import_from_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImporterResult<ImportResult> {
        let path = file_path.as_ref();
        info!(file_path = %path.display(), "读取导入文件");

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            error!(file_path = %path.display(), error = %e, "导入文件读取失败");
            ImporterError::from(e)
        })?;

        self.import_from_bytes(&bytes).await
    }

    fn import_template(&self) -> String {
        template::import_template()
    }
}

// 辅助方法
impl<R, C> EmployeeImporterImpl<R, C>
where
    R: EmployeeImportRepository,
    C: ImportConfigReader,
{
    /// 单次批量查询库内唯一键，并生成冲突错误
    async fn check_persisted_conflicts(
        &self,
        candidates: &[&Candidate],
    ) -> ImporterResult<Vec<ImportError>> {
        let mut seen_dnis = HashSet::new();
        let mut seen_emails = HashSet::new();
        let dnis: Vec<String> = candidates
            .iter()
            .map(|c| c.employee.dni.clone())
            .filter(|dni| seen_dnis.insert(dni.clone()))
            .collect();
        let emails: Vec<String> = candidates
            .iter()
            .map(|c| c.employee.email.clone())
            .filter(|email| seen_emails.insert(email.clone()))
            .collect();

        let existing = self.import_repo.find_existing_keys(&dnis, &emails).await?;
        debug!(
            dnis = dnis.len(),
            emails = emails.len(),
            existing = existing.len(),
            "库内唯一键查询完成"
        );

        Ok(self
            .conflict_handler
            .detect_persisted_conflicts(candidates, &existing))
    }

    /// 批量落库
    ///
    /// # 说明
    /// 检查与插入之间可能有并发写入。插入因唯一键失败时（事务已回滚）:
    /// 重新查询一次库内唯一键，把新冲突记入台账，剩余行重试一次。
    /// 重查没有新冲突或第二次失败时，错误向上传播。
    async fn commit(
        &self,
        insertable: &[&Candidate],
        ledger: &mut ImportErrorLedger,
    ) -> ImporterResult<usize> {
        if insertable.is_empty() {
            return Ok(0);
        }

        let employees = to_employees(insertable.iter().copied());
        let err = match self.import_repo.batch_insert_employees(employees).await {
            Ok(count) => {
                info!(count, "员工批量插入完成");
                return Ok(count);
            }
            Err(err) if err.is_unique_violation() => err,
            Err(err) => {
                error!(error = %err, "员工批量插入失败");
                return Err(err.into());
            }
        };

        warn!(error = %err, "批量插入触发唯一键冲突，重新检测库内冲突");
        let conflicts = self.check_persisted_conflicts(insertable).await?;
        if conflicts.is_empty() {
            error!("重新检测未发现新冲突，放弃重试");
            return Err(err.into());
        }
        ledger.record_all(conflicts);

        let retry: Vec<&Candidate> = insertable
            .iter()
            .copied()
            .filter(|c| !ledger.is_failed(c.row_number))
            .collect();
        if retry.is_empty() {
            return Ok(0);
        }

        let count = self
            .import_repo
            .batch_insert_employees(to_employees(retry.into_iter()))
            .await?;
        info!(count, "员工批量插入重试完成");
        Ok(count)
    }
}

/// 候选 → 待落库员工（roles 为空，hired_at 缺省为当前时间）
fn to_employees<'a>(candidates: impl Iterator<Item = &'a Candidate>) -> Vec<Employee> {
    candidates
        .map(|c| c.employee.clone().into_employee())
        .collect()
}
