// ==========================================
// 人事后台 - 文件解析器实现
// ==========================================
// 阶段 1: 解码 + 表头检查（按列名存在性，不看顺序）
// 阶段 2: CSV 结构解析（空行跳过、字段 TRIM）
// ==========================================

use crate::domain::employee_import::ImportRow;
use crate::importer::employee_importer_trait::FileParser;
use crate::importer::error::{ImporterError, ImporterResult};
use crate::importer::template::EMPLOYEE_IMPORT_HEADERS;
use csv::{ReaderBuilder, Trim};
use tracing::{debug, warn};

pub const MSG_EMPTY_FILE: &str =
    "CSV file is empty. Download the template and add at least one employee row.";
pub const MSG_MISSING_HEADER: &str = "CSV file is missing the header row.";
pub const MSG_UNPARSEABLE: &str =
    "Unable to parse CSV file. Ensure it is a valid comma-separated file.";
pub const MSG_NO_ROWS: &str = "CSV file does not contain any employee rows.";

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 解析表头行为列名列表（去空白、去首尾引号）
    fn header_columns(header_line: &str) -> Vec<String> {
        header_line
            .split(',')
            .map(|column| column.trim().trim_matches('"').to_string())
            .collect()
    }

    /// 返回缺失的必需列（保持模板列顺序）
    fn missing_columns(columns: &[String]) -> Vec<&'static str> {
        EMPLOYEE_IMPORT_HEADERS
            .iter()
            .filter(|required| !columns.iter().any(|c| c == *required))
            .copied()
            .collect()
    }
}

impl FileParser for CsvParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImporterResult<Vec<ImportRow>> {
        let text = String::from_utf8_lossy(bytes);
        let content = text.strip_prefix('\u{feff}').unwrap_or(&text).trim();

        if content.is_empty() {
            return Err(ImporterError::InvalidFile(MSG_EMPTY_FILE.to_string()));
        }

        // 检查表头
        let header_line = content
            .lines()
            .next()
            .filter(|line| !line.trim().is_empty())
            .ok_or_else(|| ImporterError::InvalidFile(MSG_MISSING_HEADER.to_string()))?;

        let missing = Self::missing_columns(&Self::header_columns(header_line));
        if !missing.is_empty() {
            warn!(missing = ?missing, "导入文件缺少必需列");
            return Err(ImporterError::InvalidFile(format!(
                "CSV is missing required columns: {}. Download a fresh template to continue.",
                missing.join(", ")
            )));
        }

        // 结构解析
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .flexible(true) // 列数不一致在下面逐行判定
            .from_reader(content.as_bytes());

        let unparseable = |e: csv::Error| {
            warn!(error = %e, "CSV 结构解析失败");
            ImporterError::InvalidFile(MSG_UNPARSEABLE.to_string())
        };

        let headers: Vec<String> = reader
            .headers()
            .map_err(unparseable)?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(unparseable)?;

            // 跳过空行
            if record.len() == 1 && record.get(0).map_or(true, str::is_empty) {
                continue;
            }

            if record.len() != headers.len() {
                warn!(
                    expected = headers.len(),
                    actual = record.len(),
                    "CSV 行列数与表头不一致"
                );
                return Err(ImporterError::InvalidFile(MSG_UNPARSEABLE.to_string()));
            }

            let values = headers
                .iter()
                .cloned()
                .zip(record.iter().map(str::to_string))
                .collect();

            rows.push(ImportRow {
                row_number: rows.len() + 2, // 表头占第 1 行
                values,
            });
        }

        if rows.is_empty() {
            return Err(ImporterError::InvalidFile(MSG_NO_ROWS.to_string()));
        }

        debug!(rows = rows.len(), "CSV 解析完成");
        Ok(rows)
    }
}
