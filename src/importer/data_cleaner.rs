// ==========================================
// 人事后台 - 行规范化器实现
// ==========================================
// 职责: TRIM / 枚举小写化 / 空值标准化 / 入职日期解析
// 说明: 只返回错误值，不做任何落库或外部调用
// ==========================================

use crate::domain::employee_import::{fields, ImportError, ImportRow, PartialCandidate};
use crate::importer::employee_importer_trait::RowNormalizer;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

pub const MSG_INVALID_DATE: &str = "Invalid date. Use YYYY-MM-DD or a valid ISO date string.";

// 仅日期格式（按 00:00:00 UTC 解释）
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

// 不带时区的日期时间格式（按 UTC 解释）
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

pub struct DataCleaner;

impl DataCleaner {
    /// TRIM 文本
    pub fn clean_text(&self, value: &str) -> String {
        value.trim().to_string()
    }

    /// 空串视为缺失
    pub fn normalize_null(&self, value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// 枚举字段: 非空时小写化，空值省略（由校验器补默认值）
    pub fn clean_enum(&self, value: &str) -> Option<String> {
        self.normalize_null(value).map(|v| v.to_lowercase())
    }

    /// 解析入职日期
    ///
    /// # 支持格式
    /// - YYYY-MM-DD / YYYY/MM/DD / YYYYMMDD（当日 00:00 UTC）
    /// - RFC 3339（带时区，换算为 UTC）
    /// - YYYY-MM-DDTHH:MM[:SS] / YYYY-MM-DD HH:MM[:SS]（无时区，按 UTC）
    ///
    /// # 返回
    /// - None: 无法解析
    pub fn parse_hire_date(&self, value: &str) -> Option<DateTime<Utc>> {
        let value = value.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt.with_timezone(&Utc));
        }

        for format in DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
                return Some(naive.and_utc());
            }
        }

        DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}

impl RowNormalizer for DataCleaner {
    fn normalize(&self, row: &ImportRow) -> (PartialCandidate, Vec<ImportError>) {
        let mut errors = Vec::new();

        // 身份字段始终存在（可能为空串，由校验器报长度错误）
        let mut partial = PartialCandidate {
            dni: Some(self.clean_text(row.get(fields::DNI))),
            first_name: Some(self.clean_text(row.get(fields::FIRST_NAME))),
            last_name: Some(self.clean_text(row.get(fields::LAST_NAME))),
            email: Some(self.clean_text(row.get(fields::EMAIL))),
            tax_status: self.clean_enum(row.get(fields::TAX_STATUS)),
            status: self.clean_enum(row.get(fields::STATUS)),
            hired_at: None,
        };

        if let Some(raw) = self.normalize_null(row.get(fields::HIRED_AT)) {
            match self.parse_hire_date(&raw) {
                Some(hired_at) => partial.hired_at = Some(hired_at),
                None => errors.push(ImportError::new(
                    row.row_number,
                    fields::HIRED_AT,
                    MSG_INVALID_DATE,
                )),
            }
        }

        (partial, errors)
    }
}
