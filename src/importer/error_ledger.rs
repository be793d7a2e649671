// ==========================================
// 人事后台 - 导入错误台账
// ==========================================
// 各阶段返回错误值，由编排器折叠进台账
// 台账同时维护“已失败行”集合
// ==========================================

use crate::domain::employee_import::ImportError;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct ImportErrorLedger {
    errors: Vec<ImportError>,
    failed_rows: HashSet<usize>,
}

impl ImportErrorLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一条错误并标记该行失败
    pub fn record(&mut self, error: ImportError) {
        self.failed_rows.insert(error.row_number);
        self.errors.push(error);
    }

    pub fn record_all<I>(&mut self, errors: I)
    where
        I: IntoIterator<Item = ImportError>,
    {
        for error in errors {
            self.record(error);
        }
    }

    pub fn is_failed(&self, row_number: usize) -> bool {
        self.failed_rows.contains(&row_number)
    }

    pub fn failed_row_count(&self) -> usize {
        self.failed_rows.len()
    }

    /// 输出按 (行号, 字段) 排序的错误（稳定排序，同键保持记录顺序）
    pub fn into_sorted_errors(self) -> Vec<ImportError> {
        let mut errors = self.errors;
        errors.sort_by(|a, b| {
            a.row_number
                .cmp(&b.row_number)
                .then_with(|| a.field.cmp(&b.field))
        });
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_marks_row_failed() {
        let mut ledger = ImportErrorLedger::new();
        ledger.record(ImportError::new(3, "dni", "x"));

        assert!(ledger.is_failed(3));
        assert!(!ledger.is_failed(2));
        assert_eq!(ledger.failed_row_count(), 1);
    }

    #[test]
    fn test_sorted_by_row_then_field() {
        let mut ledger = ImportErrorLedger::new();
        ledger.record_all(vec![
            ImportError::new(4, "dni", "dup"),
            ImportError::new(2, "email", "bad email"),
            ImportError::new(2, "dni", "too short"),
            ImportError::new(2, "dni", "second"),
        ]);

        let errors = ledger.into_sorted_errors();
        let keys: Vec<(usize, &str, &str)> = errors
            .iter()
            .map(|e| (e.row_number, e.field.as_str(), e.message.as_str()))
            .collect();

        assert_eq!(
            keys,
            vec![
                (2, "dni", "too short"),
                (2, "dni", "second"),
                (2, "email", "bad email"),
                (4, "dni", "dup"),
            ]
        );
    }
}
