// ==========================================
// 人事后台 - 冲突处理器实现
// ==========================================
// 职责: 检测文件内重复 dni / email，以及与库内记录的冲突
// 策略: 文件内重复时最小行号保留，其余行报错剔除
// ==========================================

use crate::domain::employee_import::{Candidate, ExistingEmployeeKey, ImportError, UniqueKey};
use crate::importer::employee_importer_trait::ConflictHandler as ConflictHandlerTrait;
use std::collections::{BTreeMap, HashSet};

pub struct ConflictHandler;

impl ConflictHandler {
    fn duplicate_message(key: UniqueKey, value: &str) -> String {
        format!(
            "{} \"{}\" is duplicated in the file.",
            key.field().to_uppercase(),
            value
        )
    }
}

impl ConflictHandlerTrait for ConflictHandler {
    /// 检测文件内重复
    ///
    /// # 返回
    /// - Vec<ImportError>: 重复记录错误（不包括最小行号那一次）
    fn detect_duplicates(&self, candidates: &[Candidate], key: UniqueKey) -> Vec<ImportError> {
        // 键值 → 出现的行号
        let mut occurrences: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for candidate in candidates {
            occurrences
                .entry(key.value_of(candidate))
                .or_default()
                .push(candidate.row_number);
        }

        let mut errors = Vec::new();
        for (value, mut rows) in occurrences {
            if rows.len() <= 1 {
                continue;
            }
            rows.sort_unstable();
            for row_number in rows.into_iter().skip(1) {
                errors.push(ImportError::new(
                    row_number,
                    key.field(),
                    Self::duplicate_message(key, value),
                ));
            }
        }

        errors
    }

    /// 检测与库内记录的冲突
    ///
    /// # 参数
    /// - candidates: 尚未失败的候选
    /// - existing: 库内已存在的 (dni, email)
    ///
    /// # 返回
    /// - Vec<ImportError>: 每个命中的键一条错误
    fn detect_persisted_conflicts(
        &self,
        candidates: &[&Candidate],
        existing: &[ExistingEmployeeKey],
    ) -> Vec<ImportError> {
        let existing_dnis: HashSet<&str> = existing.iter().map(|k| k.dni.as_str()).collect();
        let existing_emails: HashSet<&str> = existing.iter().map(|k| k.email.as_str()).collect();

        let mut errors = Vec::new();
        for candidate in candidates {
            let employee = &candidate.employee;
            if existing_dnis.contains(employee.dni.as_str()) {
                errors.push(ImportError::new(
                    candidate.row_number,
                    UniqueKey::Dni.field(),
                    format!("DNI {} already exists.", employee.dni),
                ));
            }
            if existing_emails.contains(employee.email.as_str()) {
                errors.push(ImportError::new(
                    candidate.row_number,
                    UniqueKey::Email.field(),
                    format!("Email {} already exists.", employee.email),
                ));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::employee::NewEmployee;
    use crate::domain::types::{EmployeeStatus, TaxStatus};

    fn candidate(row_number: usize, dni: &str, email: &str) -> Candidate {
        Candidate {
            row_number,
            employee: NewEmployee {
                dni: dni.to_string(),
                first_name: "Ana".to_string(),
                last_name: "Lopez".to_string(),
                email: email.to_string(),
                tax_status: TaxStatus::Unknown,
                status: EmployeeStatus::Active,
                hired_at: None,
            },
        }
    }

    #[test]
    fn test_detect_duplicates_first_occurrence_wins() {
        let candidates = vec![
            candidate(5, "12345678", "c@x.io"),
            candidate(2, "12345678", "a@x.io"),
            candidate(3, "87654321", "b@x.io"),
            candidate(4, "12345678", "d@x.io"),
        ];

        let errors = ConflictHandler.detect_duplicates(&candidates, UniqueKey::Dni);
        let mut rows: Vec<usize> = errors.iter().map(|e| e.row_number).collect();
        rows.sort_unstable();

        assert_eq!(rows, vec![4, 5]);
        assert!(errors.iter().all(|e| e.field == "dni"));
        assert_eq!(errors[0].message, "DNI \"12345678\" is duplicated in the file.");
    }

    #[test]
    fn test_detect_duplicates_email_key() {
        let candidates = vec![
            candidate(2, "11111111", "same@x.io"),
            candidate(3, "22222222", "same@x.io"),
        ];

        let errors = ConflictHandler.detect_duplicates(&candidates, UniqueKey::Email);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row_number, 3);
        assert_eq!(errors[0].field, "email");
        assert_eq!(errors[0].message, "EMAIL \"same@x.io\" is duplicated in the file.");
    }

    #[test]
    fn test_no_duplicates() {
        let candidates = vec![
            candidate(2, "11111111", "a@x.io"),
            candidate(3, "22222222", "b@x.io"),
        ];
        assert!(ConflictHandler
            .detect_duplicates(&candidates, UniqueKey::Dni)
            .is_empty());
    }

    #[test]
    fn test_detect_persisted_conflicts() {
        let a = candidate(2, "99999999", "new@x.io");
        let b = candidate(3, "11111111", "taken@x.io");
        let c = candidate(4, "22222222", "free@x.io");
        let existing = vec![
            ExistingEmployeeKey {
                dni: "99999999".to_string(),
                email: "someone@x.io".to_string(),
            },
            ExistingEmployeeKey {
                dni: "33333333".to_string(),
                email: "taken@x.io".to_string(),
            },
        ];

        let errors = ConflictHandler.detect_persisted_conflicts(&[&a, &b, &c], &existing);

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0],
            ImportError::new(2, "dni", "DNI 99999999 already exists.")
        );
        assert_eq!(
            errors[1],
            ImportError::new(3, "email", "Email taken@x.io already exists.")
        );
    }
}
