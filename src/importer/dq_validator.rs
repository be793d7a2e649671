// ==========================================
// 人事后台 - 员工数据校验器实现
// ==========================================
// 职责: 创建 / 更新 schema 校验（导入与单条接口共用同一套规则）
// 规则: dni 最短长度 / 姓名非空 / 邮箱格式 / 枚举取值
// ==========================================

use crate::config::DEFAULT_DNI_MIN_LENGTH;
use crate::domain::employee::{EmployeeUpdate, NewEmployee};
use crate::domain::employee_import::{fields, Candidate, ImportError, PartialCandidate};
use crate::domain::types::{EmployeeStatus, TaxStatus};
use crate::importer::employee_importer_trait::RowValidator;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const MSG_REQUIRED: &str = "Required";
pub const MSG_INVALID_EMAIL: &str = "Invalid email";

const EMAIL_PATTERN: &str =
    r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$";

fn email_regex() -> Option<&'static Regex> {
    static EMAIL_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL_REGEX
        .get_or_init(|| Regex::new(EMAIL_PATTERN).ok())
        .as_ref()
}

/// 邮箱格式校验（本地部分不能以 '.' 开头，不能含连续 '..'）
pub fn is_valid_email(value: &str) -> bool {
    if value.starts_with('.') || value.contains("..") {
        return false;
    }
    email_regex().map_or(false, |re| re.is_match(value))
}

// ==========================================
// FieldViolation - 字段级违规
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// 附加行号，转为导入行级错误
    pub fn at_row(self, row_number: usize) -> ImportError {
        ImportError::new(row_number, self.field, self.message)
    }
}

fn min_length_message(min: usize) -> String {
    format!("String must contain at least {} character(s)", min)
}

fn enum_message(expected: impl IntoIterator<Item = &'static str>, received: &str) -> String {
    let expected = expected
        .into_iter()
        .map(|v| format!("'{}'", v))
        .collect::<Vec<_>>()
        .join(" | ");
    format!(
        "Invalid enum value. Expected {}, received '{}'",
        expected, received
    )
}

// ==========================================
// DqValidator
// ==========================================
pub struct DqValidator {
    dni_min_length: usize, // dni 最短长度（来自 import.dni_min_length）
}

impl Default for DqValidator {
    fn default() -> Self {
        Self::new(DEFAULT_DNI_MIN_LENGTH)
    }
}

impl DqValidator {
    pub fn new(dni_min_length: usize) -> Self {
        Self { dni_min_length }
    }

    fn check_min_length(
        &self,
        field: &str,
        value: &str,
        min: usize,
        violations: &mut Vec<FieldViolation>,
    ) {
        if value.chars().count() < min {
            violations.push(FieldViolation::new(field, min_length_message(min)));
        }
    }

    fn check_required_min_length(
        &self,
        field: &str,
        value: Option<&str>,
        min: usize,
        violations: &mut Vec<FieldViolation>,
    ) {
        match value {
            Some(v) => self.check_min_length(field, v, min, violations),
            None => violations.push(FieldViolation::new(field, MSG_REQUIRED)),
        }
    }

    fn check_email(&self, value: Option<&str>, violations: &mut Vec<FieldViolation>) {
        match value {
            Some(v) if !is_valid_email(v) => {
                violations.push(FieldViolation::new(fields::EMAIL, MSG_INVALID_EMAIL))
            }
            Some(_) => {}
            None => violations.push(FieldViolation::new(fields::EMAIL, MSG_REQUIRED)),
        }
    }

    /// 校验创建载荷并补全默认值
    ///
    /// # 返回
    /// - Ok(NewEmployee): taxStatus 缺省 unknown，status 缺省 active
    /// - Err(Vec<FieldViolation>): 每条违反的规则一条
    pub fn check_create(
        &self,
        partial: PartialCandidate,
    ) -> Result<NewEmployee, Vec<FieldViolation>> {
        let mut violations = Vec::new();

        self.check_required_min_length(
            fields::DNI,
            partial.dni.as_deref(),
            self.dni_min_length,
            &mut violations,
        );
        self.check_required_min_length(
            fields::FIRST_NAME,
            partial.first_name.as_deref(),
            1,
            &mut violations,
        );
        self.check_required_min_length(
            fields::LAST_NAME,
            partial.last_name.as_deref(),
            1,
            &mut violations,
        );
        self.check_email(partial.email.as_deref(), &mut violations);

        let tax_status = match partial.tax_status.as_deref() {
            None => Some(TaxStatus::default()),
            Some(raw) => {
                let parsed = TaxStatus::parse(raw);
                if parsed.is_none() {
                    violations.push(FieldViolation::new(
                        fields::TAX_STATUS,
                        enum_message(TaxStatus::ALL.iter().map(|s| s.to_db_str()), raw),
                    ));
                }
                parsed
            }
        };

        let status = match partial.status.as_deref() {
            None => Some(EmployeeStatus::default()),
            Some(raw) => {
                let parsed = EmployeeStatus::parse(raw);
                if parsed.is_none() {
                    violations.push(FieldViolation::new(
                        fields::STATUS,
                        enum_message(EmployeeStatus::ALL.iter().map(|s| s.to_db_str()), raw),
                    ));
                }
                parsed
            }
        };

        match (violations.is_empty(), tax_status, status) {
            (true, Some(tax_status), Some(status)) => Ok(NewEmployee {
                dni: partial.dni.unwrap_or_default(),
                first_name: partial.first_name.unwrap_or_default(),
                last_name: partial.last_name.unwrap_or_default(),
                email: partial.email.unwrap_or_default(),
                tax_status,
                status,
                hired_at: partial.hired_at,
            }),
            _ => Err(violations),
        }
    }

    /// 校验部分更新载荷（只校验出现的字段）
    pub fn check_update(&self, update: &EmployeeUpdate) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        if let Some(dni) = update.dni.as_deref() {
            self.check_min_length(fields::DNI, dni, self.dni_min_length, &mut violations);
        }
        if let Some(first_name) = update.first_name.as_deref() {
            self.check_min_length(fields::FIRST_NAME, first_name, 1, &mut violations);
        }
        if let Some(last_name) = update.last_name.as_deref() {
            self.check_min_length(fields::LAST_NAME, last_name, 1, &mut violations);
        }
        if update.email.is_some() {
            self.check_email(update.email.as_deref(), &mut violations);
        }
        if let Some(roles) = &update.roles {
            for role in roles {
                self.check_min_length("roles", role, 1, &mut violations);
            }
        }

        violations
    }
}

impl RowValidator for DqValidator {
    fn validate(
        &self,
        row_number: usize,
        partial: PartialCandidate,
    ) -> Result<Candidate, Vec<ImportError>> {
        self.check_create(partial)
            .map(|employee| Candidate {
                row_number,
                employee,
            })
            .map_err(|violations| {
                violations
                    .into_iter()
                    .map(|v| v.at_row(row_number))
                    .collect()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_partial() -> PartialCandidate {
        PartialCandidate {
            dni: Some("12345678".to_string()),
            first_name: Some("Ana".to_string()),
            last_name: Some("Lopez".to_string()),
            email: Some("ana@example.com".to_string()),
            tax_status: None,
            status: None,
            hired_at: None,
        }
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email(".ana@example.com"));
        assert!(!is_valid_email("ana..lopez@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_valid_row_gets_defaults() {
        let candidate = DqValidator::default().validate(2, valid_partial()).unwrap();

        assert_eq!(candidate.row_number, 2);
        assert_eq!(candidate.employee.tax_status, TaxStatus::Unknown);
        assert_eq!(candidate.employee.status, EmployeeStatus::Active);
    }

    #[test]
    fn test_every_violation_is_reported() {
        let partial = PartialCandidate {
            dni: Some(String::new()),
            email: Some("bad".to_string()),
            tax_status: Some("foo".to_string()),
            ..valid_partial()
        };

        let errors = DqValidator::default().validate(5, partial).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();

        assert_eq!(fields, vec!["dni", "email", "taxStatus"]);
        assert!(errors.iter().all(|e| e.row_number == 5));
        assert_eq!(
            errors[0].message,
            "String must contain at least 6 character(s)"
        );
        assert_eq!(errors[1].message, "Invalid email");
        assert_eq!(
            errors[2].message,
            "Invalid enum value. Expected 'registered' | 'withholding' | 'exempt' | 'unknown', received 'foo'"
        );
    }

    #[test]
    fn test_missing_field_is_required() {
        let partial = PartialCandidate {
            last_name: None,
            ..valid_partial()
        };

        let violations = DqValidator::default().check_create(partial).unwrap_err();
        assert_eq!(violations, vec![FieldViolation::new("lastName", "Required")]);
    }

    #[test]
    fn test_configured_dni_min_length() {
        let partial = PartialCandidate {
            dni: Some("1234".to_string()),
            ..valid_partial()
        };

        assert!(DqValidator::new(4).check_create(partial.clone()).is_ok());
        assert!(DqValidator::new(6).check_create(partial).is_err());
    }

    #[test]
    fn test_check_update_only_present_fields() {
        let validator = DqValidator::default();
        assert!(validator.check_update(&EmployeeUpdate::default()).is_empty());

        let update = EmployeeUpdate {
            email: Some("nope".to_string()),
            roles: Some(vec!["admin".to_string(), String::new()]),
            ..Default::default()
        };
        let fields: Vec<String> = validator
            .check_update(&update)
            .into_iter()
            .map(|v| v.field)
            .collect();

        assert_eq!(fields, vec!["email".to_string(), "roles".to_string()]);
    }
}
