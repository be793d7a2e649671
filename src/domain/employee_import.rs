// ==========================================
// 人事后台 - 员工导入领域模型
// ==========================================
// 用途: 导入管道中间产物与输出结构
// 生命周期: ImportRow / PartialCandidate / Candidate 仅在单次导入内存在
// ==========================================

use crate::domain::employee::NewEmployee;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// 字段名（与导入文件列名、错误中的 field 一致）
// ==========================================
pub mod fields {
    pub const DNI: &str = "dni";
    pub const FIRST_NAME: &str = "firstName";
    pub const LAST_NAME: &str = "lastName";
    pub const EMAIL: &str = "email";
    pub const TAX_STATUS: &str = "taxStatus";
    pub const STATUS: &str = "status";
    pub const HIRED_AT: &str = "hiredAt";
}

// ==========================================
// ImportRow - 解析后的原始行
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    pub row_number: usize, // 行号（表头为第 1 行）
    pub values: HashMap<String, String>, // 列名 → 原始文本
}

impl ImportRow {
    /// 按列名取值（缺列视为空串）
    pub fn get(&self, column: &str) -> &str {
        self.values.get(column).map(String::as_str).unwrap_or("")
    }
}

// ==========================================
// PartialCandidate - 规范化后的候选（未校验）
// ==========================================
// 枚举字段保留小写原文，由校验器判定取值范围
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialCandidate {
    pub dni: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub tax_status: Option<String>,
    pub status: Option<String>,
    pub hired_at: Option<DateTime<Utc>>,
}

// ==========================================
// Candidate - 通过字段校验的行
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub row_number: usize,
    pub employee: NewEmployee,
}

/// 唯一键选择（用于重复检测 / 冲突检测）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey {
    Dni,
    Email,
}

impl UniqueKey {
    /// 错误中使用的字段名
    pub fn field(&self) -> &'static str {
        match self {
            UniqueKey::Dni => fields::DNI,
            UniqueKey::Email => fields::EMAIL,
        }
    }

    /// 取候选的键值
    pub fn value_of<'a>(&self, candidate: &'a Candidate) -> &'a str {
        match self {
            UniqueKey::Dni => &candidate.employee.dni,
            UniqueKey::Email => &candidate.employee.email,
        }
    }
}

// ==========================================
// ImportError - 行级错误
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportError {
    pub row_number: usize,
    pub field: String,
    pub message: String,
}

impl ImportError {
    pub fn new(row_number: usize, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            row_number,
            field: field.into(),
            message: message.into(),
        }
    }
}

// ==========================================
// ImportResult - 导入汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub total_rows: usize,      // 数据行数（不含表头）
    pub created_count: usize,   // 实际落库数
    pub failed_count: usize,    // total_rows - created_count
    pub errors: Vec<ImportError>, // 按 (行号, 字段) 排序
}

impl ImportResult {
    /// 是否存在行级错误
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// 库内已存在员工的唯一键
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingEmployeeKey {
    pub dni: String,
    pub email: String,
}
