// ==========================================
// 人事后台 - 领域类型定义
// ==========================================
// 职责: 员工记录中的枚举字段（纳税状态 / 雇佣状态）
// 序列化格式: 小写（与导入文件、数据库一致）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 纳税状态 (Tax Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaxStatus {
    Registered,  // 已登记
    Withholding, // 代扣代缴
    Exempt,      // 免税
    #[default]
    Unknown,     // 未知（缺省值）
}

impl TaxStatus {
    /// 全部取值（按声明顺序，用于错误提示）
    pub const ALL: [TaxStatus; 4] = [
        TaxStatus::Registered,
        TaxStatus::Withholding,
        TaxStatus::Exempt,
        TaxStatus::Unknown,
    ];

    /// 从小写文本解析（不做大小写转换，调用方负责规范化）
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "registered" => Some(TaxStatus::Registered),
            "withholding" => Some(TaxStatus::Withholding),
            "exempt" => Some(TaxStatus::Exempt),
            "unknown" => Some(TaxStatus::Unknown),
            _ => None,
        }
    }

    /// 转换为数据库存储字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            TaxStatus::Registered => "registered",
            TaxStatus::Withholding => "withholding",
            TaxStatus::Exempt => "exempt",
            TaxStatus::Unknown => "unknown",
        }
    }

    /// 从数据库字符串读取（未知值回落为 Unknown）
    pub fn from_db_str(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }
}

impl fmt::Display for TaxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 雇佣状态 (Employment Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    #[default]
    Active,     // 在职（缺省值）
    Inactive,   // 停用
    Terminated, // 离职
}

impl EmployeeStatus {
    pub const ALL: [EmployeeStatus; 3] = [
        EmployeeStatus::Active,
        EmployeeStatus::Inactive,
        EmployeeStatus::Terminated,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(EmployeeStatus::Active),
            "inactive" => Some(EmployeeStatus::Inactive),
            "terminated" => Some(EmployeeStatus::Terminated),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::Inactive => "inactive",
            EmployeeStatus::Terminated => "terminated",
        }
    }

    pub fn from_db_str(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}
