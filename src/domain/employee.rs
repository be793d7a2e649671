// ==========================================
// 人事后台 - 员工领域模型
// ==========================================
// 对齐: employee 表
// 约束: dni / email 在库内唯一
// ==========================================

use crate::domain::types::{EmployeeStatus, TaxStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// Employee - 员工主数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    // ===== 主键 =====
    pub id: String, // 内部记录 ID（UUID v4）

    // ===== 身份信息 =====
    pub dni: String,        // 自然 ID（身份证件号），唯一
    pub first_name: String, // 名
    pub last_name: String,  // 姓
    pub email: String,      // 邮箱，唯一

    // ===== 状态 =====
    pub tax_status: TaxStatus,
    pub status: EmployeeStatus,

    // ===== 角色（role id 列表，已去重）=====
    pub roles: Vec<String>,

    // ===== 时间 =====
    pub hired_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// NewEmployee - 创建载荷（已通过创建 schema 校验并补全默认值）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub dni: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub tax_status: TaxStatus,
    #[serde(default)]
    pub status: EmployeeStatus,
    #[serde(default)]
    pub hired_at: Option<DateTime<Utc>>,
}

impl NewEmployee {
    /// 转换为待落库的 Employee
    ///
    /// # 说明
    /// - roles 缺省为空
    /// - hired_at 缺省为当前时间（逐条计算，不保证同批一致）
    pub fn into_employee(self) -> Employee {
        let now = Utc::now();
        Employee {
            id: Uuid::new_v4().to_string(),
            dni: self.dni,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            tax_status: self.tax_status,
            status: self.status,
            roles: Vec::new(),
            hired_at: self.hired_at.unwrap_or(now),
            created_at: now,
            updated_at: now,
        }
    }
}

// ==========================================
// EmployeeUpdate - 部分更新载荷
// ==========================================
// None 表示不修改该字段
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    pub dni: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub tax_status: Option<TaxStatus>,
    pub status: Option<EmployeeStatus>,
    pub hired_at: Option<DateTime<Utc>>,
    pub roles: Option<Vec<String>>,
}

impl EmployeeUpdate {
    /// 将更新应用到已有记录（roles 保序去重）
    pub fn apply_to(self, employee: &mut Employee) {
        if let Some(dni) = self.dni {
            employee.dni = dni;
        }
        if let Some(first_name) = self.first_name {
            employee.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            employee.last_name = last_name;
        }
        if let Some(email) = self.email {
            employee.email = email;
        }
        if let Some(tax_status) = self.tax_status {
            employee.tax_status = tax_status;
        }
        if let Some(status) = self.status {
            employee.status = status;
        }
        if let Some(hired_at) = self.hired_at {
            employee.hired_at = hired_at;
        }
        if let Some(roles) = self.roles {
            employee.roles = unique_roles(roles);
        }
        employee.updated_at = Utc::now();
    }
}

/// 角色列表保序去重
pub fn unique_roles(roles: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    roles
        .into_iter()
        .filter(|role| seen.insert(role.clone()))
        .collect()
}
