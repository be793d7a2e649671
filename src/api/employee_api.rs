// ==========================================
// 人事后台 - 员工 API
// ==========================================
// 职责: 员工单条创建、查询、更新、角色分配
// 校验: 与 CSV 导入共用同一套 schema 规则
// ==========================================

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::employee::{unique_roles, Employee, EmployeeUpdate};
use crate::domain::employee_import::PartialCandidate;
use crate::importer::DqValidatorImpl;
use crate::repository::EmployeeRepository;

// ==========================================
// CreateEmployeeRequest - 创建请求
// ==========================================
// 枚举字段保留原文，由校验器给出取值范围提示
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    pub dni: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub tax_status: Option<String>,
    pub status: Option<String>,
    pub hired_at: Option<DateTime<Utc>>,
}

impl From<CreateEmployeeRequest> for PartialCandidate {
    fn from(req: CreateEmployeeRequest) -> Self {
        PartialCandidate {
            dni: req.dni,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            tax_status: req.tax_status,
            status: req.status,
            hired_at: req.hired_at,
        }
    }
}

// ==========================================
// EmployeeApi - 员工 API
// ==========================================
pub struct EmployeeApi {
    employee_repo: Arc<EmployeeRepository>,
    validator: Arc<DqValidatorImpl>,
}

impl EmployeeApi {
    /// 创建新的EmployeeApi实例
    ///
    /// # 参数
    /// - employee_repo: 员工仓储
    /// - validator: 员工数据校验器
    pub fn new(employee_repo: Arc<EmployeeRepository>, validator: Arc<DqValidatorImpl>) -> Self {
        Self {
            employee_repo,
            validator,
        }
    }

    /// 创建员工
    ///
    /// # 返回
    /// - Err(ValidationError): 字段校验失败（400）
    /// - Err(Conflict): dni 或 email 已存在（409）
    pub fn create_employee(&self, request: CreateEmployeeRequest) -> ApiResult<Employee> {
        let new_employee = self
            .validator
            .check_create(request.into())
            .map_err(ApiError::validation)?;

        let employee = new_employee.into_employee();
        self.employee_repo.insert(&employee).map_err(|e| {
            warn!(dni = %employee.dni, error = %e, "员工创建失败");
            ApiError::from(e)
        })?;

        info!(id = %employee.id, dni = %employee.dni, "员工已创建");
        Ok(employee)
    }

    /// 列出员工（按创建时间倒序）
    pub fn list_employees(&self) -> ApiResult<Vec<Employee>> {
        let employees = self.employee_repo.list()?;
        debug!(count = employees.len(), "查询员工列表");
        Ok(employees)
    }

    /// 查询单个员工
    pub fn get_employee(&self, id: &str) -> ApiResult<Employee> {
        self.employee_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Employee(id={})不存在", id)))
    }

    /// 部分更新员工
    ///
    /// # 参数
    /// - id: 员工内部 ID
    /// - update: 部分载荷（None 字段不修改；roles 保序去重）
    pub fn update_employee(&self, id: &str, update: EmployeeUpdate) -> ApiResult<Employee> {
        let violations = self.validator.check_update(&update);
        if !violations.is_empty() {
            return Err(ApiError::validation(violations));
        }

        let mut employee = self.get_employee(id)?;
        update.apply_to(&mut employee);
        self.employee_repo.update(&employee)?;

        info!(id = %employee.id, "员工已更新");
        Ok(employee)
    }

    /// 为员工追加角色（已存在则不重复）
    pub fn assign_role(&self, employee_id: &str, role_id: &str) -> ApiResult<Employee> {
        if role_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("角色ID不能为空".to_string()));
        }

        let mut employee = self.get_employee(employee_id)?;
        let mut roles = std::mem::take(&mut employee.roles);
        roles.push(role_id.to_string());
        employee.roles = unique_roles(roles);
        employee.updated_at = Utc::now();
        self.employee_repo.update(&employee)?;

        info!(id = %employee.id, role_id, "员工角色已分配");
        Ok(employee)
    }
}
