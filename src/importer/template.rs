// ==========================================
// 人事后台 - 员工导入模板
// ==========================================
// 列顺序固定: dni, firstName, lastName, email, taxStatus, status, hiredAt
// ==========================================

use crate::domain::employee_import::fields;

/// 导入文件必需列（同时决定模板列顺序）
pub const EMPLOYEE_IMPORT_HEADERS: [&str; 7] = [
    fields::DNI,
    fields::FIRST_NAME,
    fields::LAST_NAME,
    fields::EMAIL,
    fields::TAX_STATUS,
    fields::STATUS,
    fields::HIRED_AT,
];

/// 模板示例行
const EXAMPLE_ROW: &str = "20456789,Sofia,Perez,sofia.perez@example.com,registered,active,2024-03-01";

/// 生成导入模板（表头 + 示例行，以换行结尾）
pub fn import_template() -> String {
    format!("{}\n{}\n", EMPLOYEE_IMPORT_HEADERS.join(","), EXAMPLE_ROW)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_layout() {
        let template = import_template();
        let lines: Vec<&str> = template.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "dni,firstName,lastName,email,taxStatus,status,hiredAt"
        );
        assert_eq!(lines[1].split(',').count(), EMPLOYEE_IMPORT_HEADERS.len());
        assert!(template.ends_with('\n'));
    }
}
