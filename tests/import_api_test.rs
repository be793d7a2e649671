// ==========================================
// 导入 API 测试
// ==========================================
// 覆盖: 201 / 207 / 400 状态映射、模板、配置驱动的 dni 长度
// ==========================================

use hr_backoffice::api::{ApiError, ImportApi, ImportStatus};
use hr_backoffice::config::ConfigManager;

mod test_helpers;
use test_helpers::{create_test_db, csv_with_rows, seed_employee};

#[tokio::test]
async fn test_clean_import_is_created() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let import_api = ImportApi::new(db_path.clone());

    let csv = csv_with_rows(&["12345678,Ana,Lopez,ana@example.com,registered,active,2024-03-01"]);
    let response = import_api.import_employees(csv.as_bytes()).await.unwrap();

    assert_eq!(response.status, ImportStatus::Created);
    assert_eq!(response.status.status_code(), 201);
    assert_eq!(response.result.created_count, 1);
}

#[tokio::test]
async fn test_partial_import_is_multi_status() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    seed_employee(&db_path, "99999999", "seed@example.com").unwrap();
    let import_api = ImportApi::new(db_path.clone());

    let csv = csv_with_rows(&[
        "12345678,Ana,Lopez,ana@example.com,,,",
        "99999999,Luis,Martinez,luis@example.com,,,",
    ]);
    let response = import_api.import_employees(csv.as_bytes()).await.unwrap();

    assert_eq!(response.status, ImportStatus::MultiStatus);
    assert_eq!(response.status.status_code(), 207);
    assert_eq!(response.result.created_count, 1);
    assert_eq!(response.result.failed_count, 1);

    let json = serde_json::to_value(&response.result).unwrap();
    assert_eq!(json["totalRows"], 2);
    assert_eq!(json["errors"][0]["rowNumber"], 3);
    assert_eq!(json["errors"][0]["field"], "dni");
}

#[tokio::test]
async fn test_invalid_file_maps_to_bad_request() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let import_api = ImportApi::new(db_path);

    let err = import_api.import_employees(b"name,age\nx,1\n").await.unwrap_err();

    assert!(matches!(err, ApiError::InvalidImportFile(_)));
    assert_eq!(err.status_code(), 400);
    assert!(err
        .to_string()
        .starts_with("CSV is missing required columns: dni, firstName, lastName, email"));
}

#[tokio::test]
async fn test_import_into_uninitialized_database() {
    let temp_file = tempfile::NamedTempFile::new().unwrap();
    let db_path = temp_file.path().to_str().unwrap().to_string();
    let import_api = ImportApi::new(db_path);

    let csv = csv_with_rows(&["12345678,Ana,Lopez,ana@example.com,,,"]);
    let response = import_api.import_employees(csv.as_bytes()).await.unwrap();

    assert_eq!(response.status, ImportStatus::Created);
    assert_eq!(response.result.created_count, 1);
}

#[tokio::test]
async fn test_dni_min_length_from_config() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    ConfigManager::new(&db_path)
        .unwrap()
        .set_global_config_value("import.dni_min_length", "4")
        .unwrap();
    let import_api = ImportApi::new(db_path);

    let csv = csv_with_rows(&["1234,Ana,Lopez,ana@example.com,,,"]);
    let response = import_api.import_employees(csv.as_bytes()).await.unwrap();

    assert_eq!(response.status, ImportStatus::Created);
}

#[test]
fn test_get_import_template() {
    let import_api = ImportApi::new(String::from(":memory:"));

    assert_eq!(
        import_api.get_import_template(),
        "dni,firstName,lastName,email,taxStatus,status,hiredAt\n\
         20456789,Sofia,Perez,sofia.perez@example.com,registered,active,2024-03-01\n"
    );
}
