// ==========================================
// API 层集成测试
// ==========================================
// 测试目标: AppState 装配 → ImportApi / ExportApi
// ==========================================

mod test_helpers;

use inventory_hub::api::ApiError;
use inventory_hub::app::{AppState, FixedUser};
use inventory_hub::exporter::DirectorySink;
use inventory_hub::ExportFormat;
use std::sync::Arc;
use test_helpers::*;

#[tokio::test]
async fn test_template_then_import_through_api() {
    let (_db_file, db_path) = create_test_db().unwrap();
    let state = AppState::new(db_path, Arc::new(FixedUser(1))).unwrap();
    let user_id = seed_user(&state.conn, "owner@example.com");
    assert_eq!(state.require_user().unwrap(), user_id);
    seed_chain(&state.conn, "Audio", "Microphones", "Wireless");

    // 模板自带的示例行可直接导入
    let out = tempfile::tempdir().unwrap();
    let saved = state
        .export_api
        .download_template(ExportFormat::Csv, &DirectorySink::new(out.path()))
        .await
        .unwrap();
    assert_eq!(saved.file_name, "inventory-import-template.csv");

    let response = state
        .import_api
        .import_items(user_id, &saved.location)
        .await
        .unwrap();

    assert_eq!(response.total_rows, 1);
    assert_eq!(response.imported, 1);
    assert_eq!(response.failed, 0);
    assert_eq!(response.invalid_rows, 0);
    assert!(!response.import_id.is_empty());
}

#[tokio::test]
async fn test_upload_with_unknown_extension_is_invalid_input() {
    let (_db_file, db_path) = create_test_db().unwrap();
    let state = AppState::new(db_path, Arc::new(FixedUser(1))).unwrap();

    let result = state.import_api.import_upload(1, b"name\n", "ods").await;

    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

#[tokio::test]
async fn test_missing_file_is_import_error() {
    let (_db_file, db_path) = create_test_db().unwrap();
    let state = AppState::new(db_path, Arc::new(FixedUser(1))).unwrap();

    let result = state.import_api.import_items(1, "/no/such/file.xlsx").await;

    match result {
        Err(ApiError::ImportError(msg)) => assert!(msg.contains("/no/such/file.xlsx")),
        other => panic!("expected ImportError, got {:?}", other.map(|r| r.import_id)),
    }
}

#[tokio::test]
async fn test_validation_errors_are_reported_by_row() {
    let (_db_file, db_path) = create_test_db().unwrap();
    let state = AppState::new(db_path, Arc::new(FixedUser(1))).unwrap();
    let user_id = seed_user(&state.conn, "owner@example.com");
    seed_chain(&state.conn, "Audio", "Microphones", "Wireless");

    let csv = write_import_csv(&[
        csv_row("Good", "1", "Audio", "Microphones", "Wireless"),
        csv_row("Bad", "abc", "Audio", "Microphones", "Wireless"),
    ]);
    let path = csv.path().to_string_lossy().to_string();

    let response = state.import_api.import_items(user_id, &path).await.unwrap();

    assert_eq!(response.imported, 1);
    assert_eq!(response.invalid_rows, 1);
    let row_two = &response.validation_errors[&2];
    assert_eq!(row_two.len(), 1);
    assert_eq!(row_two[0].path, "value");
}

#[tokio::test]
async fn test_missing_columns_is_invalid_input() {
    let (_db_file, db_path) = create_test_db().unwrap();
    let state = AppState::new(db_path, Arc::new(FixedUser(1))).unwrap();
    let user_id = seed_user(&state.conn, "owner@example.com");

    let csv = b"name,brand,insurance_value\nMic,Acme,10\n";
    let result = state.import_api.import_upload(user_id, csv, "csv").await;

    match result {
        Err(ApiError::InvalidInput(msg)) => assert!(msg.contains("insuranceValue")),
        other => panic!("expected InvalidInput, got {:?}", other.map(|r| r.import_id)),
    }
}
