// ==========================================
// 导入管道集成测试
// ==========================================
// 测试目标: 文件 → 校验 → 分类解析 → 逐行落库（SQLite）
// ==========================================

mod test_helpers;

use inventory_hub::config::{config_keys, ConfigManager};
use inventory_hub::domain::FailureStage;
use inventory_hub::importer::{ImportError, ItemImporter, ItemImporterImpl};
use inventory_hub::logging;
use inventory_hub::repository::{ItemRepository, TaxonomyRepository};
use std::path::Path;
use std::sync::{Arc, Mutex};
use test_helpers::*;

type SqliteImporter = ItemImporterImpl<ItemRepository, TaxonomyRepository, ConfigManager>;

fn create_importer(conn: &Arc<Mutex<rusqlite::Connection>>) -> SqliteImporter {
    ItemImporterImpl::new(
        ItemRepository::from_connection(conn.clone()),
        TaxonomyRepository::from_connection(conn.clone()),
        ConfigManager::from_connection(conn.clone()).expect("config manager"),
    )
}

#[tokio::test]
async fn test_mixed_file_reports_every_stage() {
    logging::init_test();
    let (_db_file, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    let user_id = seed_user(&conn, "owner@example.com");
    seed_chain(&conn, "Audio", "Microphones", "Wireless");

    let csv = write_import_csv(&[
        csv_row("Mic A", "120", "Audio", "Microphones", "Wireless"),
        csv_row("Broken", "-5", "Audio", "Microphones", "Wireless"),
        csv_row("Lamp", "30", "Lighting", "Spots", "LED"),
    ]);

    let report = create_importer(&conn)
        .import_file(user_id, csv.path())
        .await
        .unwrap();

    assert_eq!(report.total_rows, 3);
    assert_eq!(report.valid_rows, 2);
    assert_eq!(report.validation_errors.keys().copied().collect::<Vec<_>>(), vec![2]);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.failures[0].name, "Lamp");
    assert_eq!(report.failures[0].stage, FailureStage::Resolution);
    // 与校验错误同一编号: 文件第 3 行
    assert_eq!(report.failures[0].row_number, 3);

    let items = ItemRepository::from_connection(conn.clone())
        .list_by_owner(user_id)
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Mic A");
    assert_eq!(items[0].value, 120.0);
}

#[tokio::test]
async fn test_batch_size_comes_from_config() {
    let (_db_file, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    let user_id = seed_user(&conn, "owner@example.com");
    seed_chain(&conn, "Audio", "Microphones", "Wireless");
    ConfigManager::from_connection(conn.clone())
        .unwrap()
        .set_config_value(config_keys::IMPORT_BATCH_SIZE, "10")
        .unwrap();

    let rows: Vec<String> = (1..=23)
        .map(|n| csv_row(&format!("Item {}", n), "1", "Audio", "Microphones", "Wireless"))
        .collect();
    let csv = write_import_csv(&rows);

    let report = create_importer(&conn)
        .import_file(user_id, csv.path())
        .await
        .unwrap();

    assert_eq!(report.batches, 3);
    assert_eq!(report.succeeded + report.failed, 23);
    assert_eq!(report.succeeded, 23);

    // 顺序与文件一致
    let names: Vec<String> = ItemRepository::from_connection(conn.clone())
        .list_by_owner(user_id)
        .unwrap()
        .into_iter()
        .map(|item| item.name)
        .collect();
    assert_eq!(names.first().map(String::as_str), Some("Item 1"));
    assert_eq!(names.last().map(String::as_str), Some("Item 23"));
}

#[tokio::test]
async fn test_same_family_name_under_two_categories() {
    let (_db_file, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    let user_id = seed_user(&conn, "owner@example.com");
    let in_a = seed_chain(&conn, "Category A", "Family X", "Sub S");
    let in_b = seed_chain(&conn, "Category B", "Family X", "Sub S");

    let csv = write_import_csv(&[
        csv_row("From A", "1", "Category A", "Family X", "Sub S"),
        csv_row("From B", "1", "Category B", "Family X", "Sub S"),
    ]);

    let report = create_importer(&conn)
        .import_file(user_id, csv.path())
        .await
        .unwrap();
    assert_eq!(report.succeeded, 2);

    let items = ItemRepository::from_connection(conn.clone())
        .list_by_owner(user_id)
        .unwrap();
    assert_eq!(items[0].family_id, in_a.family_id);
    assert_eq!(items[0].sub_family_id, in_a.sub_family_id);
    assert_eq!(items[1].family_id, in_b.family_id);
    assert_eq!(items[1].sub_family_id, in_b.sub_family_id);
}

#[tokio::test]
async fn test_imported_items_are_owned_by_importing_user() {
    let (_db_file, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    let owner = seed_user(&conn, "owner@example.com");
    let other = seed_user(&conn, "other@example.com");
    seed_chain(&conn, "Audio", "Microphones", "Wireless");

    let csv = write_import_csv(&[csv_row("Mic", "10", "Audio", "Microphones", "Wireless")]);
    create_importer(&conn)
        .import_file(owner, csv.path())
        .await
        .unwrap();

    let items = ItemRepository::from_connection(conn.clone());
    assert_eq!(items.count_by_owner(owner).unwrap(), 1);
    assert_eq!(items.count_by_owner(other).unwrap(), 0);
}

#[tokio::test]
async fn test_misnamed_column_rejects_whole_file() {
    let (_db_file, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    let user_id = seed_user(&conn, "owner@example.com");
    seed_chain(&conn, "Audio", "Microphones", "Wireless");

    let csv = "name,description,brand,Value,insuranceValue,hsCode,location,length,width,height,weight,quantity,categoryName,familyName,subFamilyName\n\
Mic,,Acme,500,0,8518,Shelf A,0,0,0,0,1,Audio,Microphones,Wireless\n";

    let result = create_importer(&conn)
        .import_bytes(user_id, csv.as_bytes(), "csv")
        .await;

    match result {
        Err(ImportError::MissingColumns(columns)) => assert_eq!(columns, vec!["value".to_string()]),
        other => panic!("expected MissingColumns, got {:?}", other.map(|r| r.succeeded)),
    }
    assert_eq!(
        ItemRepository::from_connection(conn.clone())
            .count_by_owner(user_id)
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn test_missing_file_is_fatal() {
    let (_db_file, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    let user_id = seed_user(&conn, "owner@example.com");

    let result = create_importer(&conn)
        .import_file(user_id, Path::new("/definitely/not/here.csv"))
        .await;

    assert!(matches!(result, Err(ImportError::FileNotFound(_))));
}

#[tokio::test]
async fn test_unsupported_extension_is_fatal() {
    let (_db_file, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    let user_id = seed_user(&conn, "owner@example.com");

    let result = create_importer(&conn)
        .import_bytes(user_id, b"name\nMic\n", "txt")
        .await;

    assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    assert_eq!(
        ItemRepository::from_connection(conn.clone())
            .count_by_owner(user_id)
            .unwrap(),
        0
    );
}
