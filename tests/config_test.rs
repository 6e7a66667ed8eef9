// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 默认值、无效值回退、快照恢复
// ==========================================

mod test_helpers;

use inventory_hub::config::{
    config_keys, ConfigManager, ExportConfigReader, ImportConfigReader, DEFAULT_BATCH_SIZE,
    DEFAULT_LOCALE,
};
use test_helpers::create_test_db;

#[tokio::test]
async fn test_config_manager_creation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    let config_manager = ConfigManager::new(&db_path);
    assert!(
        config_manager.is_ok(),
        "ConfigManager should be created successfully"
    );
}

#[tokio::test]
async fn test_defaults_when_keys_missing() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config = ConfigManager::new(&db_path).unwrap();

    assert_eq!(config.get_batch_size().await.unwrap(), DEFAULT_BATCH_SIZE);
    assert!(config.get_default_include_details().await.unwrap());
    assert_eq!(config.get_file_prefix().await.unwrap(), "inventory-export");
    assert_eq!(config.get_locale().unwrap(), DEFAULT_LOCALE);
}

#[tokio::test]
async fn test_batch_size_falls_back_on_invalid_values() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config = ConfigManager::new(&db_path).unwrap();

    config.set_config_value(config_keys::IMPORT_BATCH_SIZE, "25").unwrap();
    assert_eq!(config.get_batch_size().await.unwrap(), 25);

    config.set_config_value(config_keys::IMPORT_BATCH_SIZE, "0").unwrap();
    assert_eq!(config.get_batch_size().await.unwrap(), DEFAULT_BATCH_SIZE);

    config.set_config_value(config_keys::IMPORT_BATCH_SIZE, "lots").unwrap();
    assert_eq!(config.get_batch_size().await.unwrap(), DEFAULT_BATCH_SIZE);
}

#[tokio::test]
async fn test_export_settings() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config = ConfigManager::new(&db_path).unwrap();

    config.set_config_value(config_keys::EXPORT_INCLUDE_DETAILS, "No").unwrap();
    config.set_config_value(config_keys::EXPORT_FILE_PREFIX, " stock ").unwrap();

    assert!(!config.get_default_include_details().await.unwrap());
    assert_eq!(config.get_file_prefix().await.unwrap(), "stock");
}

#[tokio::test]
async fn test_snapshot_round_trip() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let source = ConfigManager::new(&db_path).unwrap();
    source.set_config_value(config_keys::IMPORT_BATCH_SIZE, "7").unwrap();
    source.set_config_value(config_keys::APP_LOCALE, "en").unwrap();
    let snapshot = source.get_config_snapshot().unwrap();

    let (_other_file, other_path) = create_test_db().unwrap();
    let target = ConfigManager::new(&other_path).unwrap();
    let with_meta = snapshot.replacen('{', "{\"__meta_taken_by\":\"test\",", 1);
    let restored = target.restore_config_from_snapshot(&with_meta).unwrap();

    assert_eq!(restored, 2);
    assert_eq!(target.get_batch_size().await.unwrap(), 7);
    assert_eq!(target.get_locale().unwrap(), "en");
    assert_eq!(target.get_global_config_value("__meta_taken_by").unwrap(), None);
}
