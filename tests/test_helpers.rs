// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库、种子数据、临时导入文件
// ==========================================

#![allow(dead_code)]

use inventory_hub::db::{init_schema, open_shared_connection};
use inventory_hub::domain::{Dimensions, NewItem, TaxonomyIds};
use inventory_hub::repository::{ItemRepository, TaxonomyRepository, UserRepository};
use rusqlite::Connection;
use std::error::Error;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 导入文件表头（与 EXPECTED_COLUMNS 同序）
pub const CSV_HEADER: &str = "name,description,brand,value,insuranceValue,hsCode,location,length,width,height,weight,quantity,categoryName,familyName,subFamilyName";

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_string_lossy().to_string();

    let conn = Connection::open(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开共享连接
pub fn shared_conn(db_path: &str) -> Arc<Mutex<Connection>> {
    open_shared_connection(db_path).expect("open shared connection")
}

/// 创建用户,返回 id
pub fn seed_user(conn: &Arc<Mutex<Connection>>, email: &str) -> i64 {
    UserRepository::from_connection(conn.clone())
        .create(email, email)
        .expect("create user")
        .id
}

/// 创建一条 category → family → subFamily 链
pub fn seed_chain(
    conn: &Arc<Mutex<Connection>>,
    category: &str,
    family: &str,
    sub_family: &str,
) -> TaxonomyIds {
    let taxonomy = TaxonomyRepository::from_connection(conn.clone());
    let category = taxonomy.create_category(category).expect("create category");
    let family = taxonomy
        .create_family(category.id, family)
        .expect("create family");
    let sub_family = taxonomy
        .create_sub_family(family.id, sub_family)
        .expect("create sub family");

    TaxonomyIds {
        category_id: category.id,
        family_id: family.id,
        sub_family_id: sub_family.id,
    }
}

pub fn new_item(user_id: i64, ids: TaxonomyIds, name: &str, value: f64) -> NewItem {
    NewItem {
        user_id,
        name: name.to_string(),
        description: None,
        brand: "Acme".to_string(),
        hs_code: "8518.10".to_string(),
        location: "Warehouse A".to_string(),
        value,
        insurance_value: value,
        dimensions: Dimensions {
            length: 1.0,
            width: 1.0,
            height: 1.0,
        },
        weight: 1.0,
        quantity: 1,
        category_id: ids.category_id,
        family_id: ids.family_id,
        sub_family_id: ids.sub_family_id,
        image: None,
    }
}

/// 直接写入一件物品
pub fn seed_item(conn: &Arc<Mutex<Connection>>, user_id: i64, ids: TaxonomyIds, name: &str, value: f64) -> i64 {
    ItemRepository::from_connection(conn.clone())
        .create(&new_item(user_id, ids, name, value))
        .expect("create item")
}

/// 一行合法的导入 CSV 数据
pub fn csv_row(name: &str, value: &str, category: &str, family: &str, sub_family: &str) -> String {
    format!(
        "{},,Acme,{},0,8518.10,Warehouse A,1,1,1,0.5,1,{},{},{}",
        name, value, category, family, sub_family
    )
}

/// 写入临时 .csv 文件（首行自动加表头）
pub fn write_import_csv(rows: &[String]) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("create temp csv");
    writeln!(file, "{}", CSV_HEADER).expect("write header");
    for row in rows {
        writeln!(file, "{}", row).expect("write row");
    }
    file.flush().expect("flush csv");
    file
}
