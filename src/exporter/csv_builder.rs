// ==========================================
// 库存资产管理系统 - CSV 构建器
// ==========================================
// 输出: 单表 CSV,以 Type 列区分行含义
// 行顺序: METADATA → OPERATION → OPERATION_ITEM → OPERATION_PACKAGE
//         → PACKAGE → PACKAGE_ITEM
// ==========================================

use crate::domain::export::{ExportOptions, ExportTables};
use crate::domain::types::ExportRowType;
use crate::exporter::error::{ExportError, ExportResult};
use chrono::SecondsFormat;
use serde::Serialize;

/// 统一列结构（未使用的列留空）
#[derive(Debug, Default, Serialize)]
struct CsvRecord {
    #[serde(rename = "Type")]
    row_type: &'static str,
    #[serde(rename = "Generated At")]
    generated_at: String,
    #[serde(rename = "Include Details")]
    include_details: String,
    #[serde(rename = "Operation ID")]
    operation_id: Option<i64>,
    #[serde(rename = "Operation Name")]
    operation_name: String,
    #[serde(rename = "Package ID")]
    package_id: Option<i64>,
    #[serde(rename = "Package Name")]
    package_name: String,
    #[serde(rename = "Line ID")]
    line_id: Option<i64>,
    #[serde(rename = "Component ID")]
    component_id: Option<i64>,
    #[serde(rename = "Component Name")]
    component_name: String,
    #[serde(rename = "Brand")]
    brand: String,
    #[serde(rename = "HS Code")]
    hs_code: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Family")]
    family: String,
    #[serde(rename = "Sub Family")]
    sub_family: String,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Year")]
    year: Option<i32>,
    #[serde(rename = "Location")]
    location: String,
    #[serde(rename = "Active")]
    active: String,
    #[serde(rename = "Start Date")]
    start_date: String,
    #[serde(rename = "End Date")]
    end_date: String,
    #[serde(rename = "Quantity")]
    quantity: Option<i64>,
    #[serde(rename = "Unit Value")]
    unit_value: Option<f64>,
    #[serde(rename = "Line Value")]
    line_value: Option<f64>,
    #[serde(rename = "Item Lines")]
    item_lines: Option<usize>,
    #[serde(rename = "Package Lines")]
    package_lines: Option<usize>,
    #[serde(rename = "Total Value")]
    total_value: Option<f64>,
}

fn yes_no(flag: bool) -> String {
    let text = if flag { "Yes" } else { "No" };
    text.to_string()
}

pub struct CsvBuilder;

impl CsvBuilder {
    /// 纯函数: (平铺行, 选项) → UTF-8 CSV 字节
    pub fn build(&self, tables: &ExportTables, options: &ExportOptions) -> ExportResult<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for record in records(tables, options) {
            writer.serialize(record)?;
        }
        writer
            .into_inner()
            .map_err(|e| ExportError::CsvGeneration(e.to_string()))
    }
}

fn records(tables: &ExportTables, options: &ExportOptions) -> Vec<CsvRecord> {
    let mut out = Vec::with_capacity(
        1 + tables.operations.len()
            + tables.operation_lines.len()
            + tables.packages.len()
            + tables.package_lines.len(),
    );

    out.push(CsvRecord {
        row_type: ExportRowType::Metadata.as_str(),
        generated_at: options.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        include_details: yes_no(options.include_details),
        ..CsvRecord::default()
    });

    out.extend(tables.operations.iter().map(|row| CsvRecord {
        row_type: ExportRowType::Operation.as_str(),
        operation_id: Some(row.operation_id),
        operation_name: row.name.clone(),
        description: row.description.clone(),
        year: row.year,
        location: row.location.clone(),
        active: yes_no(row.active),
        start_date: row.start_date.clone(),
        end_date: row.end_date.clone(),
        item_lines: row.item_lines,
        package_lines: row.package_lines,
        total_value: row.total_value,
        ..CsvRecord::default()
    }));

    // 物品明细在前,包裹明细在后
    for wanted in [ExportRowType::OperationItem, ExportRowType::OperationPackage] {
        out.extend(
            tables
                .operation_lines
                .iter()
                .filter(|row| row.row_type == wanted)
                .map(|row| {
                    let is_package = wanted == ExportRowType::OperationPackage;
                    CsvRecord {
                        row_type: wanted.as_str(),
                        operation_id: Some(row.operation_id),
                        operation_name: row.operation_name.clone(),
                        package_id: if is_package { row.component_id } else { None },
                        package_name: if is_package {
                            row.component_name.clone()
                        } else {
                            String::new()
                        },
                        line_id: Some(row.line_id),
                        component_id: row.component_id,
                        component_name: row.component_name.clone(),
                        brand: row.brand.clone(),
                        hs_code: row.hs_code.clone(),
                        category: row.category.clone(),
                        family: row.family.clone(),
                        sub_family: row.sub_family.clone(),
                        quantity: Some(row.quantity),
                        unit_value: Some(row.unit_value),
                        line_value: Some(row.line_value),
                        ..CsvRecord::default()
                    }
                }),
        );
    }

    out.extend(tables.packages.iter().map(|row| CsvRecord {
        row_type: ExportRowType::Package.as_str(),
        package_id: Some(row.package_id),
        package_name: row.name.clone(),
        description: row.description.clone(),
        year: row.year,
        location: row.location.clone(),
        active: yes_no(row.active),
        item_lines: row.item_lines,
        total_value: row.total_value,
        ..CsvRecord::default()
    }));

    out.extend(tables.package_lines.iter().map(|row| CsvRecord {
        row_type: ExportRowType::PackageItem.as_str(),
        package_id: Some(row.package_id),
        package_name: row.package_name.clone(),
        line_id: Some(row.line_id),
        component_id: row.item_id,
        component_name: row.item_name.clone(),
        brand: row.brand.clone(),
        hs_code: row.hs_code.clone(),
        category: row.category.clone(),
        family: row.family.clone(),
        sub_family: row.sub_family.clone(),
        quantity: Some(row.quantity),
        unit_value: Some(row.unit_value),
        line_value: Some(row.line_value),
        ..CsvRecord::default()
    }));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::export::{OperationHeaderRow, OperationLineRow, PackageHeaderRow};
    use crate::domain::types::ExportFormat;
    use chrono::{TimeZone, Utc};

    fn options() -> ExportOptions {
        ExportOptions::new(
            ExportFormat::Csv,
            true,
            Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap(),
        )
    }

    fn line(row_type: ExportRowType, line_id: i64) -> OperationLineRow {
        OperationLineRow {
            row_type,
            operation_id: 1,
            operation_name: "Expo, Hall \"B\"".to_string(),
            line_id,
            component_id: Some(line_id * 10),
            component_name: format!("component-{}", line_id),
            brand: String::new(),
            hs_code: String::new(),
            category: String::new(),
            family: String::new(),
            sub_family: String::new(),
            quantity: 2,
            unit_value: 5.0,
            line_value: 10.0,
        }
    }

    fn sample_tables() -> ExportTables {
        ExportTables {
            operations: vec![OperationHeaderRow {
                operation_id: 1,
                name: "Expo, Hall \"B\"".to_string(),
                description: String::new(),
                year: Some(2026),
                location: "Lyon".to_string(),
                active: true,
                start_date: "2026-06-01".to_string(),
                end_date: String::new(),
                item_lines: Some(1),
                package_lines: Some(1),
                total_value: Some(20.0),
            }],
            // 刻意乱序,构建器负责排序
            operation_lines: vec![
                line(ExportRowType::OperationPackage, 2),
                line(ExportRowType::OperationItem, 1),
            ],
            packages: vec![PackageHeaderRow {
                package_id: 20,
                name: "Kit".to_string(),
                description: String::new(),
                year: None,
                location: String::new(),
                active: false,
                item_lines: None,
                total_value: None,
            }],
            package_lines: Vec::new(),
        }
    }

    fn parse(bytes: &[u8]) -> (csv::StringRecord, Vec<csv::StringRecord>) {
        let mut reader = csv::Reader::from_reader(bytes);
        let headers = reader.headers().unwrap().clone();
        let rows = reader.records().collect::<Result<Vec<_>, _>>().unwrap();
        (headers, rows)
    }

    #[test]
    fn test_row_order_follows_type_sequence() {
        let bytes = CsvBuilder.build(&sample_tables(), &options()).unwrap();
        let (headers, rows) = parse(&bytes);

        assert_eq!(&headers[0], "Type");
        let types: Vec<&str> = rows.iter().map(|r| r.get(0).unwrap()).collect();
        assert_eq!(
            types,
            vec!["METADATA", "OPERATION", "OPERATION_ITEM", "OPERATION_PACKAGE", "PACKAGE"]
        );
        assert_eq!(rows[0].get(1), Some("2026-05-01T08:00:00Z"));
    }

    #[test]
    fn test_values_with_commas_and_quotes_round_trip() {
        let bytes = CsvBuilder.build(&sample_tables(), &options()).unwrap();
        let (headers, rows) = parse(&bytes);

        let name_col = headers.iter().position(|h| h == "Operation Name").unwrap();
        assert_eq!(rows[1].get(name_col), Some("Expo, Hall \"B\""));
    }

    #[test]
    fn test_package_without_details_leaves_totals_blank() {
        let bytes = CsvBuilder.build(&sample_tables(), &options()).unwrap();
        let (headers, rows) = parse(&bytes);

        let total_col = headers.iter().position(|h| h == "Total Value").unwrap();
        let package_row = rows.iter().find(|r| r.get(0) == Some("PACKAGE")).unwrap();
        assert_eq!(package_row.get(total_col), Some(""));
    }

    #[test]
    fn test_output_is_deterministic() {
        let first = CsvBuilder.build(&sample_tables(), &options()).unwrap();
        let second = CsvBuilder.build(&sample_tables(), &options()).unwrap();
        assert_eq!(first, second);
    }
}
