// ==========================================
// 库存资产管理系统 - 工作簿构建器
// ==========================================
// 工作表顺序: Summary → Operations → Operation Items → Packages → Package Items
// 规则: 无数据行的工作表不输出；Summary 始终输出
// ==========================================

use crate::domain::export::{
    ExportOptions, ExportTables, OperationHeaderRow, OperationLineRow, PackageHeaderRow,
    PackageLineRow,
};
use crate::exporter::error::ExportResult;
use crate::exporter::xlsx_writer::{CellValue, XlsxWriter};
use chrono::SecondsFormat;

pub mod sheet_names {
    pub const SUMMARY: &str = "Summary";
    pub const OPERATIONS: &str = "Operations";
    pub const OPERATION_ITEMS: &str = "Operation Items";
    pub const PACKAGES: &str = "Packages";
    pub const PACKAGE_ITEMS: &str = "Package Items";
}

const OPERATION_HEADERS: [&str; 11] = [
    "Operation ID",
    "Name",
    "Description",
    "Year",
    "Location",
    "Active",
    "Start Date",
    "End Date",
    "Item Lines",
    "Package Lines",
    "Total Value",
];

const OPERATION_LINE_HEADERS: [&str; 14] = [
    "Type",
    "Operation ID",
    "Operation",
    "Line ID",
    "Component ID",
    "Component",
    "Brand",
    "HS Code",
    "Category",
    "Family",
    "Sub Family",
    "Quantity",
    "Unit Value",
    "Line Value",
];

const PACKAGE_HEADERS: [&str; 8] = [
    "Package ID",
    "Name",
    "Description",
    "Year",
    "Location",
    "Active",
    "Item Lines",
    "Total Value",
];

const PACKAGE_LINE_HEADERS: [&str; 13] = [
    "Package ID",
    "Package",
    "Line ID",
    "Item ID",
    "Item",
    "Brand",
    "HS Code",
    "Category",
    "Family",
    "Sub Family",
    "Quantity",
    "Unit Value",
    "Line Value",
];

pub struct WorkbookBuilder;

impl WorkbookBuilder {
    /// 纯函数: (平铺行, 选项) → .xlsx 字节
    pub fn build(&self, tables: &ExportTables, options: &ExportOptions) -> ExportResult<Vec<u8>> {
        let mut writer = XlsxWriter::new();

        writer.add_sheet(sheet_names::SUMMARY, summary_rows(tables, options))?;
        if !tables.operations.is_empty() {
            writer.add_sheet(
                sheet_names::OPERATIONS,
                with_header(&OPERATION_HEADERS, tables.operations.iter().map(operation_cells)),
            )?;
        }
        if !tables.operation_lines.is_empty() {
            writer.add_sheet(
                sheet_names::OPERATION_ITEMS,
                with_header(
                    &OPERATION_LINE_HEADERS,
                    tables.operation_lines.iter().map(operation_line_cells),
                ),
            )?;
        }
        if !tables.packages.is_empty() {
            writer.add_sheet(
                sheet_names::PACKAGES,
                with_header(&PACKAGE_HEADERS, tables.packages.iter().map(package_cells)),
            )?;
        }
        if !tables.package_lines.is_empty() {
            writer.add_sheet(
                sheet_names::PACKAGE_ITEMS,
                with_header(
                    &PACKAGE_LINE_HEADERS,
                    tables.package_lines.iter().map(package_line_cells),
                ),
            )?;
        }

        tracing::debug!(sheets = ?writer.sheet_names(), "工作簿组装完成");
        writer.finish()
    }
}

fn with_header<I>(header: &[&str], rows: I) -> Vec<Vec<CellValue>>
where
    I: Iterator<Item = Vec<CellValue>>,
{
    std::iter::once(header.iter().map(|h| CellValue::from(*h)).collect())
        .chain(rows)
        .collect()
}

fn yes_no(flag: bool) -> CellValue {
    CellValue::from(if flag { "Yes" } else { "No" })
}

fn count(n: Option<usize>) -> CellValue {
    n.map(|v| CellValue::Number(v as f64)).unwrap_or(CellValue::Empty)
}

fn summary_rows(tables: &ExportTables, options: &ExportOptions) -> Vec<Vec<CellValue>> {
    let generated_at = options
        .generated_at
        .to_rfc3339_opts(SecondsFormat::Secs, true);
    let metric = |label: &str, value: usize| vec![CellValue::from(label), CellValue::Number(value as f64)];

    vec![
        vec!["Field".into(), "Value".into()],
        vec!["Generated At".into(), generated_at.into()],
        vec!["Include Details".into(), yes_no(options.include_details)],
        metric("Operations", tables.operations.len()),
        metric("Operation Item Lines", tables.operation_item_count()),
        metric("Operation Package Lines", tables.operation_package_count()),
        metric("Packages", tables.packages.len()),
        metric("Package Item Lines", tables.package_lines.len()),
    ]
}

fn operation_cells(row: &OperationHeaderRow) -> Vec<CellValue> {
    vec![
        row.operation_id.into(),
        row.name.clone().into(),
        row.description.clone().into(),
        row.year.map(i64::from).into(),
        row.location.clone().into(),
        yes_no(row.active),
        row.start_date.clone().into(),
        row.end_date.clone().into(),
        count(row.item_lines),
        count(row.package_lines),
        row.total_value.into(),
    ]
}

fn operation_line_cells(row: &OperationLineRow) -> Vec<CellValue> {
    vec![
        row.row_type.as_str().into(),
        row.operation_id.into(),
        row.operation_name.clone().into(),
        row.line_id.into(),
        row.component_id.into(),
        row.component_name.clone().into(),
        row.brand.clone().into(),
        row.hs_code.clone().into(),
        row.category.clone().into(),
        row.family.clone().into(),
        row.sub_family.clone().into(),
        row.quantity.into(),
        row.unit_value.into(),
        row.line_value.into(),
    ]
}

fn package_cells(row: &PackageHeaderRow) -> Vec<CellValue> {
    vec![
        row.package_id.into(),
        row.name.clone().into(),
        row.description.clone().into(),
        row.year.map(i64::from).into(),
        row.location.clone().into(),
        yes_no(row.active),
        count(row.item_lines),
        row.total_value.into(),
    ]
}

fn package_line_cells(row: &PackageLineRow) -> Vec<CellValue> {
    vec![
        row.package_id.into(),
        row.package_name.clone().into(),
        row.line_id.into(),
        row.item_id.into(),
        row.item_name.clone().into(),
        row.brand.clone().into(),
        row.hs_code.clone().into(),
        row.category.clone().into(),
        row.family.clone().into(),
        row.sub_family.clone().into(),
        row.quantity.into(),
        row.unit_value.into(),
        row.line_value.into(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ExportFormat;
    use calamine::{Data, Reader, Xlsx};
    use chrono::{TimeZone, Utc};
    use std::io::Cursor;

    fn options() -> ExportOptions {
        ExportOptions::new(
            ExportFormat::Xlsx,
            true,
            Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap(),
        )
    }

    fn package_row(id: i64) -> PackageHeaderRow {
        PackageHeaderRow {
            package_id: id,
            name: format!("pkg-{}", id),
            description: String::new(),
            year: None,
            location: "Depot".to_string(),
            active: true,
            item_lines: Some(0),
            total_value: Some(0.0),
        }
    }

    fn sheet_names_of(bytes: Vec<u8>) -> Vec<String> {
        Xlsx::new(Cursor::new(bytes)).unwrap().sheet_names()
    }

    #[test]
    fn test_packages_only_omits_operation_sheets() {
        let tables = ExportTables {
            packages: vec![package_row(1)],
            ..ExportTables::default()
        };

        let bytes = WorkbookBuilder.build(&tables, &options()).unwrap();

        assert_eq!(sheet_names_of(bytes), vec!["Summary".to_string(), "Packages".to_string()]);
    }

    #[test]
    fn test_empty_tables_still_have_summary() {
        let bytes = WorkbookBuilder.build(&ExportTables::default(), &options()).unwrap();

        let mut workbook = Xlsx::new(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Summary".to_string()]);
        let summary = workbook.worksheet_range("Summary").unwrap();
        assert_eq!(
            summary.get_value((1, 1)),
            Some(&Data::String("2026-05-01T08:00:00Z".to_string()))
        );
        assert_eq!(summary.get_value((2, 1)), Some(&Data::String("Yes".to_string())));
    }

    #[test]
    fn test_packages_sheet_cells() {
        let tables = ExportTables {
            packages: vec![package_row(7)],
            ..ExportTables::default()
        };

        let bytes = WorkbookBuilder.build(&tables, &options()).unwrap();

        let mut workbook = Xlsx::new(Cursor::new(bytes)).unwrap();
        let sheet = workbook.worksheet_range("Packages").unwrap();
        assert_eq!(sheet.get_value((0, 0)), Some(&Data::String("Package ID".to_string())));
        assert_eq!(sheet.get_value((1, 0)), Some(&Data::Float(7.0)));
        assert_eq!(sheet.get_value((1, 1)), Some(&Data::String("pkg-7".to_string())));
    }
}
