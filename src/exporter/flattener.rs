// ==========================================
// 库存资产管理系统 - 行平铺器
// ==========================================
// 阶段 2: FetchedSelection → ExportTables（纯函数）
// 规则:
// - 每条明细一行,携带所属表头的 id/名称
// - 行动内物品行在前、包裹行在后,各自保持原顺序
// - 引用已删除时组件列留空、价值按 0 计
// ==========================================

use crate::domain::export::{
    ExportTables, FetchedSelection, OperationHeaderRow, OperationLineRow, OperationRecord,
    PackageHeaderRow, PackageLineRow, PackageRecord,
};
use crate::domain::item::ItemSummary;
use crate::domain::operation::{Operation, OperationWithLines};
use crate::domain::package::PackageWithItems;
use crate::domain::types::ExportRowType;
use chrono::NaiveDate;

pub struct RowFlattener;

impl RowFlattener {
    pub fn flatten(&self, fetched: &FetchedSelection) -> ExportTables {
        let mut tables = ExportTables::default();

        for record in &fetched.operations {
            tables.operations.push(operation_header(record));
            if let OperationRecord::Detailed(detailed) = record {
                tables.operation_lines.extend(operation_lines(detailed));
            }
        }

        for record in &fetched.packages {
            tables.packages.push(package_header(record));
            if let PackageRecord::Detailed(detailed) = record {
                tables.package_lines.extend(package_lines(detailed));
            }
        }

        tables
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn operation_header(record: &OperationRecord) -> OperationHeaderRow {
    let operation: &Operation = record.operation();
    let (item_lines, package_lines, total_value) = match record {
        OperationRecord::Header(_) => (None, None, None),
        OperationRecord::Detailed(detailed) => (
            Some(detailed.items.len()),
            Some(detailed.packages.len()),
            Some(detailed.total_value()),
        ),
    };

    OperationHeaderRow {
        operation_id: operation.id,
        name: operation.name.clone(),
        description: operation.description.clone().unwrap_or_default(),
        year: operation.year,
        location: operation.location.clone().unwrap_or_default(),
        active: operation.active,
        start_date: format_date(operation.start_date),
        end_date: format_date(operation.end_date),
        item_lines,
        package_lines,
        total_value,
    }
}

fn operation_lines(detailed: &OperationWithLines) -> Vec<OperationLineRow> {
    let operation = &detailed.operation;
    let mut rows = Vec::with_capacity(detailed.items.len() + detailed.packages.len());

    for line in &detailed.items {
        let item = line.item.as_ref();
        rows.push(OperationLineRow {
            row_type: ExportRowType::OperationItem,
            operation_id: operation.id,
            operation_name: operation.name.clone(),
            line_id: line.id,
            component_id: item.map(|i| i.id),
            component_name: text_of(item, |i| &i.name),
            brand: text_of(item, |i| &i.brand),
            hs_code: text_of(item, |i| &i.hs_code),
            category: text_of(item, |i| &i.category_name),
            family: text_of(item, |i| &i.family_name),
            sub_family: text_of(item, |i| &i.sub_family_name),
            quantity: line.quantity,
            unit_value: item.map(|i| i.value).unwrap_or(0.0),
            line_value: line.line_value(),
        });
    }

    for line in &detailed.packages {
        let package = line.package.as_ref();
        rows.push(OperationLineRow {
            row_type: ExportRowType::OperationPackage,
            operation_id: operation.id,
            operation_name: operation.name.clone(),
            line_id: line.id,
            component_id: package.map(|p| p.package.id),
            component_name: package.map(|p| p.package.name.clone()).unwrap_or_default(),
            brand: String::new(),
            hs_code: String::new(),
            category: String::new(),
            family: String::new(),
            sub_family: String::new(),
            quantity: line.quantity,
            unit_value: package.map(PackageWithItems::total_value).unwrap_or(0.0),
            line_value: line.line_value(),
        });
    }

    rows
}

fn package_header(record: &PackageRecord) -> PackageHeaderRow {
    let package = record.package();
    let (item_lines, total_value) = match record {
        PackageRecord::Header(_) => (None, None),
        PackageRecord::Detailed(detailed) => (Some(detailed.items.len()), Some(detailed.total_value())),
    };

    PackageHeaderRow {
        package_id: package.id,
        name: package.name.clone(),
        description: package.description.clone().unwrap_or_default(),
        year: package.year,
        location: package.location.clone().unwrap_or_default(),
        active: package.active,
        item_lines,
        total_value,
    }
}

fn package_lines(detailed: &PackageWithItems) -> Vec<PackageLineRow> {
    let package = &detailed.package;
    detailed
        .items
        .iter()
        .map(|line| {
            let item = line.item.as_ref();
            PackageLineRow {
                package_id: package.id,
                package_name: package.name.clone(),
                line_id: line.id,
                item_id: item.map(|i| i.id),
                item_name: text_of(item, |i| &i.name),
                brand: text_of(item, |i| &i.brand),
                hs_code: text_of(item, |i| &i.hs_code),
                category: text_of(item, |i| &i.category_name),
                family: text_of(item, |i| &i.family_name),
                sub_family: text_of(item, |i| &i.sub_family_name),
                quantity: line.quantity,
                unit_value: item.map(|i| i.value).unwrap_or(0.0),
                line_value: line.line_value(),
            }
        })
        .collect()
}

fn text_of<F>(item: Option<&ItemSummary>, field: F) -> String
where
    F: Fn(&ItemSummary) -> &String,
{
    item.map(|i| field(i).clone()).unwrap_or_default()
}
