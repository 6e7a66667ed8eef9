// ==========================================
// 库存资产管理系统 - 行校验器
// ==========================================
// 阶段 1: RawRow → RowDecode（数值强转 + 规则校验）
// 约束: 校验失败的行只记录,不阻断其余行
// ==========================================

use crate::domain::import::{FieldError, ImportRow, RawRow, RowDecode, ValidationOutcome};
use crate::domain::item::Dimensions;
use crate::i18n::t_with_args;

// ==========================================
// 导入列名（区分大小写）
// ==========================================
pub mod columns {
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const BRAND: &str = "brand";
    pub const VALUE: &str = "value";
    pub const INSURANCE_VALUE: &str = "insuranceValue";
    pub const HS_CODE: &str = "hsCode";
    pub const LOCATION: &str = "location";
    pub const LENGTH: &str = "length";
    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";
    pub const WEIGHT: &str = "weight";
    pub const QUANTITY: &str = "quantity";
    pub const CATEGORY_NAME: &str = "categoryName";
    pub const FAMILY_NAME: &str = "familyName";
    pub const SUB_FAMILY_NAME: &str = "subFamilyName";
}

/// 导入文件的期望列（模板按此顺序输出）
pub const EXPECTED_COLUMNS: [&str; 15] = [
    columns::NAME,
    columns::DESCRIPTION,
    columns::BRAND,
    columns::VALUE,
    columns::INSURANCE_VALUE,
    columns::HS_CODE,
    columns::LOCATION,
    columns::LENGTH,
    columns::WIDTH,
    columns::HEIGHT,
    columns::WEIGHT,
    columns::QUANTITY,
    columns::CATEGORY_NAME,
    columns::FAMILY_NAME,
    columns::SUB_FAMILY_NAME,
];

/// 表头必须包含的列（description、quantity 可省略）
pub const REQUIRED_COLUMNS: [&str; 13] = [
    columns::NAME,
    columns::BRAND,
    columns::VALUE,
    columns::INSURANCE_VALUE,
    columns::HS_CODE,
    columns::LOCATION,
    columns::LENGTH,
    columns::WIDTH,
    columns::HEIGHT,
    columns::WEIGHT,
    columns::CATEGORY_NAME,
    columns::FAMILY_NAME,
    columns::SUB_FAMILY_NAME,
];

/// 数量列缺省值
const DEFAULT_QUANTITY: i64 = 1;

pub struct RowValidator;

impl RowValidator {
    /// 表头缺失的必需列（按期望顺序）
    ///
    /// 解析器保证每行的列集合与表头一致,因此只看第一行；无数据行时返回空
    pub fn missing_columns(&self, rows: &[RawRow]) -> Vec<String> {
        let Some(first) = rows.first() else {
            return Vec::new();
        };
        REQUIRED_COLUMNS
            .iter()
            .filter(|column| !first.contains_key(**column))
            .map(|column| column.to_string())
            .collect()
    }

    /// 解码单行
    ///
    /// # 返回
    /// - RowDecode::Valid: 全部字段通过
    /// - RowDecode::Invalid: 全部字段错误（不止第一个）
    pub fn decode_row(&self, row: &RawRow) -> RowDecode {
        let mut errors = Vec::new();

        let name = required_text(row, columns::NAME, &mut errors);
        let brand = required_text(row, columns::BRAND, &mut errors);
        let hs_code = required_text(row, columns::HS_CODE, &mut errors);
        let location = required_text(row, columns::LOCATION, &mut errors);
        let category_name = required_text(row, columns::CATEGORY_NAME, &mut errors);
        let family_name = required_text(row, columns::FAMILY_NAME, &mut errors);
        let sub_family_name = required_text(row, columns::SUB_FAMILY_NAME, &mut errors);

        let value = amount(row, columns::VALUE, &mut errors);
        let insurance_value = amount(row, columns::INSURANCE_VALUE, &mut errors);
        let length = amount(row, columns::LENGTH, &mut errors);
        let width = amount(row, columns::WIDTH, &mut errors);
        let height = amount(row, columns::HEIGHT, &mut errors);
        let weight = amount(row, columns::WEIGHT, &mut errors);
        let quantity = quantity(row, &mut errors);

        if !errors.is_empty() {
            return RowDecode::Invalid(errors);
        }

        RowDecode::Valid(ImportRow {
            name,
            description: cell(row, columns::DESCRIPTION).map(str::to_string),
            brand,
            value,
            insurance_value,
            hs_code,
            location,
            dimensions: Dimensions {
                length,
                width,
                height,
            },
            weight,
            quantity,
            category_name,
            family_name,
            sub_family_name,
        })
    }

    /// 整表校验
    ///
    /// 有效行保持原顺序；错误按行号（从 1 开始,不含表头）归档
    pub fn validate_rows(&self, rows: &[RawRow]) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::default();

        for (idx, row) in rows.iter().enumerate() {
            match self.decode_row(row) {
                RowDecode::Valid(import_row) => {
                    outcome.valid.push(import_row);
                    outcome.row_numbers.push(idx + 1);
                }
                RowDecode::Invalid(errors) => {
                    tracing::debug!(row_number = idx + 1, errors = errors.len(), "行校验未通过");
                    outcome.errors.insert(idx + 1, errors);
                }
            }
        }

        outcome
    }
}

/// 去除首尾空白后的非空单元格
fn cell<'a>(row: &'a RawRow, column: &str) -> Option<&'a str> {
    row.get(column).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn field_error(column: &str, key: &str, extra: &[(&str, &str)]) -> FieldError {
    let mut args = vec![("field", column)];
    args.extend_from_slice(extra);
    FieldError {
        path: column.to_string(),
        message: t_with_args(key, &args),
    }
}

fn required_text(row: &RawRow, column: &str, errors: &mut Vec<FieldError>) -> String {
    match cell(row, column) {
        Some(value) => value.to_string(),
        None => {
            errors.push(field_error(column, "validation.required", &[]));
            String::new()
        }
    }
}

/// 金额/尺寸列: 空值按 0 处理
fn amount(row: &RawRow, column: &str, errors: &mut Vec<FieldError>) -> f64 {
    let Some(raw) = cell(row, column) else {
        return 0.0;
    };

    match raw.parse::<f64>() {
        Err(_) => {
            errors.push(field_error(column, "validation.not_a_number", &[("value", raw)]));
            0.0
        }
        Ok(value) if !value.is_finite() => {
            errors.push(field_error(column, "validation.not_finite", &[]));
            0.0
        }
        Ok(value) if value < 0.0 => {
            errors.push(field_error(column, "validation.min_zero", &[]));
            0.0
        }
        Ok(value) => value,
    }
}

/// 数量列: 空值按 1 处理；Excel 数值单元格可能带 ".0"
fn quantity(row: &RawRow, errors: &mut Vec<FieldError>) -> i64 {
    let column = columns::QUANTITY;
    let Some(raw) = cell(row, column) else {
        return DEFAULT_QUANTITY;
    };

    match raw.parse::<f64>() {
        Err(_) => {
            errors.push(field_error(column, "validation.not_a_number", &[("value", raw)]));
            DEFAULT_QUANTITY
        }
        Ok(value) if !value.is_finite() || value < 1.0 || value.fract() != 0.0 || value >= i64::MAX as f64 => {
            errors.push(field_error(column, "validation.positive_integer", &[]));
            DEFAULT_QUANTITY
        }
        Ok(value) => value as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn complete_row(name: &str, value: &str) -> RawRow {
        raw(&[
            ("name", name),
            ("brand", "Acme"),
            ("value", value),
            ("insuranceValue", "10"),
            ("hsCode", "8525"),
            ("location", "Shelf A"),
            ("length", "1.5"),
            ("width", "2"),
            ("height", "3"),
            ("weight", "0.5"),
            ("quantity", "2"),
            ("categoryName", "Audio"),
            ("familyName", "Mics"),
            ("subFamilyName", "Wireless"),
        ])
    }

    fn error_paths(decode: RowDecode) -> Vec<String> {
        match decode {
            RowDecode::Invalid(errors) => errors.into_iter().map(|e| e.path).collect(),
            RowDecode::Valid(row) => panic!("expected invalid row, got {:?}", row),
        }
    }

    #[test]
    fn test_decode_complete_row() {
        let decoded = RowValidator.decode_row(&complete_row("Mic", "99.5"));
        let RowDecode::Valid(row) = decoded else {
            panic!("row should be valid");
        };
        assert_eq!(row.name, "Mic");
        assert_eq!(row.value, 99.5);
        assert_eq!(row.quantity, 2);
        assert_eq!(row.dimensions.length, 1.5);
        assert_eq!(row.description, None);
    }

    #[test]
    fn test_empty_numbers_coerce_to_defaults() {
        let mut row = complete_row("Mic", "");
        row.remove("weight");
        row.insert("quantity".to_string(), "  ".to_string());

        let RowDecode::Valid(decoded) = RowValidator.decode_row(&row) else {
            panic!("row should be valid");
        };
        assert_eq!(decoded.value, 0.0);
        assert_eq!(decoded.weight, 0.0);
        assert_eq!(decoded.quantity, 1);
    }

    #[test]
    fn test_collects_all_field_errors() {
        let row = raw(&[("name", " "), ("value", "abc"), ("quantity", "1.5")]);

        let paths = error_paths(RowValidator.decode_row(&row));

        for expected in ["name", "brand", "hsCode", "location", "categoryName", "value", "quantity"] {
            assert!(paths.iter().any(|p| p == expected), "missing error for {}", expected);
        }
    }

    #[test]
    fn test_rejects_non_finite_and_zero_quantity() {
        let mut row = complete_row("Mic", "NaN");
        row.insert("quantity".to_string(), "0".to_string());

        let paths = error_paths(RowValidator.decode_row(&row));

        assert_eq!(paths, vec!["value".to_string(), "quantity".to_string()]);
    }

    #[test]
    fn test_negative_value_reports_row_number_and_keeps_order() {
        let rows = vec![
            complete_row("first", "1"),
            complete_row("second", "-5"),
            complete_row("third", "3"),
        ];

        let outcome = RowValidator.validate_rows(&rows);

        assert_eq!(outcome.invalid_count(), 1);
        let errors = outcome.errors.get(&2).expect("row 2 should fail");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "value");
        let names: Vec<&str> = outcome.valid.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["first", "third"]);
        assert_eq!(outcome.row_numbers, vec![1, 3]);
    }

    #[test]
    fn test_misnamed_header_reports_missing_columns() {
        use crate::importer::file_parser::CsvParser;
        use crate::importer::importer_trait::FileParser;

        let csv = b"name,brand,Value,insuranceValue,hsCode,location,categoryName,familyName,subFamilyName\n\
Mic,Acme,500,10,8518,Shelf A,Audio,Mics,Wireless\n";
        let rows = CsvParser.parse_bytes(csv).unwrap();

        let missing = RowValidator.missing_columns(&rows);

        assert_eq!(missing, vec!["value", "length", "width", "height", "weight"]);
    }

    #[test]
    fn test_optional_columns_may_be_absent() {
        let mut row = complete_row("Mic", "1");
        row.remove("quantity");

        assert!(RowValidator.missing_columns(&[row]).is_empty());
        assert!(RowValidator.missing_columns(&[]).is_empty());
    }

    #[test]
    fn test_quantity_at_i64_bound_is_rejected() {
        let mut row = complete_row("Mic", "1");
        row.insert("quantity".to_string(), "9223372036854775808".to_string());

        assert_eq!(error_paths(RowValidator.decode_row(&row)), vec!["quantity".to_string()]);
    }
}
