// ==========================================
// 库存资产管理系统 - 导入模板
// ==========================================
// 表头与导入期望列一致,附一行示例数据
// ==========================================

use crate::domain::export::ExportArtifact;
use crate::domain::types::ExportFormat;
use crate::exporter::error::{ExportError, ExportResult};
use crate::exporter::xlsx_writer::{CellValue, XlsxWriter};
use crate::importer::row_validator::EXPECTED_COLUMNS;

pub const TEMPLATE_FILE_STEM: &str = "inventory-import-template";
pub const TEMPLATE_SHEET_NAME: &str = "Items";

/// 示例行（与 EXPECTED_COLUMNS 一一对应,第 3/4/7..11 列为数值）
const EXAMPLE_ROW: [&str; 15] = [
    "Wireless Microphone",
    "Handheld UHF microphone",
    "Acme Audio",
    "120",
    "150",
    "8518.10",
    "Warehouse A",
    "20",
    "5",
    "5",
    "0.4",
    "2",
    "Audio",
    "Microphones",
    "Wireless",
];

const NUMERIC_COLUMNS: [usize; 7] = [3, 4, 7, 8, 9, 10, 11];

pub struct TemplateBuilder;

impl TemplateBuilder {
    pub fn build(&self, format: ExportFormat) -> ExportResult<ExportArtifact> {
        let bytes = match format {
            ExportFormat::Csv => csv_template()?,
            ExportFormat::Xlsx => xlsx_template()?,
        };

        Ok(ExportArtifact {
            file_name: format!("{}.{}", TEMPLATE_FILE_STEM, format.extension()),
            mime_type: format.mime_type().to_string(),
            bytes,
        })
    }
}

fn csv_template() -> ExportResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPECTED_COLUMNS)?;
    writer.write_record(EXAMPLE_ROW)?;
    writer
        .into_inner()
        .map_err(|e| ExportError::CsvGeneration(e.to_string()))
}

fn xlsx_template() -> ExportResult<Vec<u8>> {
    let header = EXPECTED_COLUMNS.iter().map(|c| CellValue::from(*c)).collect();
    let example = EXAMPLE_ROW
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            if NUMERIC_COLUMNS.contains(&idx) {
                value
                    .parse::<f64>()
                    .map(CellValue::Number)
                    .unwrap_or_else(|_| CellValue::from(*value))
            } else {
                CellValue::from(*value)
            }
        })
        .collect();

    let mut writer = XlsxWriter::new();
    writer.add_sheet(TEMPLATE_SHEET_NAME, vec![header, example])?;
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::import::RowDecode;
    use crate::importer::file_parser::UniversalFileParser;
    use crate::importer::row_validator::RowValidator;

    fn assert_template_imports_cleanly(format: ExportFormat) {
        let artifact = TemplateBuilder.build(format).unwrap();
        let rows = UniversalFileParser
            .parse_bytes(&artifact.bytes, format.extension())
            .unwrap();

        assert_eq!(rows.len(), 1);
        for column in EXPECTED_COLUMNS {
            assert!(rows[0].contains_key(column), "missing column {}", column);
        }
        match RowValidator.decode_row(&rows[0]) {
            RowDecode::Valid(row) => {
                assert_eq!(row.name, "Wireless Microphone");
                assert_eq!(row.quantity, 2);
                assert_eq!(row.value, 120.0);
            }
            RowDecode::Invalid(errors) => panic!("template row rejected: {:?}", errors),
        }
    }

    #[test]
    fn test_csv_template_round_trips_through_importer() {
        assert_template_imports_cleanly(ExportFormat::Csv);
    }

    #[test]
    fn test_xlsx_template_round_trips_through_importer() {
        assert_template_imports_cleanly(ExportFormat::Xlsx);
    }

    #[test]
    fn test_template_file_name() {
        let artifact = TemplateBuilder.build(ExportFormat::Xlsx).unwrap();
        assert_eq!(artifact.file_name, "inventory-import-template.xlsx");
    }
}
