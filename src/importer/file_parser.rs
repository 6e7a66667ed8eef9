// ==========================================
// 库存资产管理系统 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: Excel (.xlsx,仅首个工作表) / CSV (.csv,UTF-8)
// ==========================================

use crate::domain::import::RawRow;
use crate::domain::types::SourceFormat;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::FileParser;
use calamine::{Reader, Xlsx};
use csv::ReaderBuilder;
use std::io::Cursor;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 检查文件存在且扩展名与解析器一致
fn check_source(path: &Path, expected: SourceFormat) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if SourceFormat::from_extension(ext) != Some(expected) {
        return Err(ImportError::UnsupportedFormat(ext.to_string()));
    }
    Ok(())
}

/// 按表头组装一行；完全空白的行返回 None
fn assemble_row<I>(headers: &[String], cells: I) -> Option<RawRow>
where
    I: IntoIterator<Item = String>,
{
    let mut row_map = RawRow::new();
    for (col_idx, value) in cells.into_iter().enumerate() {
        if let Some(header) = headers.get(col_idx) {
            if header.is_empty() {
                continue;
            }
            row_map.insert(header.clone(), value.trim().to_string());
        }
    }
    // 短行补齐空单元格,保证每行的列集合与表头一致
    for header in headers.iter().filter(|h| !h.is_empty()) {
        row_map.entry(header.clone()).or_default();
    }

    if row_map.values().all(|v| v.is_empty()) {
        None
    } else {
        Some(row_map)
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        check_source(file_path, SourceFormat::Csv)?;
        let bytes = std::fs::read(file_path)?;
        self.parse_bytes(&bytes)
    }

    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::MissingHeader);
        }

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            if let Some(row) = assemble_row(&headers, record.iter().map(str::to_string)) {
                records.push(row);
            }
        }

        Ok(records)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        check_source(file_path, SourceFormat::Xlsx)?;
        let bytes = std::fs::read(file_path)?;
        self.parse_bytes(&bytes)
    }

    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>> {
        let mut workbook = Xlsx::new(Cursor::new(bytes))?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）
        let mut rows = range.rows();
        let header_row = rows.next().ok_or(ImportError::MissingHeader)?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::MissingHeader);
        }

        let records = rows
            .filter_map(|data_row| assemble_row(&headers, data_row.iter().map(|cell| cell.to_string())))
            .collect();

        Ok(records)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<RawRow>> {
        let path = file_path.as_ref();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match SourceFormat::from_extension(ext) {
            Some(SourceFormat::Csv) => CsvParser.parse_to_raw_records(path),
            Some(SourceFormat::Xlsx) => ExcelParser.parse_to_raw_records(path),
            None => {
                if !path.exists() {
                    return Err(ImportError::FileNotFound(path.display().to_string()));
                }
                Err(ImportError::UnsupportedFormat(ext.to_string()))
            }
        }
    }

    /// 解析上传内容（扩展名由调用方声明）
    pub fn parse_bytes(&self, bytes: &[u8], extension: &str) -> ImportResult<Vec<RawRow>> {
        match SourceFormat::from_extension(extension) {
            Some(SourceFormat::Csv) => CsvParser.parse_bytes(bytes),
            Some(SourceFormat::Xlsx) => ExcelParser.parse_bytes(bytes),
            None => Err(ImportError::UnsupportedFormat(extension.to_string())),
        }
    }
}
