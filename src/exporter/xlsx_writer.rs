// ==========================================
// 库存资产管理系统 - XLSX 写入器
// ==========================================
// 输出: Office Open XML (SpreadsheetML) 压缩包
// 约束:
// - 字符串一律写为内联字符串,不生成 sharedStrings
// - 压缩包内时间戳固定,相同输入得到相同字节
// ==========================================

use crate::exporter::error::{ExportError, ExportResult};
use std::fmt::Write as _;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Excel 工作表名称上限
const MAX_SHEET_NAME_LEN: usize = 31;

const STYLES_XML: &str = r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#;

// ==========================================
// CellValue - 单元格
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

struct Worksheet {
    name: String,
    rows: Vec<Vec<CellValue>>,
}

// ==========================================
// XlsxWriter - 多工作表工作簿
// ==========================================
#[derive(Default)]
pub struct XlsxWriter {
    sheets: Vec<Worksheet>,
}

impl XlsxWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加工作表（按追加顺序输出）
    ///
    /// # 返回
    /// - Err(WorkbookGeneration): 名称为空、超长、含非法字符或重复
    pub fn add_sheet(&mut self, name: &str, rows: Vec<Vec<CellValue>>) -> ExportResult<()> {
        validate_sheet_name(name)?;
        if self.sheets.iter().any(|s| s.name.eq_ignore_ascii_case(name)) {
            return Err(ExportError::WorkbookGeneration(format!("工作表名称重复: {}", name)));
        }
        self.sheets.push(Worksheet {
            name: name.to_string(),
            rows,
        });
        Ok(())
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// 生成 .xlsx 字节
    pub fn finish(self) -> ExportResult<Vec<u8>> {
        if self.sheets.is_empty() {
            return Err(ExportError::WorkbookGeneration("工作簿至少需要一个工作表".to_string()));
        }

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut parts: Vec<(String, String)> = vec![
            ("[Content_Types].xml".to_string(), self.content_types_xml()),
            ("_rels/.rels".to_string(), root_rels_xml()),
            ("xl/workbook.xml".to_string(), self.workbook_xml()),
            ("xl/_rels/workbook.xml.rels".to_string(), self.workbook_rels_xml()),
            ("xl/styles.xml".to_string(), format!("{}{}", XML_HEADER, STYLES_XML)),
        ];
        for (idx, sheet) in self.sheets.iter().enumerate() {
            parts.push((
                format!("xl/worksheets/sheet{}.xml", idx + 1),
                worksheet_xml(&sheet.rows),
            ));
        }

        for (path, content) in parts {
            zip.start_file(path, options)?;
            zip.write_all(content.as_bytes())?;
        }

        Ok(zip.finish()?.into_inner())
    }

    fn content_types_xml(&self) -> String {
        let mut xml = format!(
            r#"{}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
            XML_HEADER
        );
        for idx in 1..=self.sheets.len() {
            let _ = write!(
                xml,
                r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                idx
            );
        }
        xml.push_str("</Types>");
        xml
    }

    fn workbook_xml(&self) -> String {
        let mut xml = format!(
            r#"{}<workbook xmlns="{}" xmlns:r="{}"><sheets>"#,
            XML_HEADER, NS_MAIN, NS_REL
        );
        for (idx, sheet) in self.sheets.iter().enumerate() {
            let _ = write!(
                xml,
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape_xml(&sheet.name),
                idx + 1,
                idx + 1
            );
        }
        xml.push_str("</sheets></workbook>");
        xml
    }

    fn workbook_rels_xml(&self) -> String {
        let mut xml = format!(r#"{}<Relationships xmlns="{}">"#, XML_HEADER, NS_PKG_REL);
        for idx in 1..=self.sheets.len() {
            let _ = write!(
                xml,
                r#"<Relationship Id="rId{}" Type="{}/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                idx, NS_REL, idx
            );
        }
        let _ = write!(
            xml,
            r#"<Relationship Id="rId{}" Type="{}/styles" Target="styles.xml"/>"#,
            self.sheets.len() + 1,
            NS_REL
        );
        xml.push_str("</Relationships>");
        xml
    }
}

fn root_rels_xml() -> String {
    format!(
        r#"{}<Relationships xmlns="{}"><Relationship Id="rId1" Type="{}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#,
        XML_HEADER, NS_PKG_REL, NS_REL
    )
}

fn worksheet_xml(rows: &[Vec<CellValue>]) -> String {
    let mut xml = format!(r#"{}<worksheet xmlns="{}"><sheetData>"#, XML_HEADER, NS_MAIN);
    for (row_idx, row) in rows.iter().enumerate() {
        let row_number = row_idx + 1;
        let _ = write!(xml, r#"<row r="{}">"#, row_number);
        for (col_idx, cell) in row.iter().enumerate() {
            let reference = format!("{}{}", column_letter(col_idx), row_number);
            match cell {
                CellValue::Empty => {}
                CellValue::Number(n) if n.is_finite() => {
                    let _ = write!(xml, r#"<c r="{}"><v>{}</v></c>"#, reference, n);
                }
                CellValue::Number(n) => {
                    let _ = write!(
                        xml,
                        r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                        reference, n
                    );
                }
                CellValue::Text(text) => {
                    let _ = write!(
                        xml,
                        r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                        reference,
                        escape_xml(text)
                    );
                }
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

/// 0 → A, 25 → Z, 26 → AA
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// 转义 XML 特殊字符并剔除 XML 1.0 不允许的字符
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(ch),
            c if (c as u32) < 0x20 => {}
            '\u{FFFE}' | '\u{FFFF}' => {}
            c => out.push(c),
        }
    }
    out
}

fn validate_sheet_name(name: &str) -> ExportResult<()> {
    const FORBIDDEN: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];
    let invalid = name.trim().is_empty()
        || name.chars().count() > MAX_SHEET_NAME_LEN
        || name.chars().any(|c| FORBIDDEN.contains(&c));
    if invalid {
        return Err(ExportError::WorkbookGeneration(format!("工作表名称无效: {}", name)));
    }
    Ok(())
}

/// 测试辅助: 列出压缩包内的文件
#[cfg(test)]
pub(crate) fn archive_entries(bytes: &[u8]) -> std::collections::HashSet<String> {
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    archive.file_names().map(str::to_string).collect()
}
