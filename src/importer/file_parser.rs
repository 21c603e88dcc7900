// ==========================================
// 库存看板后端 - 文件解析器实现
// ==========================================
// 支持: CSV (.csv) / Excel（其余任意扩展名）
// 输入: 上传文件字节（不落盘）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{FileParser, RawRecord};
use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

/// 表头所在行号（数据行从第 2 行开始）
const HEADER_ROW: usize = 1;

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, content: &[u8]) -> ImportResult<Vec<RawRecord>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(content);

        // 读取表头（去除 UTF-8 BOM）
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        // 读取所有行
        let mut records = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let row_number = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(row_idx + HEADER_ROW + 1);

            let mut row_map = HashMap::new();
            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(RawRecord::new(row_number, row_map));
        }

        Ok(records)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_records(&self, content: &[u8]) -> ImportResult<Vec<RawRecord>> {
        // 自动识别 xlsx/xls/xlsb/ods
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(content.to_vec()))?;

        // 读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("workbook has no worksheet".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）
        let mut rows = range.rows();
        let header_row = match rows.next() {
            Some(row) => row,
            None => return Ok(Vec::new()),
        };

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell_to_string(cell).trim().to_string())
            .collect();

        // 读取数据行
        let mut records = Vec::new();
        for (row_idx, data_row) in rows.enumerate() {
            let mut row_map = HashMap::new();

            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), cell_to_string(cell).trim().to_string());
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(RawRecord::new(row_idx + HEADER_ROW + 1, row_map));
        }

        Ok(records)
    }
}

/// 单元格 → 文本
///
/// 说明：
/// - 整数值的浮点单元格输出为整数文本（10.0 → "10"）
/// - 日期单元格输出为 YYYY-MM-DD
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string(),
    }
}

// ==========================================
// 通用文件解析器（根据文件名扩展名选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    /// `.csv`（不区分大小写）走 CSV,其余一律按 Excel 解析
    pub fn parse(&self, filename: &str, content: &[u8]) -> ImportResult<Vec<RawRecord>> {
        if Self::is_csv(filename) {
            CsvParser.parse_to_raw_records(content)
        } else {
            ExcelParser.parse_to_raw_records(content)
        }
    }

    pub fn is_csv(filename: &str) -> bool {
        Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_parser_valid_content() {
        let content = b"Part Number,Name,In Stock\nKQ-001,Brake Pad,10\nKQ-002,Seal Kit,3\n";

        let records = CsvParser.parse_to_raw_records(content).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Part Number"), Some("KQ-001"));
        assert_eq!(records[0].get("In Stock"), Some("10"));
        assert_eq!(records[0].row_number, 2);
        assert_eq!(records[1].row_number, 3);
    }

    #[test]
    fn test_csv_parser_strips_bom_and_trims_headers() {
        let content = "\u{feff} Part Number , Name\nKQ-001, Brake Pad \n".as_bytes();

        let records = CsvParser.parse_to_raw_records(content).unwrap();

        assert_eq!(records[0].get("Part Number"), Some("KQ-001"));
        assert_eq!(records[0].get("Name"), Some("Brake Pad"));
    }

    #[test]
    fn test_csv_parser_skip_empty_rows() {
        let content = b"Part Number,In Stock\nKQ-001,2\n,\nKQ-002,3\n";

        let records = CsvParser.parse_to_raw_records(content).unwrap();

        // 应跳过空行
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].row_number, 4);
    }

    #[test]
    fn test_csv_parser_header_only() {
        let records = CsvParser.parse_to_raw_records(b"Part Number,Name\n").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_excel_parser_rejects_garbage() {
        let result = ExcelParser.parse_to_raw_records(b"definitely not a workbook");
        assert!(matches!(result, Err(ImportError::ExcelParseError(_))));
    }

    #[test]
    fn test_extension_selects_parser() {
        assert!(UniversalFileParser::is_csv("inventory.csv"));
        assert!(UniversalFileParser::is_csv("INVENTORY.CSV"));
        assert!(!UniversalFileParser::is_csv("inventory.xlsx"));
        assert!(!UniversalFileParser::is_csv("inventory"));
        assert!(!UniversalFileParser::is_csv("csv"));
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Float(10.0)), "10");
        assert_eq!(cell_to_string(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::String("KQ-1".to_string())), "KQ-1");
    }
}
