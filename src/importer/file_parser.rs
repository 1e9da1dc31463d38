// ==========================================
// 保险业务数据导入 - 表格读取器实现
// ==========================================
// 阶段 0: 文件字节 → 原始行
// 支持: Excel (.xlsx/.xls，按内容识别) / CSV (按文件名提示)
// ==========================================

use crate::domain::import::{FileFormat, RawRow};
use crate::importer::error::{ImportError, ImporterResult};
use crate::importer::importer_trait::SpreadsheetReader;
use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use csv::{ReaderBuilder, StringRecord};
use std::io::Cursor;

const XLSX_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// 超过该量级的浮点数不再按整数输出
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

// ==========================================
// CSV Reader 实现
// ==========================================
pub struct CsvReader;

impl SpreadsheetReader for CsvReader {
    fn read(&self, content: &[u8], _hint: Option<FileFormat>) -> ImporterResult<Vec<RawRow>> {
        let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);

        // 表头按普通记录读取，以便拿到其所在行号
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(content);
        let mut records = reader.records();

        // 读取表头
        let header_record = records
            .next()
            .transpose()?
            .ok_or_else(|| ImportError::Format("file has no header row".to_string()))?;
        let header_line = line_of(&header_record);
        let headers: Vec<String> = header_record.iter().map(|h| h.to_string()).collect();
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(ImportError::Format("file has no header row".to_string()));
        }

        // 读取所有行（csv 会跳过完全空白的行，行号按源文件行计算）
        let mut rows = Vec::new();
        for (row_idx, result) in records.enumerate() {
            let record = result?;
            let row_number = line_of(&record)
                .zip(header_line)
                .map(|(line, header)| line.saturating_sub(header))
                .filter(|n| *n > 0)
                .unwrap_or(row_idx + 1);
            let mut row = RawRow::new(row_number);

            for (col_idx, header) in headers.iter().enumerate() {
                row.push(header.clone(), record.get(col_idx).map(|v| v.to_string()));
            }

            rows.push(row);
        }

        Ok(rows)
    }
}

fn line_of(record: &StringRecord) -> Option<usize> {
    record.position().map(|p| p.line() as usize)
}

// ==========================================
// Excel Reader 实现
// ==========================================
// 格式由 calamine 按内容探测，只读取第一个工作表
pub struct ExcelReader;

impl SpreadsheetReader for ExcelReader {
    fn read(&self, content: &[u8], _hint: Option<FileFormat>) -> ImporterResult<Vec<RawRow>> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(content.to_vec()))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ImportError::Format("workbook has no worksheet".to_string()))??;

        // 提取表头（第一行）
        let mut rows_iter = range.rows();
        let header_row = rows_iter
            .next()
            .ok_or_else(|| ImportError::Format("file has no header row".to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| render_cell(cell).unwrap_or_default())
            .collect();

        // 读取数据行
        let mut rows = Vec::new();
        for (row_idx, data_row) in rows_iter.enumerate() {
            let mut row = RawRow::new(row_idx + 1);

            for (col_idx, header) in headers.iter().enumerate() {
                row.push(header.clone(), data_row.get(col_idx).and_then(render_cell));
            }

            rows.push(row);
        }

        Ok(rows)
    }
}

/// 单元格 → 文本（空单元格 / 错误单元格视为缺失）
fn render_cell(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(render_float(*f)),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(_) => Some(
            cell.as_datetime()
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| cell.to_string()),
        ),
    }
}

/// 整数值浮点数去掉小数部分（42.0 → "42"）
fn render_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

// ==========================================
// 通用读取器（按内容与文件名提示选择）
// ==========================================
pub struct UniversalReader;

impl UniversalReader {
    fn looks_like_workbook(content: &[u8]) -> bool {
        content.starts_with(XLSX_MAGIC) || content.starts_with(OLE_MAGIC)
    }
}

impl SpreadsheetReader for UniversalReader {
    fn read(&self, content: &[u8], hint: Option<FileFormat>) -> ImporterResult<Vec<RawRow>> {
        if content.is_empty() {
            return Err(ImportError::Format("file is empty".to_string()));
        }

        if Self::looks_like_workbook(content) {
            return ExcelReader.read(content, hint);
        }

        match hint {
            Some(FileFormat::Csv) => CsvReader.read(content, hint),
            _ => Err(ImportError::Format(
                "content is not a recognizable spreadsheet".to_string(),
            )),
        }
    }
}
