// ==========================================
// 保险业务数据导入 - 导入管道领域模型
// ==========================================
// 职责: 导入请求 / 原始行 / 行级错误 / 导入结果 / 审计条目
// 生命周期: RawRow 仅存在于导入流程内
// ==========================================

use crate::domain::records::AuditLogRecord;
use crate::domain::types::{AuditSeverity, DataType, ImportStatus};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// ==========================================
// FileFormat - 文件格式提示
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileFormat {
    Xlsx,
    Xls,
    Csv,
}

impl FileFormat {
    /// 根据文件扩展名推断格式（大小写不敏感）
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "xlsx" | "xlsm" => Some(FileFormat::Xlsx),
            "xls" => Some(FileFormat::Xls),
            "csv" => Some(FileFormat::Csv),
            _ => None,
        }
    }
}

// ==========================================
// ImportRequest - 导入请求
// ==========================================
// 文件内容整体加载在内存中
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub data_type: String,          // 数据类型标签（原样保留，由注册表校验）
    pub content: Vec<u8>,           // 文件字节
    pub file_name: Option<String>,  // 原始文件名（仅作格式提示）
}

impl ImportRequest {
    pub fn new(data_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            data_type: data_type.into(),
            content,
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// 由文件名推断的格式提示
    pub fn format_hint(&self) -> Option<FileFormat> {
        self.file_name.as_deref().and_then(FileFormat::from_file_name)
    }
}

// ==========================================
// RawRow - 原始行
// ==========================================
// 列名 → 未类型化单元格值（有序）
// value = None 表示单元格缺失（归一化后也代表空串）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCell {
    pub column: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub row_number: usize, // 源文件数据行号（表头之后从 1 开始）
    pub cells: Vec<RawCell>,
}

impl RawRow {
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            cells: Vec::new(),
        }
    }

    pub fn push(&mut self, column: impl Into<String>, value: Option<String>) {
        self.cells.push(RawCell {
            column: column.into(),
            value,
        });
    }

    /// 按列名取值；列不存在与单元格缺失同样返回 None
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|c| c.column == column)
            .and_then(|c| c.value.as_deref())
    }

    /// 是否所有单元格都为空或缺失
    pub fn is_blank(&self) -> bool {
        self.cells
            .iter()
            .all(|c| c.value.as_deref().map_or(true, |v| v.trim().is_empty()))
    }
}

// ==========================================
// RowError - 行级错误
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub row: usize,      // 1-based 行号
    pub reason: String,  // 可读原因
}

impl RowError {
    pub fn new(row: usize, reason: impl Into<String>) -> Self {
        Self {
            row,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row, self.reason)
    }
}

// ==========================================
// ImportResult - 导入结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    pub records_imported: usize,
    pub errors: Vec<RowError>,
    pub status: ImportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl ImportResult {
    /// 根据行处理结果构造（无行错误 → completed，否则 completed_with_errors）
    pub fn from_rows(records_imported: usize, errors: Vec<RowError>) -> Self {
        let status = if errors.is_empty() {
            ImportStatus::Completed
        } else {
            ImportStatus::CompletedWithErrors
        };

        Self {
            records_imported,
            errors,
            status,
            failure_reason: None,
        }
    }

    /// 致命错误结果（未处理任何行）
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            records_imported: 0,
            errors: Vec::new(),
            status: ImportStatus::Failed,
            failure_reason: Some(reason.into()),
        }
    }

    /// 行错误的展示文本（"Row n: reason"）
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }
}

// ==========================================
// AuditEntry - 导入审计条目
// ==========================================
// 每个通过文件解析的导入请求恰好一条
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub log_id: String,             // IMPORT-XXXXXXXX
    pub action: String,             // FILE_IMPORT
    pub resource_type: DataType,
    pub severity: AuditSeverity,
    pub timestamp: NaiveDateTime,
    pub description: String,
}

impl AuditEntry {
    pub const ACTION: &'static str = "FILE_IMPORT";
    pub const EVENT_TYPE: &'static str = "system_event";

    pub fn new(
        log_id: String,
        data_type: DataType,
        imported_count: usize,
        error_count: usize,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            log_id,
            action: Self::ACTION.to_string(),
            resource_type: data_type,
            severity: AuditSeverity::from_error_count(error_count),
            timestamp,
            description: format!(
                "File import completed for {}: {} records imported, {} errors",
                data_type, imported_count, error_count
            ),
        }
    }

    /// 转为 audit_logs 表记录
    pub fn into_record(self) -> AuditLogRecord {
        AuditLogRecord {
            log_id: self.log_id,
            session_id: None,
            user_id: None,
            user_email: None,
            user_role: None,
            action: self.action,
            resource_type: self.resource_type.as_str().to_string(),
            resource_id: None,
            event_timestamp: self.timestamp,
            event_type: Self::EVENT_TYPE.to_string(),
            severity: self.severity.as_str().to_string(),
            ip_address: None,
            user_agent: None,
            request_method: None,
            request_url: None,
            description: Some(self.description),
            error_message: None,
            status: self.severity.status_str().to_string(),
            is_sensitive: false,
            requires_review: false,
            correlation_id: None,
            parent_log_id: None,
        }
    }
}
