// ==========================================
// 保险业务数据导入 - 领域类型定义
// ==========================================
// 职责: 数据类型标签 / 导入状态 / 审计级别
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ==========================================
// 数据类型标签 (Data Type)
// ==========================================
// 固定七类，标签即表名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Payments,
    Receipts,
    Policies,
    Claims,
    Customers,
    Agents,
    AuditLogs,
}

/// 标签不在固定集合内
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported data type: {0}")]
pub struct UnknownDataType(pub String);

impl DataType {
    /// 全部数据类型（固定顺序）
    pub const ALL: [DataType; 7] = [
        DataType::Payments,
        DataType::Receipts,
        DataType::Policies,
        DataType::Claims,
        DataType::Customers,
        DataType::Agents,
        DataType::AuditLogs,
    ];

    /// 标签字符串（同时用作表名与上传子目录名）
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Payments => "payments",
            DataType::Receipts => "receipts",
            DataType::Policies => "policies",
            DataType::Claims => "claims",
            DataType::Customers => "customers",
            DataType::Agents => "agents",
            DataType::AuditLogs => "audit_logs",
        }
    }

    /// 业务主键的合成前缀
    pub fn identifier_prefix(&self) -> &'static str {
        match self {
            DataType::Payments => "PAY",
            DataType::Receipts => "RCP",
            DataType::Policies => "POL",
            DataType::Claims => "CLM",
            DataType::Customers => "CUST",
            DataType::Agents => "AGT",
            DataType::AuditLogs => "LOG",
        }
    }

    /// 业务主键列名
    pub fn business_key(&self) -> &'static str {
        match self {
            DataType::Payments => "payment_id",
            DataType::Receipts => "receipt_number",
            DataType::Policies => "policy_number",
            DataType::Claims => "claim_number",
            DataType::Customers => "customer_id",
            DataType::Agents => "agent_id",
            DataType::AuditLogs => "log_id",
        }
    }

    /// 已知标签列表（用于错误提示）
    pub fn allowed_tags() -> String {
        DataType::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = UnknownDataType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownDataType(s.to_string()))
    }
}

// ==========================================
// 导入状态 (Import Status)
// ==========================================
// 序列化格式: snake_case (与对外返回一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    Completed,           // 全部行成功
    CompletedWithErrors, // 存在行级错误（含全部失败）
    Failed,              // 致命错误，未处理任何行
}

impl ImportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStatus::Completed => "completed",
            ImportStatus::CompletedWithErrors => "completed_with_errors",
            ImportStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 审计级别 (Audit Severity)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSeverity {
    Info,
    Warning,
}

impl AuditSeverity {
    /// 按错误数判定级别
    pub fn from_error_count(error_count: usize) -> Self {
        if error_count == 0 {
            AuditSeverity::Info
        } else {
            AuditSeverity::Warning
        }
    }

    /// severity 列取值
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditSeverity::Info => "info",
            AuditSeverity::Warning => "warning",
        }
    }

    /// status 列取值
    pub fn status_str(&self) -> &'static str {
        match self {
            AuditSeverity::Info => "success",
            AuditSeverity::Warning => "warning",
        }
    }
}
