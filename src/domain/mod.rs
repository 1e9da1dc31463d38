// ==========================================
// 保险业务数据导入 - 领域模型层
// ==========================================
// 职责: 定义业务记录实体、字段表、导入管道类型
// 红线: 不含数据访问逻辑,不含导入流程逻辑
// ==========================================

pub mod field_table;
pub mod import;
pub mod records;
pub mod types;

// 重导出核心类型
pub use field_table::{fields_for, find_field, FieldKind, FieldSpec};
pub use import::{
    AuditEntry, FileFormat, ImportRequest, ImportResult, RawCell, RawRow, RowError,
};
pub use records::{
    AgentRecord, AuditLogRecord, ClaimRecord, CustomerRecord, PaymentRecord, PolicyRecord,
    ReceiptRecord, TypedRecord,
};
pub use types::{AuditSeverity, DataType, ImportStatus, UnknownDataType};
