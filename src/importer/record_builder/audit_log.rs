// ==========================================
// 审计日志记录构建器（文件导入的审计数据）
// ==========================================

use crate::domain::field_table::{FieldSpec, AUDIT_LOG_FIELDS};
use crate::domain::import::RawRow;
use crate::domain::records::{AuditLogRecord, TypedRecord};
use crate::domain::types::DataType;
use crate::importer::coercion::{BuildContext, FieldReader, ValidationError};
use crate::importer::importer_trait::RecordBuilder;

pub struct AuditLogBuilder;

impl RecordBuilder for AuditLogBuilder {
    fn data_type(&self) -> DataType {
        DataType::AuditLogs
    }

    fn fields(&self) -> &'static [FieldSpec] {
        AUDIT_LOG_FIELDS
    }

    fn build(&self, row: &RawRow, ctx: &mut BuildContext) -> Result<TypedRecord, ValidationError> {
        let mut r = FieldReader::new(row, ctx);

        Ok(TypedRecord::AuditLog(AuditLogRecord {
            log_id: r.identifier("log_id", DataType::AuditLogs.identifier_prefix()),
            session_id: r.optional_text("session_id"),
            user_id: r.optional_text("user_id"),
            user_email: r.optional_text("user_email"),
            user_role: r.optional_text("user_role"),
            action: r.text_or("action", "UNKNOWN"),
            resource_type: r.text_or("resource_type", "unknown"),
            resource_id: r.optional_text("resource_id"),
            event_timestamp: r.timestamp("event_timestamp")?,
            event_type: r.text_or("event_type", "user_action"),
            severity: r.text_or("severity", "info"),
            ip_address: r.optional_text("ip_address"),
            user_agent: r.optional_text("user_agent"),
            request_method: r.optional_text("request_method"),
            request_url: r.optional_text("request_url"),
            description: r.optional_text("description"),
            error_message: r.optional_text("error_message"),
            status: r.text_or("status", "success"),
            is_sensitive: r.flag("is_sensitive"),
            requires_review: r.flag("requires_review"),
            correlation_id: r.optional_text("correlation_id"),
            parent_log_id: r.optional_text("parent_log_id"),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::record_builder::test_support::{ctx, row};

    #[test]
    fn test_audit_log_defaults() {
        let mut ctx = ctx();
        let TypedRecord::AuditLog(log) = AuditLogBuilder
            .build(&row(&[("action", "LOGIN"), ("is_sensitive", "true")]), &mut ctx)
            .unwrap()
        else {
            panic!("expected audit log");
        };

        assert!(log.log_id.starts_with("LOG-"));
        assert_eq!(log.action, "LOGIN");
        assert_eq!(log.resource_type, "unknown");
        assert_eq!(log.event_type, "user_action");
        assert_eq!(log.severity, "info");
        assert_eq!(log.status, "success");
        assert!(log.is_sensitive);
        assert!(!log.requires_review);
    }
}
