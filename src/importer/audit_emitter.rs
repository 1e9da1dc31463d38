// ==========================================
// 保险业务数据导入 - 导入审计
// ==========================================
// 职责: 每次导入写一条 FILE_IMPORT 审计记录
// 约束: 尽力而为；写入失败只记日志，不向上传播
// ==========================================

use crate::domain::import::AuditEntry;
use crate::domain::records::TypedRecord;
use crate::domain::types::DataType;
use crate::importer::coercion::IdentifierSource;
use crate::repository::RecordStore;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn, Instrument, Span};

pub struct AuditEmitter<S: RecordStore> {
    store: Arc<S>,
    span: Span,
}

impl<S: RecordStore> AuditEmitter<S> {
    pub fn new(store: Arc<S>, span: Span) -> Self {
        Self { store, span }
    }

    /// 构造审计条目（不落库）
    pub fn entry(data_type: DataType, imported_count: usize, error_count: usize) -> AuditEntry {
        AuditEntry::new(
            format!("IMPORT-{}", IdentifierSource::upper_hex(8)),
            data_type,
            imported_count,
            error_count,
            Utc::now().naive_utc(),
        )
    }

    /// 写入审计记录
    ///
    /// # 返回
    /// - true: 写入成功
    /// - false: 写入失败（已记录 warn 日志）
    pub async fn emit(&self, data_type: DataType, imported_count: usize, error_count: usize) -> bool {
        let entry = Self::entry(data_type, imported_count, error_count);
        let log_id = entry.log_id.clone();

        let result = self
            .store
            .insert_one(TypedRecord::AuditLog(entry.into_record()))
            .instrument(self.span.clone())
            .await;

        match result {
            Ok(()) => {
                debug!(
                    parent: &self.span,
                    log_id = %log_id,
                    data_type = %data_type,
                    imported = imported_count,
                    errors = error_count,
                    "导入审计已记录"
                );
                true
            }
            Err(e) => {
                warn!(
                    parent: &self.span,
                    log_id = %log_id,
                    data_type = %data_type,
                    error = %e,
                    "导入审计写入失败（忽略）"
                );
                false
            }
        }
    }
}
