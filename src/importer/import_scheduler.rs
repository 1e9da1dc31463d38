// ==========================================
// 保险业务数据导入 - 后台导入调度
// ==========================================
// 职责: 将导入提交到 tokio 运行时后台执行（fire-and-forget）
// 约束:
// - 调用方只拿到"已调度"句柄，无法等待/取消/查询进度
// - 并发导入数由信号量限制
// ==========================================

use crate::domain::import::{ImportRequest, ImportResult};
use crate::importer::import_orchestrator::ImportOrchestrator;
use crate::repository::RecordStore;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, info_span, warn, Instrument, Span};
use uuid::Uuid;

pub const DEFAULT_MAX_CONCURRENT_IMPORTS: usize = 4;

// ==========================================
// ScheduledImport - 已调度句柄
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledImport {
    pub import_id: String,
    pub data_type: String,
    pub status: String, // 固定为 "processing"
    pub scheduled_at: NaiveDateTime,
}

// ==========================================
// ImportScheduler
// ==========================================
pub struct ImportScheduler<S: RecordStore + 'static> {
    orchestrator: Arc<ImportOrchestrator<S>>,
    permits: Arc<Semaphore>,
    span: Span,
}

impl<S: RecordStore + 'static> Clone for ImportScheduler<S> {
    fn clone(&self) -> Self {
        Self {
            orchestrator: Arc::clone(&self.orchestrator),
            permits: Arc::clone(&self.permits),
            span: self.span.clone(),
        }
    }
}

impl<S: RecordStore + 'static> ImportScheduler<S> {
    pub fn new(orchestrator: Arc<ImportOrchestrator<S>>, max_concurrent: usize, span: Span) -> Self {
        Self {
            orchestrator,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            span,
        }
    }

    pub fn orchestrator(&self) -> &Arc<ImportOrchestrator<S>> {
        &self.orchestrator
    }

    /// 后台调度一次导入
    ///
    /// 说明：需在 tokio 运行时内调用
    pub fn schedule(&self, request: ImportRequest) -> ScheduledImport {
        let handle = ScheduledImport {
            import_id: Uuid::new_v4().to_string(),
            data_type: request.data_type.clone(),
            status: "processing".to_string(),
            scheduled_at: Utc::now().naive_utc(),
        };

        let task_span = info_span!(
            parent: &self.span,
            "scheduled_import",
            import_id = %handle.import_id,
            data_type = %handle.data_type
        );

        let orchestrator = Arc::clone(&self.orchestrator);
        let permits = Arc::clone(&self.permits);

        tokio::spawn(
            async move {
                let _permit = match permits.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        warn!(error = %e, "调度器已关闭，放弃导入");
                        return;
                    }
                };

                let result = match orchestrator.process(&request).await {
                    Ok(result) => result,
                    Err(e) => {
                        error!(error = %e, "后台导入失败");
                        ImportResult::failed(e.to_string())
                    }
                };

                info!(
                    status = %result.status,
                    records_imported = result.records_imported,
                    errors = result.errors.len(),
                    failure_reason = result.failure_reason.as_deref().unwrap_or(""),
                    "后台导入结束"
                );
            }
            .instrument(task_span),
        );

        info!(
            parent: &self.span,
            import_id = %handle.import_id,
            data_type = %handle.data_type,
            "导入已调度"
        );

        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::DataType;
    use crate::repository::SqliteRecordStore;
    use std::time::Duration;

    #[tokio::test]
    async fn test_schedule_returns_processing_handle_and_runs() {
        let store = Arc::new(SqliteRecordStore::in_memory().unwrap());
        let orchestrator = Arc::new(ImportOrchestrator::new(Arc::clone(&store), Span::none()));
        let scheduler = ImportScheduler::new(orchestrator, 2, Span::none());

        let handle = scheduler.schedule(
            ImportRequest::new("receipts", b"receipt_number,amount\nRCP-1,5\n".to_vec())
                .with_file_name("r.csv"),
        );
        assert_eq!(handle.status, "processing");
        assert_eq!(handle.data_type, "receipts");

        let mut imported = 0;
        for _ in 0..100 {
            imported = store.count_records(DataType::Receipts).await.unwrap();
            if imported == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(imported, 1);
    }
}
