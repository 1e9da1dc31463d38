// ==========================================
// 保险业务数据导入 - 导入编排器
// ==========================================
// 职责: 整合导入流程，从文件字节到数据库
// 流程: 读取 → 列归一化 → 解析构建器 → 逐行构建 → 批量提交 → 审计
// 约束:
// - 单行失败只记 RowError，不影响其他行
// - 提交为唯一原子操作；失败视为零条导入
// - 进入逐行阶段后恰好写一条审计（提交失败也写）
// ==========================================

use crate::domain::import::{ImportRequest, ImportResult, RowError};
use crate::domain::records::TypedRecord;
use crate::importer::audit_emitter::AuditEmitter;
use crate::importer::coercion::BuildContext;
use crate::importer::column_normalizer::ColumnNormalizer;
use crate::importer::error::{ImportError, ImporterResult};
use crate::importer::file_parser::UniversalReader;
use crate::importer::importer_trait::SpreadsheetReader;
use crate::importer::schema_registry;
use crate::repository::RecordStore;
use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn, Instrument, Span};

// ==========================================
// ImportOrchestrator - 导入编排器
// ==========================================
pub struct ImportOrchestrator<S: RecordStore> {
    // 导入组件
    reader: Box<dyn SpreadsheetReader>,
    normalizer: ColumnNormalizer,

    // 数据访问层
    store: Arc<S>,
    audit: AuditEmitter<S>,

    // 注入的日志上下文
    span: Span,
}

impl<S: RecordStore> ImportOrchestrator<S> {
    /// 创建编排器（默认读取器）
    pub fn new(store: Arc<S>, span: Span) -> Self {
        Self::with_reader(store, Box::new(UniversalReader), span)
    }

    /// 创建编排器（指定读取器）
    pub fn with_reader(store: Arc<S>, reader: Box<dyn SpreadsheetReader>, span: Span) -> Self {
        Self {
            reader,
            normalizer: ColumnNormalizer::new(),
            audit: AuditEmitter::new(Arc::clone(&store), span.clone()),
            store,
            span,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// 执行一次导入
    ///
    /// # 返回
    /// - Ok(ImportResult): completed / completed_with_errors
    /// - Err(Format / UnsupportedType): 未进入逐行阶段，不写审计
    /// - Err(Storage): 提交失败，零条导入，已尝试写审计
    pub async fn process(&self, request: &ImportRequest) -> ImporterResult<ImportResult> {
        let span = self.span.clone();
        self.process_inner(request).instrument(span).await
    }

    async fn process_inner(&self, request: &ImportRequest) -> ImporterResult<ImportResult> {
        let start_time = Instant::now();
        info!(
            data_type = %request.data_type,
            file_name = request.file_name.as_deref().unwrap_or("-"),
            bytes = request.content.len(),
            "开始导入"
        );

        // === 步骤 1: 读取文件 ===
        let raw_rows = self
            .reader
            .read(&request.content, request.format_hint())
            .map_err(|e| {
                error!(error = %e, "文件解析失败");
                e
            })?;

        // === 步骤 2: 列归一化 ===
        let rows = self.normalizer.normalize(raw_rows);
        info!(total_rows = rows.len(), "文件解析完成");

        // === 步骤 3: 解析构建器 ===
        let builder = schema_registry::resolve(&request.data_type).map_err(|e| {
            error!(error = %e, "数据类型不受支持");
            e
        })?;
        let data_type = builder.data_type();

        // === 步骤 4: 逐行构建 ===
        let mut ctx = BuildContext::new(Utc::now().naive_utc());
        let mut staged: Vec<TypedRecord> = Vec::with_capacity(rows.len());
        let mut errors: Vec<RowError> = Vec::new();

        for row in &rows {
            match builder.build(row, &mut ctx) {
                Ok(record) => staged.push(record),
                Err(e) => {
                    warn!(row_number = row.row_number, error = %e, "行构建失败");
                    errors.push(RowError::new(row.row_number, e.to_string()));
                }
            }
        }

        debug!(staged = staged.len(), failed = errors.len(), "逐行构建完成");

        // === 步骤 5: 批量提交 ===
        let staged_count = staged.len();
        let imported = if staged.is_empty() {
            0
        } else {
            match self.store.insert_many(staged).await {
                Ok(count) => count,
                Err(e) => {
                    error!(error = %e, staged = staged_count, "批量提交失败，整批回滚");
                    // 提交失败: 已构建的行同样计为错误
                    self.audit
                        .emit(data_type, 0, errors.len() + staged_count)
                        .await;
                    return Err(ImportError::Storage(e));
                }
            }
        };

        // === 步骤 6: 审计 ===
        self.audit.emit(data_type, imported, errors.len()).await;

        let result = ImportResult::from_rows(imported, errors);
        info!(
            data_type = %data_type,
            records_imported = result.records_imported,
            errors = result.errors.len(),
            status = %result.status,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "导入完成"
        );

        Ok(result)
    }

    /// 并发执行多个导入（互不影响）
    pub async fn process_many(
        &self,
        requests: &[ImportRequest],
    ) -> Vec<ImporterResult<ImportResult>> {
        info!(count = requests.len(), "开始批量导入");

        let results = join_all(requests.iter().map(|request| self.process(request))).await;

        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        info!(
            total = results.len(),
            succeeded = succeeded,
            failed = results.len() - succeeded,
            "批量导入完成"
        );

        results
    }
}
