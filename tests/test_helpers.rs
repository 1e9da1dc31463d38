// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、CSV 构造、故障存储替身
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use insurance_import::domain::{DataType, TypedRecord};
use insurance_import::importer::ImportOrchestrator;
use insurance_import::repository::{
    Page, RecordQuery, RecordStore, RepositoryError, RepositoryResult, SqliteRecordStore,
};
use insurance_import::ImportRequest;
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::Span;

/// 创建临时测试数据库（已建表）
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是 UTF-8")?
        .to_string();

    SqliteRecordStore::new(&db_path)?;

    Ok((temp_file, db_path))
}

/// 内存存储 + 编排器
pub fn memory_orchestrator() -> ImportOrchestrator<SqliteRecordStore> {
    let store = Arc::new(SqliteRecordStore::in_memory().expect("内存库初始化失败"));
    ImportOrchestrator::new(store, Span::none())
}

/// 由表头与数据行构造 CSV 文本
pub fn csv(headers: &[&str], rows: &[&[&str]]) -> String {
    let mut out = headers.join(",");
    out.push('\n');
    for row in rows {
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// CSV 导入请求（带 .csv 文件名提示）
pub fn csv_request(data_type: &str, content: &str) -> ImportRequest {
    ImportRequest::new(data_type, content.as_bytes().to_vec())
        .with_file_name(format!("{}.csv", data_type))
}

/// N 行付款数据
pub fn payment_csv(count: usize) -> String {
    let mut out = String::from("Payment ID,Amount,Currency,Payment Date\n");
    for i in 0..count {
        out.push_str(&format!("PAY-{:06},{}.50,USD,2024-03-{:02}\n", i, 100 + i, i % 28 + 1));
    }
    out
}

// ==========================================
// FlakyStore - 故障注入存储替身
// ==========================================
// 包装真实存储；按开关让批量提交或单条写入失败
pub struct FlakyStore {
    pub inner: SqliteRecordStore,
    pub fail_batch: bool,
    pub fail_single: bool,
    pub insert_one_calls: AtomicUsize,
}

impl FlakyStore {
    pub fn new(fail_batch: bool, fail_single: bool) -> Self {
        Self {
            inner: SqliteRecordStore::in_memory().expect("内存库初始化失败"),
            fail_batch,
            fail_single,
            insert_one_calls: AtomicUsize::new(0),
        }
    }

    pub fn insert_one_calls(&self) -> usize {
        self.insert_one_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for FlakyStore {
    async fn insert_many(&self, records: Vec<TypedRecord>) -> RepositoryResult<usize> {
        if self.fail_batch {
            return Err(RepositoryError::DatabaseTransactionError(
                "disk I/O error".to_string(),
            ));
        }
        self.inner.insert_many(records).await
    }

    async fn insert_one(&self, record: TypedRecord) -> RepositoryResult<()> {
        self.insert_one_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_single {
            return Err(RepositoryError::DatabaseQueryError("database is locked".to_string()));
        }
        self.inner.insert_one(record).await
    }

    async fn count_records(&self, data_type: DataType) -> RepositoryResult<usize> {
        self.inner.count_records(data_type).await
    }

    async fn list_records(
        &self,
        data_type: DataType,
        query: RecordQuery,
    ) -> RepositoryResult<Page<serde_json::Value>> {
        self.inner.list_records(data_type, query).await
    }

    async fn find_by_business_id(
        &self,
        data_type: DataType,
        business_id: &str,
    ) -> RepositoryResult<Option<serde_json::Value>> {
        self.inner.find_by_business_id(data_type, business_id).await
    }
}
