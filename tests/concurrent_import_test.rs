// ==========================================
// 并发导入测试
// ==========================================
// 测试目标: 验证多个导入并发执行时互不影响
// ==========================================

mod test_helpers;

use insurance_import::domain::{DataType, ImportStatus};
use insurance_import::importer::{ImportOrchestrator, ImportScheduler};
use insurance_import::logging;
use insurance_import::repository::{RecordStore, SqliteRecordStore};
use insurance_import::ImportRequest;
use std::sync::Arc;
use std::time::{Duration, Instant};
use test_helpers::{csv_request, payment_csv};
use tracing::Span;

/// 轮询直到记录数达到期望值（最多 5 秒）
async fn wait_for_count<S: RecordStore>(store: &S, data_type: DataType, expected: usize) -> usize {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let count = store.count_records(data_type).await.unwrap();
        if count >= expected || Instant::now() > deadline {
            return count;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn test_batch_import_multiple_files() {
    // 初始化日志系统
    logging::init_test();

    let (_tmp, db_path) = test_helpers::create_test_db().unwrap();
    let store = Arc::new(SqliteRecordStore::new(&db_path).unwrap());
    let orch = ImportOrchestrator::new(Arc::clone(&store), Span::none());

    // 3 个付款文件（主键区间不重叠）
    let requests: Vec<ImportRequest> = (0..3)
        .map(|batch| {
            let content = payment_csv(50).replace("PAY-", &format!("PAY-{}-", batch));
            csv_request("payments", &content)
        })
        .collect();

    let start = Instant::now();
    let results = orch.process_many(&requests).await;
    let elapsed = start.elapsed();

    assert_eq!(results.len(), 3);
    for result in &results {
        let result = result.as_ref().unwrap();
        assert_eq!(result.status, ImportStatus::Completed);
        assert_eq!(result.records_imported, 50);
    }

    assert_eq!(store.count_records(DataType::Payments).await.unwrap(), 150);
    assert_eq!(store.count_records(DataType::AuditLogs).await.unwrap(), 3);
    tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "批量导入耗时");
}

#[tokio::test]
async fn test_failed_import_does_not_affect_siblings() {
    let store = Arc::new(SqliteRecordStore::in_memory().unwrap());
    let orch = ImportOrchestrator::new(Arc::clone(&store), Span::none());

    let requests = vec![
        csv_request("agents", "agent_id\nAGT-1\nAGT-2\n"),
        // 与第一个请求主键冲突，整批回滚
        csv_request("agents", "agent_id\nAGT-3\nAGT-1\n"),
        csv_request("customers", "customer_id\nCUST-1\n"),
    ];

    let results = orch.process_many(&requests).await;

    let failed = results.iter().filter(|r| r.is_err()).count();
    assert_eq!(failed, 1);
    assert_eq!(store.count_records(DataType::Agents).await.unwrap(), 2);
    assert_eq!(store.count_records(DataType::Customers).await.unwrap(), 1);
    // 提交失败同样写审计
    assert_eq!(store.count_records(DataType::AuditLogs).await.unwrap(), 3);
}

#[tokio::test]
async fn test_scheduler_runs_detached_imports() {
    let store = Arc::new(SqliteRecordStore::in_memory().unwrap());
    let orch = Arc::new(ImportOrchestrator::new(Arc::clone(&store), Span::none()));
    let scheduler = ImportScheduler::new(orch, 2, Span::none());

    let mut handles = Vec::new();
    for batch in 0..4 {
        let content = payment_csv(10).replace("PAY-", &format!("PAY-S{}-", batch));
        handles.push(scheduler.schedule(csv_request("payments", &content)));
    }

    assert!(handles.iter().all(|h| h.status == "processing"));
    let ids: std::collections::HashSet<&str> =
        handles.iter().map(|h| h.import_id.as_str()).collect();
    assert_eq!(ids.len(), 4);

    assert_eq!(wait_for_count(store.as_ref(), DataType::Payments, 40).await, 40);
    assert_eq!(wait_for_count(store.as_ref(), DataType::AuditLogs, 4).await, 4);
}

#[tokio::test]
async fn test_scheduler_survives_fatal_import() {
    let store = Arc::new(SqliteRecordStore::in_memory().unwrap());
    let orch = Arc::new(ImportOrchestrator::new(Arc::clone(&store), Span::none()));
    let scheduler = ImportScheduler::new(orch, 1, Span::none());

    scheduler.schedule(ImportRequest::new("claims", b"not a spreadsheet".to_vec()));
    scheduler.schedule(csv_request("claims", "claim_number,claim_amount\nCLM-1,10\n"));

    assert_eq!(wait_for_count(store.as_ref(), DataType::Claims, 1).await, 1);
    // 格式错误的导入不写审计
    assert_eq!(wait_for_count(store.as_ref(), DataType::AuditLogs, 1).await, 1);
}
