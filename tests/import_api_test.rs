// ==========================================
// ImportApi 集成测试
// ==========================================
// 测试目标: 上传校验 / 上传目录管理 / 后台导入 / 分页查询
// ==========================================

mod test_helpers;

use insurance_import::api::{ApiError, ImportApi};
use insurance_import::config::{config_keys, ConfigManager};
use insurance_import::domain::DataType;
use insurance_import::importer::{ImportOrchestrator, ImportScheduler};
use insurance_import::repository::{RecordStore, SqliteRecordStore};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use test_helpers::payment_csv;
use tracing::Span;

struct TestEnv {
    api: ImportApi<SqliteRecordStore, ConfigManager>,
    store: Arc<SqliteRecordStore>,
    config: Arc<ConfigManager>,
    upload_dir: TempDir,
}

fn setup() -> TestEnv {
    let store = Arc::new(SqliteRecordStore::in_memory().unwrap());
    let config = Arc::new(ConfigManager::from_connection(store.connection()).unwrap());

    let upload_dir = TempDir::new().unwrap();
    config
        .set_global_config_value(
            config_keys::UPLOAD_DIRECTORY,
            upload_dir.path().to_str().unwrap(),
        )
        .unwrap();

    let orch = Arc::new(ImportOrchestrator::new(Arc::clone(&store), Span::none()));
    let scheduler = ImportScheduler::new(orch, 2, Span::none());
    let api = ImportApi::new(Arc::clone(&store), Arc::clone(&config), scheduler);

    TestEnv {
        api,
        store,
        config,
        upload_dir,
    }
}

async fn wait_for_count(store: &SqliteRecordStore, data_type: DataType, expected: usize) -> usize {
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
async fn test_upload_saves_file_and_imports_in_background() {
    let env = setup();

    let content = payment_csv(5).into_bytes();
    let size = content.len() as u64;
    let response = env
        .api
        .upload_file("payments", "march.csv", content)
        .await
        .unwrap();

    assert_eq!(response.status, "processing");
    assert_eq!(response.records_imported, 0);
    assert_eq!(response.size, size);
    assert_eq!(
        response.message,
        "File uploaded successfully and is being processed for payments data"
    );
    assert!(response.filename.starts_with("payments_"));
    assert!(response.filename.ends_with("_march.csv"));

    let saved = env.upload_dir.path().join("payments").join(&response.filename);
    assert!(saved.exists());

    assert_eq!(wait_for_count(&env.store, DataType::Payments, 5).await, 5);
    assert_eq!(wait_for_count(&env.store, DataType::AuditLogs, 1).await, 1);
}

#[tokio::test]
async fn test_upload_rejects_bad_type_extension_and_size() {
    let env = setup();

    let err = env
        .api
        .upload_file("invoices", "a.csv", b"x\n1\n".to_vec())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(ref m) if m.starts_with("Invalid data type")));

    let err = env
        .api
        .upload_file("payments", "notes.txt", b"x\n1\n".to_vec())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(ref m) if m.contains(".xlsx")));

    env.config
        .set_global_config_value(config_keys::MAX_FILE_SIZE_BYTES, "8")
        .unwrap();
    let err = env
        .api
        .upload_file("payments", "big.CSV", vec![b'a'; 9])
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::PayloadTooLarge { size: 9, limit: 8 }));

    // 未写入任何文件
    assert!(!env.upload_dir.path().join("payments").exists());
}

#[tokio::test]
async fn test_upload_status_listing_and_delete() {
    let env = setup();

    let status = env.api.get_upload_status("claims").await.unwrap();
    assert_eq!(status.status, "no_uploads");
    assert!(status.files.is_empty());

    let response = env
        .api
        .upload_file("claims", "claims.csv", b"claim_number\nCLM-1\n".to_vec())
        .await
        .unwrap();

    let status = env.api.get_upload_status("claims").await.unwrap();
    assert_eq!(status.status, "completed");
    assert_eq!(status.files.len(), 1);
    assert_eq!(status.files[0].filename, response.filename);

    let all = env.api.list_all_uploads().await.unwrap();
    assert_eq!(all.len(), 7);
    assert_eq!(all["claims"].count, 1);
    assert_eq!(all["policies"].count, 0);

    let message = env
        .api
        .delete_upload("claims", &response.filename)
        .await
        .unwrap();
    assert_eq!(message, format!("File {} deleted successfully", response.filename));

    let err = env
        .api
        .delete_upload("claims", &response.filename)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = env
        .api
        .delete_upload("claims", "../claims.csv")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn test_list_and_get_records() {
    let env = setup();
    env.api
        .upload_file("payments", "p.csv", payment_csv(25).into_bytes())
        .await
        .unwrap();
    assert_eq!(wait_for_count(&env.store, DataType::Payments, 25).await, 25);

    let page = env
        .api
        .list_records("payments", None, None, BTreeMap::new())
        .await
        .unwrap();
    assert_eq!(page.total, 25);
    assert_eq!(page.size, 20);
    assert_eq!(page.items.len(), 20);
    assert_eq!(page.pages, 2);

    let page = env
        .api
        .list_records("payments", Some(2), Some(20), BTreeMap::new())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 5);

    let mut filters = BTreeMap::new();
    filters.insert("payment_id".to_string(), "PAY-000003".to_string());
    let page = env
        .api
        .list_records("payments", Some(1), Some(10), filters)
        .await
        .unwrap();
    assert_eq!(page.total, 1);

    let err = env
        .api
        .list_records("payments", Some(0), None, BTreeMap::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let err = env
        .api
        .list_records("payments", Some(1), Some(101), BTreeMap::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let record = env.api.get_record("payments", "PAY-000003").await.unwrap();
    assert_eq!(record["currency"], "USD");
    assert_eq!(record["amount"], 103.5);

    let err = env.api.get_record("payments", "PAY-999999").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn test_list_records_honors_configured_max_and_rejects_huge_page() {
    let env = setup();
    env.api
        .upload_file("payments", "p.csv", payment_csv(120).into_bytes())
        .await
        .unwrap();
    assert_eq!(wait_for_count(&env.store, DataType::Payments, 120).await, 120);

    env.config
        .set_global_config_value(config_keys::MAX_PAGE_SIZE, "500")
        .unwrap();
    let page = env
        .api
        .list_records("payments", Some(1), Some(150), BTreeMap::new())
        .await
        .unwrap();
    assert_eq!(page.size, 150);
    assert_eq!(page.items.len(), 120);

    let err = env
        .api
        .list_records("payments", Some(usize::MAX), Some(20), BTreeMap::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));
}
