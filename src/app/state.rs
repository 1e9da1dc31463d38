// ==========================================
// 保险业务数据导入 - 应用状态
// ==========================================
// 职责: 装配共享连接、仓储、配置、导入编排/调度与API实例
// ==========================================

use std::sync::Arc;

use tracing::info_span;

use crate::api::ImportApi;
use crate::config::{ConfigManager, ImportConfigReader};
use crate::importer::{ImportOrchestrator, ImportScheduler};
use crate::repository::SqliteRecordStore;

/// 默认装配下的 ImportApi
pub type DefaultImportApi = ImportApi<SqliteRecordStore, ConfigManager>;

/// 应用状态
///
/// 所有组件共享同一个 SQLite 连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 记录仓储
    pub store: Arc<SqliteRecordStore>,

    /// 配置管理器
    pub config: Arc<ConfigManager>,

    /// 导入编排器（同步导入，调用方等待结果）
    pub orchestrator: Arc<ImportOrchestrator<SqliteRecordStore>>,

    /// 后台导入调度器
    pub scheduler: ImportScheduler<SqliteRecordStore>,

    /// 上传与查询API
    pub import_api: Arc<DefaultImportApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（":memory:" 使用内存库）
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    ///
    /// # 说明
    /// 需在 tokio 运行时内调用（读取并发配置）
    pub async fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        // 创建记录仓储（含建表）
        let store = if db_path == ":memory:" {
            SqliteRecordStore::in_memory()
        } else {
            SqliteRecordStore::new(&db_path)
        }
        .map_err(|e| format!("无法打开数据库: {}", e))?;
        let store = Arc::new(store);

        // 配置管理器共享同一连接
        let config = ConfigManager::from_connection(store.connection())
            .map_err(|e| format!("无法初始化ConfigManager: {}", e))?;
        let config = Arc::new(config);

        let max_concurrent = config
            .get_max_concurrent_imports()
            .await
            .map_err(|e| format!("无法读取并发配置: {}", e))?;

        // ==========================================
        // 导入层
        // ==========================================
        let orchestrator = Arc::new(ImportOrchestrator::new(
            Arc::clone(&store),
            info_span!("import", db_path = %db_path),
        ));
        let scheduler = ImportScheduler::new(
            Arc::clone(&orchestrator),
            max_concurrent,
            info_span!("scheduler"),
        );

        // ==========================================
        // API层
        // ==========================================
        let import_api = Arc::new(ImportApi::new(
            Arc::clone(&store),
            Arc::clone(&config),
            scheduler.clone(),
        ));

        tracing::info!(max_concurrent, "AppState初始化完成");

        Ok(Self {
            db_path,
            store,
            config,
            orchestrator,
            scheduler,
            import_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: INSURANCE_IMPORT_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("INSURANCE_IMPORT_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./insurance_import.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("insurance-import");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("insurance_import.db");
        }
    }

    path.to_string_lossy().to_string()
}
