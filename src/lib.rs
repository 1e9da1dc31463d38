// ==========================================
// 保险业务数据导入 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + tokio
// 系统定位: 表格文件 → 七类业务记录的批量导入管道
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 表格解析/行构建/编排/审计
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 上传与查询接口
pub mod api;

// 应用层 - 状态装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DataType, ImportStatus};

// 领域实体
pub use domain::{
    AgentRecord, AuditEntry, AuditLogRecord, ClaimRecord, CustomerRecord, ImportRequest,
    ImportResult, PaymentRecord, PolicyRecord, ReceiptRecord, RowError, TypedRecord,
};

// 导入层
pub use importer::{AuditEmitter, ImportError, ImportOrchestrator, ImportScheduler};

// 仓储
pub use repository::{RecordStore, SqliteRecordStore};

// API
pub use api::ImportApi;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "保险业务数据导入";
