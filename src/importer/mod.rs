// ==========================================
// 保险业务数据导入 - 导入层
// ==========================================
// 职责: 表格文件 → 七类业务记录
// 支持: Excel (.xlsx/.xls), CSV
// ==========================================

// 模块声明
pub mod audit_emitter;
pub mod coercion;
pub mod column_normalizer;
pub mod error;
pub mod file_parser;
pub mod import_orchestrator;
pub mod import_scheduler;
pub mod importer_trait;
pub mod record_builder;
pub mod schema_registry;

// 重导出核心类型
pub use audit_emitter::AuditEmitter;
pub use coercion::{BuildContext, IdentifierSource, ValidationError};
pub use column_normalizer::ColumnNormalizer;
pub use error::{ImportError, ImporterResult};
pub use file_parser::{CsvReader, ExcelReader, UniversalReader};
pub use import_orchestrator::ImportOrchestrator;
pub use import_scheduler::{ImportScheduler, ScheduledImport, DEFAULT_MAX_CONCURRENT_IMPORTS};
pub use schema_registry::resolve;

// 重导出 Trait 接口
pub use importer_trait::{RecordBuilder, SpreadsheetReader};
