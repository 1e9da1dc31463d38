// ==========================================
// 保险业务数据导入 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod record_store;
pub mod record_store_impl;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use record_store::{Page, RecordQuery, RecordStore, DEFAULT_PAGE_SIZE};
pub use record_store_impl::SqliteRecordStore;
