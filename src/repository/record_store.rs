// ==========================================
// 保险业务数据导入 - 记录存储 Trait
// ==========================================
// 职责: 定义业务记录的数据访问接口（不包含业务逻辑）
// 红线: Repository 不含导入规则，只做写入与查询
// ==========================================

use crate::domain::records::TypedRecord;
use crate::domain::types::DataType;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_PAGE_SIZE: usize = 20;

// ==========================================
// RecordQuery - 分页查询参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordQuery {
    pub page: usize,                      // 1-based 页码
    pub size: usize,                      // 每页条数
    pub filters: BTreeMap<String, String>, // 列名 → 等值过滤
}

impl RecordQuery {
    pub fn new(page: usize, size: usize) -> Self {
        Self {
            page,
            size,
            filters: BTreeMap::new(),
        }
    }

    pub fn with_filter(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(column.into(), value.into());
        self
    }

    /// 偏移量（页码 < 1 按第 1 页处理）
    pub fn offset(&self) -> usize {
        self.page.max(1).saturating_sub(1) * self.size
    }
}

impl Default for RecordQuery {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

// ==========================================
// Page - 分页结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub size: usize,
    pub pages: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize, page: usize, size: usize) -> Self {
        let pages = if size == 0 { 0 } else { total.div_ceil(size) };
        Self {
            items,
            total,
            page,
            size,
            pages,
        }
    }
}

// ==========================================
// RecordStore Trait
// ==========================================
// 用途: 七类业务记录的写入与读取
// 实现者: SqliteRecordStore（使用 rusqlite）
#[async_trait]
pub trait RecordStore: Send + Sync {
    // ===== 写入 =====

    /// 批量插入记录（单事务）
    ///
    /// # 返回
    /// - Ok(usize): 插入条数
    /// - Err: 数据库错误（整个事务回滚，视为零条写入）
    async fn insert_many(&self, records: Vec<TypedRecord>) -> RepositoryResult<usize>;

    /// 插入单条记录（审计条目）
    async fn insert_one(&self, record: TypedRecord) -> RepositoryResult<()>;

    // ===== 查询 =====

    /// 统计某数据类型的记录数
    async fn count_records(&self, data_type: DataType) -> RepositoryResult<usize>;

    /// 分页查询（过滤列必须在字段表中声明；偏移量越界返回 ValidationError）
    async fn list_records(
        &self,
        data_type: DataType,
        query: RecordQuery,
    ) -> RepositoryResult<Page<serde_json::Value>>;

    /// 按业务主键查询单条记录
    async fn find_by_business_id(
        &self,
        data_type: DataType,
        business_id: &str,
    ) -> RepositoryResult<Option<serde_json::Value>>;
}
