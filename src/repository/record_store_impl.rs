// ==========================================
// 保险业务数据导入 - 记录存储 SQLite 实现
// ==========================================
// 职责: 按字段表落库与解码（使用 rusqlite）
// 红线: Repository 不含导入规则，只做写入与查询
// 约束: 所有查询使用参数化；列名只来自静态字段表
// ==========================================

use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use crate::domain::field_table::{fields_for, find_field, FieldKind, FieldSpec};
use crate::domain::records::TypedRecord;
use crate::domain::types::DataType;
use crate::importer::coercion::is_truthy;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::record_store::{Page, RecordQuery, RecordStore};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection, Row, Transaction};
use serde_json::{Map, Value as JsonValue};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

// 存储层附加列（位于字段表各列之前）
const META_COLUMNS: [&str; 4] = ["id", "uuid", "created_at", "updated_at"];

// ==========================================
// SqliteRecordStore
// ==========================================
pub struct SqliteRecordStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRecordStore {
    /// 创建新的存储实例（自动建表）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 内存数据库（测试与一次性导入）
    pub fn in_memory() -> RepositoryResult<Self> {
        let conn = Connection::open_in_memory()?;
        configure_sqlite_connection(&conn)?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（与 ConfigManager 共享连接）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            ensure_schema(&guard)?;
        }

        Ok(Self { conn })
    }

    /// 共享连接句柄
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn select_columns(fields: &[FieldSpec]) -> String {
        META_COLUMNS
            .iter()
            .copied()
            .chain(fields.iter().map(|f| f.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// 在事务中插入单条记录
    fn insert_tx(tx: &Transaction, record: &TypedRecord, now: &str) -> RepositoryResult<()> {
        let data_type = record.data_type();
        let fields = fields_for(data_type);
        let mut field_map = record.to_field_map()?;

        let mut columns = vec!["uuid", "created_at", "updated_at"];
        let mut values = vec![
            SqlValue::Text(Uuid::new_v4().to_string()),
            SqlValue::Text(now.to_string()),
            SqlValue::Text(now.to_string()),
        ];

        for field in fields {
            let value = field_map.remove(field.name).unwrap_or(JsonValue::Null);
            columns.push(field.name);
            values.push(json_to_sql(field, value)?);
        }

        let placeholders = (1..=columns.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            data_type.as_str(),
            columns.join(", "),
            placeholders
        );

        tx.execute(&sql, params_from_iter(values))?;
        Ok(())
    }

    /// 构造 WHERE 子句（过滤列必须已声明）
    fn build_filter(
        data_type: DataType,
        query: &RecordQuery,
    ) -> RepositoryResult<(String, Vec<SqlValue>)> {
        let mut clauses = Vec::new();
        let mut values = Vec::new();

        for (column, raw) in &query.filters {
            let field = find_field(data_type, column).ok_or_else(|| {
                RepositoryError::ValidationError(format!(
                    "unknown filter column '{}' for {}",
                    column, data_type
                ))
            })?;

            values.push(match field.kind {
                FieldKind::Flag => SqlValue::Integer(is_truthy(raw) as i64),
                _ => SqlValue::Text(raw.clone()),
            });
            clauses.push(format!("{} = ?{}", field.name, values.len()));
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };

        Ok((where_clause, values))
    }
}

/// JSON 字段值 → SQLite 值
fn json_to_sql(field: &FieldSpec, value: JsonValue) -> RepositoryResult<SqlValue> {
    let converted = match value {
        JsonValue::Null => SqlValue::Null,
        JsonValue::Bool(b) => SqlValue::Integer(b as i64),
        JsonValue::Number(n) => match field.kind {
            FieldKind::Integer | FieldKind::Flag => {
                SqlValue::Integer(n.as_i64().ok_or_else(|| RepositoryError::FieldValueError {
                    field: field.name.to_string(),
                    message: format!("expected integer, got {}", n),
                })?)
            }
            _ => SqlValue::Real(n.as_f64().ok_or_else(|| RepositoryError::FieldValueError {
                field: field.name.to_string(),
                message: format!("expected number, got {}", n),
            })?),
        },
        JsonValue::String(s) => SqlValue::Text(s),
        other => {
            return Err(RepositoryError::FieldValueError {
                field: field.name.to_string(),
                message: format!("unsupported value {}", other),
            })
        }
    };

    Ok(converted)
}

/// SQLite 列值 → JSON（按字段类型解码）
fn sql_to_json(kind: Option<FieldKind>, value: ValueRef<'_>) -> JsonValue {
    match value {
        ValueRef::Null => JsonValue::Null,
        ValueRef::Integer(i) => match kind {
            Some(FieldKind::Flag) => JsonValue::Bool(i != 0),
            Some(FieldKind::Number) => serde_json::Number::from_f64(i as f64)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            _ => JsonValue::from(i),
        },
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        ValueRef::Text(t) => JsonValue::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(_) => JsonValue::Null,
    }
}

/// 查询行 → JSON 对象
fn row_to_json(row: &Row<'_>, fields: &[FieldSpec]) -> rusqlite::Result<JsonValue> {
    let mut map = Map::new();

    for (idx, name) in META_COLUMNS.iter().enumerate() {
        map.insert(name.to_string(), sql_to_json(None, row.get_ref(idx)?));
    }

    for (offset, field) in fields.iter().enumerate() {
        let value = row.get_ref(META_COLUMNS.len() + offset)?;
        map.insert(field.name.to_string(), sql_to_json(Some(field.kind), value));
    }

    Ok(JsonValue::Object(map))
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn insert_many(&self, records: Vec<TypedRecord>) -> RepositoryResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let now = Utc::now().naive_utc().format("%Y-%m-%d %H:%M:%S").to_string();
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        for record in &records {
            Self::insert_tx(&tx, record, &now)?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        info!(
            data_type = %records[0].data_type(),
            count = records.len(),
            "批量写入完成"
        );
        Ok(records.len())
    }

    async fn insert_one(&self, record: TypedRecord) -> RepositoryResult<()> {
        let now = Utc::now().naive_utc().format("%Y-%m-%d %H:%M:%S").to_string();
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Self::insert_tx(&tx, &record, &now)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        debug!(
            data_type = %record.data_type(),
            business_id = %record.business_id(),
            "单条写入完成"
        );
        Ok(())
    }

    async fn count_records(&self, data_type: DataType) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT COUNT(*) FROM {}", data_type.as_str());
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count.max(0) as usize)
    }

    async fn list_records(
        &self,
        data_type: DataType,
        query: RecordQuery,
    ) -> RepositoryResult<Page<JsonValue>> {
        let fields = fields_for(data_type);
        let page = query.page.max(1);
        let size = query.size.max(1);
        let offset = (page - 1)
            .checked_mul(size)
            .and_then(|o| i64::try_from(o).ok())
            .ok_or_else(|| {
                RepositoryError::ValidationError(format!(
                    "page {} with size {} is out of range",
                    page, size
                ))
            })?;
        let limit = i64::try_from(size).map_err(|_| {
            RepositoryError::ValidationError(format!("page size {} is out of range", size))
        })?;
        let (where_clause, mut values) = Self::build_filter(data_type, &query)?;

        let conn = self.get_conn()?;

        let count_sql = format!("SELECT COUNT(*) FROM {}{}", data_type.as_str(), where_clause);
        let total: i64 = conn.query_row(&count_sql, params_from_iter(values.iter()), |row| {
            row.get(0)
        })?;

        let limit_idx = values.len() + 1;
        let select_sql = format!(
            "SELECT {} FROM {}{} ORDER BY id LIMIT ?{} OFFSET ?{}",
            Self::select_columns(fields),
            data_type.as_str(),
            where_clause,
            limit_idx,
            limit_idx + 1
        );
        values.push(SqlValue::Integer(limit));
        values.push(SqlValue::Integer(offset));

        let mut stmt = conn.prepare(&select_sql)?;
        let items = stmt
            .query_map(params_from_iter(values.iter()), |row| row_to_json(row, fields))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, total.max(0) as usize, page, size))
    }

    async fn find_by_business_id(
        &self,
        data_type: DataType,
        business_id: &str,
    ) -> RepositoryResult<Option<JsonValue>> {
        let fields = fields_for(data_type);
        let conn = self.get_conn()?;

        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1",
            Self::select_columns(fields),
            data_type.as_str(),
            data_type.business_key()
        );

        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query([business_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(row_to_json(row, fields)?)),
            None => Ok(None),
        }
    }
}
