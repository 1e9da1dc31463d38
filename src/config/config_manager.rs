// ==========================================
// 保险业务数据导入 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
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

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&conn_guard)?;
            ensure_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        self.get_config_value(key)
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 读取并解析配置值；格式错误时告警并回退默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> RepositoryResult<T>
    where
        T: FromStr + Copy + std::fmt::Display,
    {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(value) => Ok(value),
                Err(_) => {
                    tracing::warn!(
                        config_key = key,
                        raw_value = %raw,
                        default = %default,
                        "配置值格式错误，使用默认值"
                    );
                    Ok(default)
                }
            },
        }
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;

        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    // ===== 上传配置 =====

    async fn get_max_file_size_bytes(&self) -> RepositoryResult<u64> {
        self.get_parsed_or_default(config_keys::MAX_FILE_SIZE_BYTES, defaults::MAX_FILE_SIZE_BYTES)
    }

    async fn get_upload_directory(&self) -> RepositoryResult<String> {
        let value = self.get_config_or_default(config_keys::UPLOAD_DIRECTORY, defaults::UPLOAD_DIRECTORY)?;
        if value.trim().is_empty() {
            Ok(defaults::UPLOAD_DIRECTORY.to_string())
        } else {
            Ok(value.trim().to_string())
        }
    }

    async fn get_allowed_extensions(&self) -> RepositoryResult<Vec<String>> {
        let value =
            self.get_config_or_default(config_keys::ALLOWED_EXTENSIONS, defaults::ALLOWED_EXTENSIONS)?;

        let extensions: Vec<String> = value
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .map(|s| if s.starts_with('.') { s } else { format!(".{}", s) })
            .collect();

        if extensions.is_empty() {
            Ok(defaults::ALLOWED_EXTENSIONS
                .split(',')
                .map(str::to_string)
                .collect())
        } else {
            Ok(extensions)
        }
    }

    // ===== 导入执行配置 =====

    async fn get_max_concurrent_imports(&self) -> RepositoryResult<usize> {
        let value = self.get_parsed_or_default(
            config_keys::MAX_CONCURRENT_IMPORTS,
            defaults::MAX_CONCURRENT_IMPORTS,
        )?;
        Ok(value.max(1))
    }

    // ===== 查询配置 =====

    async fn get_default_page_size(&self) -> RepositoryResult<usize> {
        let value =
            self.get_parsed_or_default(config_keys::DEFAULT_PAGE_SIZE, defaults::DEFAULT_PAGE_SIZE)?;
        Ok(value.max(1))
    }

    async fn get_max_page_size(&self) -> RepositoryResult<usize> {
        let value = self.get_parsed_or_default(config_keys::MAX_PAGE_SIZE, defaults::MAX_PAGE_SIZE)?;
        Ok(value.max(1))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 上传
    pub const MAX_FILE_SIZE_BYTES: &str = "max_file_size_bytes";
    pub const UPLOAD_DIRECTORY: &str = "upload_directory";
    pub const ALLOWED_EXTENSIONS: &str = "allowed_extensions"; // 逗号分隔

    // 导入执行
    pub const MAX_CONCURRENT_IMPORTS: &str = "max_concurrent_imports";

    // 分页
    pub const DEFAULT_PAGE_SIZE: &str = "default_page_size";
    pub const MAX_PAGE_SIZE: &str = "max_page_size";
}

// 默认值
mod defaults {
    pub const MAX_FILE_SIZE_BYTES: u64 = 50 * 1024 * 1024;
    pub const UPLOAD_DIRECTORY: &str = "uploads";
    pub const ALLOWED_EXTENSIONS: &str = ".xlsx,.xls,.csv";
    pub const MAX_CONCURRENT_IMPORTS: usize = 4;
    pub const DEFAULT_PAGE_SIZE: usize = 20;
    pub const MAX_PAGE_SIZE: usize = 100;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_unset() {
        let config = manager();

        assert_eq!(config.get_max_file_size_bytes().await.unwrap(), 52_428_800);
        assert_eq!(config.get_upload_directory().await.unwrap(), "uploads");
        assert_eq!(
            config.get_allowed_extensions().await.unwrap(),
            vec![".xlsx", ".xls", ".csv"]
        );
        assert_eq!(config.get_max_concurrent_imports().await.unwrap(), 4);
        assert_eq!(config.get_default_page_size().await.unwrap(), 20);
        assert_eq!(config.get_max_page_size().await.unwrap(), 100);
    }

    #[tokio::test]
    async fn test_overrides_and_bad_values() {
        let config = manager();
        config
            .set_global_config_value(config_keys::MAX_FILE_SIZE_BYTES, "1024")
            .unwrap();
        config
            .set_global_config_value(config_keys::ALLOWED_EXTENSIONS, "XLSX, .csv")
            .unwrap();
        config
            .set_global_config_value(config_keys::MAX_PAGE_SIZE, "lots")
            .unwrap();

        assert_eq!(config.get_max_file_size_bytes().await.unwrap(), 1024);
        assert_eq!(
            config.get_allowed_extensions().await.unwrap(),
            vec![".xlsx", ".csv"]
        );
        assert_eq!(config.get_max_page_size().await.unwrap(), 100);
    }

    #[test]
    fn test_snapshot_contains_overrides() {
        let config = manager();
        config
            .set_global_config_value(config_keys::UPLOAD_DIRECTORY, "/tmp/in")
            .unwrap();

        let snapshot = config.get_config_snapshot().unwrap();
        let parsed: BTreeMap<String, String> = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(parsed.get("upload_directory").map(String::as_str), Some("/tmp/in"));
    }
}
