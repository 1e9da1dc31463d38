// ==========================================
// 保险业务数据导入 - 导入配置读取 Trait
// ==========================================
// 职责: 定义上传/导入/查询所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    // ===== 上传配置 =====

    /// 上传文件大小上限（字节）
    ///
    /// # 默认值
    /// - 52428800 (50MB)
    async fn get_max_file_size_bytes(&self) -> RepositoryResult<u64>;

    /// 上传文件保存根目录
    ///
    /// # 默认值
    /// - uploads
    async fn get_upload_directory(&self) -> RepositoryResult<String>;

    /// 允许的文件扩展名（小写，含点号）
    ///
    /// # 默认值
    /// - [".xlsx", ".xls", ".csv"]
    async fn get_allowed_extensions(&self) -> RepositoryResult<Vec<String>>;

    // ===== 导入执行配置 =====

    /// 后台并发导入数上限
    ///
    /// # 默认值
    /// - 4
    async fn get_max_concurrent_imports(&self) -> RepositoryResult<usize>;

    // ===== 查询配置 =====

    /// 默认分页大小
    ///
    /// # 默认值
    /// - 20
    async fn get_default_page_size(&self) -> RepositoryResult<usize>;

    /// 最大分页大小
    ///
    /// # 默认值
    /// - 100
    async fn get_max_page_size(&self) -> RepositoryResult<usize>;
}
