// ==========================================
// 保险业务数据导入 - 上传与查询 API
// ==========================================
// 职责: 上传校验 / 上传文件管理 / 后台导入调度 / 记录分页查询
// 说明: 导入本身在后台执行，上传接口立即返回 processing
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ImportConfigReader;
use crate::domain::import::ImportRequest;
use crate::domain::types::DataType;
use crate::importer::ImportScheduler;
use crate::repository::{Page, RecordQuery, RecordStore};
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// 上传响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// 保存后的文件名（<tag>_<时间戳>_<原文件名>）
    pub filename: String,
    /// 文件大小（字节）
    pub size: u64,
    /// 上传时恒为 0，导入在后台完成
    pub records_imported: usize,
    pub status: String,
    pub message: String,
    /// 后台导入 ID
    pub import_id: String,
}

/// 已上传文件信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    pub size: u64,
    pub uploaded_at: Option<NaiveDateTime>,
}

/// 单个数据类型的上传状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadStatus {
    pub data_type: String,
    /// completed / no_uploads
    pub status: String,
    pub files: Vec<UploadedFile>,
}

/// 单个数据类型的上传清单
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadListing {
    pub count: usize,
    pub files: Vec<UploadedFile>,
}

/// 上传与查询 API
pub struct ImportApi<S, C>
where
    S: RecordStore + 'static,
    C: ImportConfigReader,
{
    store: Arc<S>,
    config: Arc<C>,
    scheduler: ImportScheduler<S>,
}

impl<S, C> ImportApi<S, C>
where
    S: RecordStore + 'static,
    C: ImportConfigReader,
{
    /// 创建新的ImportApi实例
    pub fn new(store: Arc<S>, config: Arc<C>, scheduler: ImportScheduler<S>) -> Self {
        Self {
            store,
            config,
            scheduler,
        }
    }

    // ==========================================
    // 上传
    // ==========================================

    /// 上传文件并调度后台导入
    ///
    /// # 参数
    /// - data_type: 数据类型标签
    /// - file_name: 原始文件名（只取最后一段路径）
    /// - content: 文件字节
    ///
    /// # 返回
    /// - Ok(UploadResponse): status = processing
    /// - Err(ApiError::InvalidInput): 类型/扩展名不合法
    /// - Err(ApiError::PayloadTooLarge): 超过大小上限
    #[instrument(skip(self, content), fields(size = content.len()))]
    pub async fn upload_file(
        &self,
        data_type: &str,
        file_name: &str,
        content: Vec<u8>,
    ) -> ApiResult<UploadResponse> {
        let data_type = parse_data_type(data_type)?;
        let file_name = sanitize_file_name(file_name)?;

        // 扩展名校验
        let allowed = self.config.get_allowed_extensions().await?;
        let lowered = file_name.to_lowercase();
        if !allowed.iter().any(|ext| lowered.ends_with(ext.as_str())) {
            return Err(ApiError::InvalidInput(format!(
                "Only {} files are allowed",
                allowed.join(", ")
            )));
        }

        // 大小校验
        let size = content.len() as u64;
        let limit = self.config.get_max_file_size_bytes().await?;
        if size > limit {
            return Err(ApiError::PayloadTooLarge { size, limit });
        }

        // 保存文件
        let upload_dir = self.upload_dir(data_type).await?;
        tokio::fs::create_dir_all(&upload_dir).await?;

        let stored_name = format!(
            "{}_{}_{}",
            data_type,
            Local::now().format("%Y%m%d_%H%M%S"),
            file_name
        );
        let file_path = upload_dir.join(&stored_name);
        tokio::fs::write(&file_path, &content).await?;
        info!(file_path = %file_path.display(), "文件已保存");

        // 后台导入
        let scheduled = self.scheduler.schedule(
            ImportRequest::new(data_type.as_str(), content).with_file_name(stored_name.clone()),
        );

        Ok(UploadResponse {
            filename: stored_name,
            size,
            records_imported: 0,
            status: scheduled.status,
            message: format!(
                "File uploaded successfully and is being processed for {} data",
                data_type
            ),
            import_id: scheduled.import_id,
        })
    }

    /// 查询某数据类型的上传状态
    pub async fn get_upload_status(&self, data_type: &str) -> ApiResult<UploadStatus> {
        let data_type = parse_data_type(data_type)?;
        let files = self.list_upload_files(data_type).await?;

        Ok(UploadStatus {
            data_type: data_type.to_string(),
            status: if files.is_empty() {
                "no_uploads".to_string()
            } else {
                "completed".to_string()
            },
            files,
        })
    }

    /// 列出全部数据类型的上传文件
    pub async fn list_all_uploads(&self) -> ApiResult<BTreeMap<String, UploadListing>> {
        let mut all_uploads = BTreeMap::new();

        for data_type in DataType::ALL {
            let files = self.list_upload_files(data_type).await?;
            all_uploads.insert(
                data_type.to_string(),
                UploadListing {
                    count: files.len(),
                    files,
                },
            );
        }

        Ok(all_uploads)
    }

    /// 删除已上传文件
    pub async fn delete_upload(&self, data_type: &str, filename: &str) -> ApiResult<String> {
        let data_type = parse_data_type(data_type)?;
        let safe_name = sanitize_file_name(filename)?;
        if safe_name != filename {
            return Err(ApiError::InvalidInput(format!("invalid file name: {}", filename)));
        }

        let file_path = self.upload_dir(data_type).await?.join(&safe_name);
        if !tokio::fs::try_exists(&file_path).await? {
            return Err(ApiError::NotFound(format!("File not found: {}", filename)));
        }

        tokio::fs::remove_file(&file_path).await?;
        info!(file_path = %file_path.display(), "文件已删除");

        Ok(format!("File {} deleted successfully", filename))
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 分页查询记录
    ///
    /// # 参数
    /// - page: 页码（>= 1，默认 1）
    /// - size: 每页条数（1..=max_page_size，默认 default_page_size）
    /// - filters: 列名 → 等值过滤
    pub async fn list_records(
        &self,
        data_type: &str,
        page: Option<usize>,
        size: Option<usize>,
        filters: BTreeMap<String, String>,
    ) -> ApiResult<Page<serde_json::Value>> {
        let data_type = parse_data_type(data_type)?;

        let page = page.unwrap_or(1);
        if page < 1 {
            return Err(ApiError::InvalidInput("page must be >= 1".to_string()));
        }

        let max_size = self.config.get_max_page_size().await?;
        let size = match size {
            Some(size) => size,
            None => self.config.get_default_page_size().await?.min(max_size),
        };
        if size < 1 || size > max_size {
            return Err(ApiError::InvalidInput(format!(
                "size must be between 1 and {}",
                max_size
            )));
        }

        let query = RecordQuery {
            page,
            size,
            filters,
        };
        Ok(self.store.list_records(data_type, query).await?)
    }

    /// 按业务主键查询单条记录
    pub async fn get_record(&self, data_type: &str, business_id: &str) -> ApiResult<serde_json::Value> {
        let data_type = parse_data_type(data_type)?;

        self.store
            .find_by_business_id(data_type, business_id.trim())
            .await?
            .ok_or_else(|| {
                ApiError::NotFound(format!(
                    "{}({}={})不存在",
                    data_type,
                    data_type.business_key(),
                    business_id
                ))
            })
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    async fn upload_dir(&self, data_type: DataType) -> ApiResult<PathBuf> {
        let root = self.config.get_upload_directory().await?;
        Ok(Path::new(&root).join(data_type.as_str()))
    }

    async fn list_upload_files(&self, data_type: DataType) -> ApiResult<Vec<UploadedFile>> {
        let upload_dir = self.upload_dir(data_type).await?;
        if !tokio::fs::try_exists(&upload_dir).await? {
            return Ok(Vec::new());
        }

        let allowed = self.config.get_allowed_extensions().await?;
        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(&upload_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let filename = entry.file_name().to_string_lossy().into_owned();
            let lowered = filename.to_lowercase();
            if !allowed.iter().any(|ext| lowered.ends_with(ext.as_str())) {
                continue;
            }

            let metadata = match entry.metadata().await {
                Ok(metadata) if metadata.is_file() => metadata,
                Ok(_) => continue,
                Err(e) => {
                    warn!(filename = %filename, error = %e, "读取文件信息失败，跳过");
                    continue;
                }
            };

            files.push(UploadedFile {
                filename,
                size: metadata.len(),
                uploaded_at: metadata
                    .modified()
                    .ok()
                    .map(|t| DateTime::<Utc>::from(t).naive_utc()),
            });
        }

        files.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(files)
    }
}

fn parse_data_type(tag: &str) -> ApiResult<DataType> {
    tag.parse::<DataType>().map_err(|_| {
        ApiError::InvalidInput(format!(
            "Invalid data type. Allowed types: {}",
            DataType::allowed_tags()
        ))
    })
}

/// 只保留文件名最后一段，拒绝空名与 ".."
fn sanitize_file_name(file_name: &str) -> ApiResult<String> {
    let name = Path::new(file_name.trim())
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_default();

    if name.is_empty() || name == ".." || name.contains('\\') {
        return Err(ApiError::InvalidInput(format!("invalid file name: {}", file_name)));
    }
    Ok(name)
}
