// ==========================================
// 保险业务数据导入 - API 层
// ==========================================
// 职责: 提供上传与查询接口,供命令行/上层服务调用
// ==========================================

pub mod error;
pub mod import_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, UploadListing, UploadResponse, UploadStatus, UploadedFile};
