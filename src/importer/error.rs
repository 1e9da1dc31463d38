// ==========================================
// 保险业务数据导入 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 仅承载致命错误；行级问题由 RowError 收集，不走此类型
// ==========================================

use crate::domain::types::UnknownDataType;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("Error reading file: {0}")]
    Format(String),

    // ===== 请求错误 =====
    #[error("Unsupported data type: {0}")]
    UnsupportedType(String),

    // ===== 存储错误 =====
    #[error("Error saving records: {0}")]
    Storage(#[from] RepositoryError),
}

impl ImportError {
    /// 是否为格式类错误（文件无法解析）
    pub fn is_format_error(&self) -> bool {
        matches!(self, ImportError::Format(_))
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::Format(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::Format(err.to_string())
    }
}

// 实现 From<UnknownDataType>
impl From<UnknownDataType> for ImportError {
    fn from(err: UnknownDataType) -> Self {
        ImportError::UnsupportedType(err.0)
    }
}

/// Result 类型别名
pub type ImporterResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_type_conversion() {
        let err: ImportError = UnknownDataType("invoices".to_string()).into();
        assert!(matches!(err, ImportError::UnsupportedType(ref t) if t == "invoices"));
        assert_eq!(err.to_string(), "Unsupported data type: invoices");
    }

    #[test]
    fn test_storage_error_wraps_repository_error() {
        let err: ImportError = RepositoryError::DatabaseTransactionError("disk full".into()).into();
        assert!(matches!(err, ImportError::Storage(_)));
        assert!(!err.is_format_error());
    }
}
