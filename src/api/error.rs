// ==========================================
// 库存看板后端 - API层错误类型
// ==========================================
// 职责: 把导入/仓储错误收敛为封闭的错误类别,并映射为上传响应体
// 类别: ValidationError / DuplicateError / ForeignKeyError
//       ParseError / StoreError / InternalError（后三者为通用类别的细分）
// ==========================================

use crate::importer::ImportError;
use crate::repository::RepositoryError;
use serde::Serialize;
use thiserror::Error;

const DUPLICATE_MESSAGE: &str =
    "This inventory item already exists. The system will update the existing record.";
const FOREIGN_KEY_MESSAGE: &str = "One or more parts in your orders file don't exist in inventory. Please ensure all parts are added to inventory first.";
const UNKNOWN_PARTS_MESSAGE: &str = "One or more part numbers in your orders file don't exist in inventory. Please add these parts to inventory first.";

/// API层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// 前置条件不满足 / 引用完整性预检失败 / 请求不合法
    #[error("{0}")]
    ValidationError(String),

    /// 存储端报告的自然键冲突
    #[error("{0}")]
    DuplicateError(String),

    /// 存储端拒绝的外键引用
    #[error("{0}")]
    ForeignKeyError(String),

    #[error("Upload failed: {0}")]
    ParseError(String),

    #[error("Upload failed: {0}")]
    StoreError(String),

    #[error("Upload failed: {0}")]
    InternalError(String),
}

impl ApiError {
    /// 响应体中 details.type 的取值
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::ValidationError(_) => "ValidationError",
            ApiError::DuplicateError(_) => "DuplicateError",
            ApiError::ForeignKeyError(_) => "ForeignKeyError",
            ApiError::ParseError(_) => "ParseError",
            ApiError::StoreError(_) => "StoreError",
            ApiError::InternalError(_) => "InternalError",
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UniqueConstraintViolation(_) => {
                ApiError::DuplicateError(DUPLICATE_MESSAGE.to_string())
            }
            RepositoryError::ForeignKeyViolation(_) => {
                ApiError::ForeignKeyError(FOREIGN_KEY_MESSAGE.to_string())
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            other => ApiError::StoreError(other.to_string()),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::InventoryEmpty => ApiError::ValidationError(err.to_string()),
            ImportError::UnknownPartNumbers(missing) => ApiError::ValidationError(format!(
                "{} Missing: {}",
                UNKNOWN_PARTS_MESSAGE,
                missing.join(", ")
            )),
            ImportError::Repository(repo_err) => repo_err.into(),
            other => ApiError::ParseError(other.to_string()),
        }
    }
}

// ==========================================
// 上传响应体
// ==========================================

/// 失败详情
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetails {
    #[serde(rename = "type")]
    pub kind: String,
}

/// 上传响应体
///
/// 成功: `{success:true, message, count}`
/// 失败: `{success:false, error, details:{type}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

impl UploadResponse {
    pub fn success(message: &str, count: usize) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            count: Some(count),
            error: None,
            details: None,
        }
    }

    pub fn failure(err: &ApiError) -> Self {
        Self {
            success: false,
            message: None,
            count: None,
            error: Some(err.to_string()),
            details: Some(ErrorDetails {
                kind: err.kind().to_string(),
            }),
        }
    }
}
