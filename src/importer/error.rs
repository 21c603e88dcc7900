// ==========================================
// 库存看板后端 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::repository::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("Excel parse failed: {0}")]
    ExcelParseError(String),

    #[error("CSV parse failed: {0}")]
    CsvParseError(String),

    // ===== 数据映射错误 =====
    #[error("invalid integer in row {row}, column '{field}': {value}")]
    TypeConversionError {
        row: usize,
        field: String,
        value: String,
    },

    #[error("value out of range in row {row}, column '{field}': {value} (must be >= 0)")]
    ValueRangeError { row: usize, field: String, value: i64 },

    #[error("missing '{field}' in row {row}")]
    PrimaryKeyMissing { row: usize, field: String },

    // ===== 引用完整性错误 =====
    #[error("No inventory items found. Please upload inventory data before adding orders.")]
    InventoryEmpty,

    #[error("Part numbers not present in inventory: {}", .0.join(", "))]
    UnknownPartNumbers(Vec<String>),

    // ===== 存储错误 =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
