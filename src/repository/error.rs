// ==========================================
// 库存看板后端 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 约束错误 =====
    #[error("unique constraint violated: {0}")]
    UniqueConstraintViolation(String),

    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    // ===== 连接/查询错误 =====
    #[error("row store unavailable: {0}")]
    Unavailable(String),

    #[error("database lock poisoned: {0}")]
    LockError(String),

    #[error("query failed: {0}")]
    DatabaseQueryError(String),

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    // ===== 数据质量错误 =====
    #[error("row decode failed (table={table}): {message}")]
    DecodeError { table: String, message: String },

    // ===== 通用错误 =====
    #[error("internal error: {0}")]
    InternalError(String),
}

impl RepositoryError {
    /// 是否为可重试的瞬时错误（仅连接层失败）
    pub fn is_transient(&self) -> bool {
        matches!(self, RepositoryError::Unavailable(_))
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(code, msg) => {
                let msg = msg.unwrap_or_else(|| code.to_string());
                if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else if msg.contains("FOREIGN KEY") {
                    RepositoryError::ForeignKeyViolation(msg)
                } else if code.code == rusqlite::ErrorCode::CannotOpen {
                    RepositoryError::Unavailable(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

// 实现 From<reqwest::Error>
impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            RepositoryError::Unavailable(err.to_string())
        } else {
            RepositoryError::DatabaseQueryError(err.to_string())
        }
    }
}

// 实现 From<tokio::task::JoinError>
impl From<tokio::task::JoinError> for RepositoryError {
    fn from(err: tokio::task::JoinError) -> Self {
        RepositoryError::InternalError(err.to_string())
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_constraint_classification() {
        let unique = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT),
            Some("UNIQUE constraint failed: inventory.part_number".to_string()),
        );
        assert!(matches!(
            RepositoryError::from(unique),
            RepositoryError::UniqueConstraintViolation(_)
        ));

        let fk = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT),
            Some("FOREIGN KEY constraint failed".to_string()),
        );
        assert!(matches!(
            RepositoryError::from(fk),
            RepositoryError::ForeignKeyViolation(_)
        ));
    }

    #[test]
    fn test_only_unavailable_is_transient() {
        assert!(RepositoryError::Unavailable("down".to_string()).is_transient());
        assert!(!RepositoryError::DatabaseQueryError("bad".to_string()).is_transient());
        assert!(!RepositoryError::UniqueConstraintViolation("dup".to_string()).is_transient());
    }
}
