// ==========================================
// 库存看板后端 - 行存储契约
// ==========================================
// 契约: select(table, filters) / insert(table, rows) / update(table, row, filters) / delete(table, filters)
// 实现者: SqliteRowStore（本地 rusqlite）、RestRowStore（托管表存储 HTTP 接口）
// 红线: 导入器只依赖本契约,不依赖具体存储技术
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// 单行数据（列名 → 值）
pub type Row = serde_json::Map<String, Value>;

// ==========================================
// Filter / Query - 查询条件
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// 列 = 值
    Eq(String, Value),
    /// 列 <> 值
    Neq(String, Value),
}

impl Filter {
    pub fn column(&self) -> &str {
        match self {
            Filter::Eq(column, _) | Filter::Neq(column, _) => column,
        }
    }

    pub fn value(&self) -> &Value {
        match self {
            Filter::Eq(_, value) | Filter::Neq(_, value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: String,
    pub filters: Vec<Filter>,
    pub limit: Option<usize>,
}

impl Query {
    /// 针对指定表的无条件查询
    pub fn table(table: &str) -> Self {
        Self {
            table: table.to_string(),
            filters: Vec::new(),
            limit: None,
        }
    }

    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(column.to_string(), value.into()));
        self
    }

    pub fn neq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Neq(column.to_string(), value.into()));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

// ==========================================
// RowStore Trait
// ==========================================
#[async_trait]
pub trait RowStore: Send + Sync {
    /// 按条件查询（无条件即全表,顺序为存储默认顺序）
    async fn select(&self, query: &Query) -> RepositoryResult<Vec<Row>>;

    /// 插入一行或多行
    ///
    /// # 说明
    /// - 多行插入整体成功或整体失败
    async fn insert(&self, table: &str, rows: Vec<Row>) -> RepositoryResult<usize>;

    /// 按条件整体覆盖给定列,返回受影响行数
    async fn update(&self, query: &Query, row: Row) -> RepositoryResult<usize>;

    /// 按条件删除,返回受影响行数
    async fn delete(&self, query: &Query) -> RepositoryResult<usize>;
}

/// 校验表名/列名（仅允许 ASCII 字母数字与下划线）
pub fn validate_identifier(ident: &str) -> RepositoryResult<&str> {
    let valid = !ident.is_empty()
        && !ident.starts_with(|c: char| c.is_ascii_digit())
        && ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(ident)
    } else {
        Err(RepositoryError::InvalidIdentifier(ident.to_string()))
    }
}

/// 实体 → 行
pub fn encode_row<T: Serialize>(entity: &T) -> RepositoryResult<Row> {
    match serde_json::to_value(entity) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(RepositoryError::InternalError(format!(
            "实体未序列化为对象: {}",
            other
        ))),
        Err(e) => Err(RepositoryError::InternalError(e.to_string())),
    }
}

/// 行 → 实体（忽略存储端附加列,如自增 id）
pub fn decode_rows<T: DeserializeOwned>(table: &str, rows: Vec<Row>) -> RepositoryResult<Vec<T>> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(Value::Object(row)).map_err(|e| RepositoryError::DecodeError {
                table: table.to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}
