// ==========================================
// 库存看板后端 - SQLite 行存储实现
// ==========================================
// 职责: 用 rusqlite 实现 RowStore 契约
// 约束:
// - 值一律参数化绑定,表名/列名白名单校验
// - 多行插入在同一事务内完成（整批成功或整批回滚）
// - 阻塞调用放到 spawn_blocking,避免占用异步工作线程
// ==========================================

use crate::db::{ensure_schema, open_sqlite_connection};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_store::{validate_identifier, Filter, Query, Row, RowStore};
use async_trait::async_trait;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection};
use serde_json::Value;
use std::sync::{Arc, Mutex};

// ==========================================
// SqliteRowStore
// ==========================================
#[derive(Clone)]
pub struct SqliteRowStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRowStore {
    /// 打开（或创建）数据库文件并确保表结构存在
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（":memory:" 为内存库）
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 在阻塞线程池中持锁执行数据库操作
    async fn run<T, F>(&self, op: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> RepositoryResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            op(&guard)
        })
        .await?
    }
}

#[async_trait]
impl RowStore for SqliteRowStore {
    async fn select(&self, query: &Query) -> RepositoryResult<Vec<Row>> {
        let query = query.clone();
        self.run(move |conn| {
            let table = validate_identifier(&query.table)?;
            let (where_sql, mut params) = build_where(&query.filters, 1)?;
            let mut sql = format!("SELECT * FROM {}{} ORDER BY rowid", table, where_sql);
            if let Some(limit) = query.limit {
                sql.push_str(&format!(" LIMIT ?{}", params.len() + 1));
                params.push(SqlValue::Integer(limit as i64));
            }

            let mut stmt = conn.prepare(&sql)?;
            let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
            let mut rows = stmt.query(params_from_iter(params.iter()))?;

            let mut result = Vec::new();
            while let Some(row) = rows.next()? {
                let mut map = Row::new();
                for (idx, column) in columns.iter().enumerate() {
                    map.insert(column.clone(), from_sql_value(row.get_ref(idx)?));
                }
                result.push(map);
            }
            Ok(result)
        })
        .await
    }

    async fn insert(&self, table: &str, rows: Vec<Row>) -> RepositoryResult<usize> {
        let table = validate_identifier(table)?.to_string();
        self.run(move |conn| {
            let tx = conn.unchecked_transaction()?;
            let mut count = 0;
            for row in &rows {
                let columns = row
                    .keys()
                    .map(|c| validate_identifier(c))
                    .collect::<RepositoryResult<Vec<_>>>()?;
                let placeholders: Vec<String> =
                    (1..=columns.len()).map(|i| format!("?{}", i)).collect();
                let sql = format!(
                    "INSERT INTO {} ({}) VALUES ({})",
                    table,
                    columns.join(", "),
                    placeholders.join(", ")
                );
                let params: Vec<SqlValue> = row.values().map(to_sql_value).collect();
                tx.execute(&sql, params_from_iter(params.iter()))?;
                count += 1;
            }
            tx.commit()?;
            Ok(count)
        })
        .await
    }

    async fn update(&self, query: &Query, row: Row) -> RepositoryResult<usize> {
        let query = query.clone();
        self.run(move |conn| {
            let table = validate_identifier(&query.table)?;
            if row.is_empty() {
                return Err(RepositoryError::DatabaseQueryError(
                    "update without columns".to_string(),
                ));
            }

            let mut assignments = Vec::with_capacity(row.len());
            let mut params = Vec::with_capacity(row.len() + query.filters.len());
            for (idx, (column, value)) in row.iter().enumerate() {
                assignments.push(format!("{} = ?{}", validate_identifier(column)?, idx + 1));
                params.push(to_sql_value(value));
            }
            let (where_sql, where_params) = build_where(&query.filters, params.len() + 1)?;
            params.extend(where_params);

            let sql = format!("UPDATE {} SET {}{}", table, assignments.join(", "), where_sql);
            Ok(conn.execute(&sql, params_from_iter(params.iter()))?)
        })
        .await
    }

    async fn delete(&self, query: &Query) -> RepositoryResult<usize> {
        let query = query.clone();
        self.run(move |conn| {
            let table = validate_identifier(&query.table)?;
            let (where_sql, params) = build_where(&query.filters, 1)?;
            let sql = format!("DELETE FROM {}{}", table, where_sql);
            Ok(conn.execute(&sql, params_from_iter(params.iter()))?)
        })
        .await
    }
}

// ==========================================
// SQL 构建辅助
// ==========================================

/// 生成 WHERE 子句,占位符从 first_index 开始编号
fn build_where(
    filters: &[Filter],
    first_index: usize,
) -> RepositoryResult<(String, Vec<SqlValue>)> {
    if filters.is_empty() {
        return Ok((String::new(), Vec::new()));
    }

    let mut clauses = Vec::with_capacity(filters.len());
    let mut params = Vec::new();
    for filter in filters {
        let column = validate_identifier(filter.column())?;
        let clause = match (filter, filter.value()) {
            (Filter::Eq(..), Value::Null) => format!("{} IS NULL", column),
            (Filter::Neq(..), Value::Null) => format!("{} IS NOT NULL", column),
            (Filter::Eq(..), value) => {
                params.push(to_sql_value(value));
                format!("{} = ?{}", column, first_index + params.len() - 1)
            }
            (Filter::Neq(..), value) => {
                params.push(to_sql_value(value));
                format!("{} <> ?{}", column, first_index + params.len() - 1)
            }
        };
        clauses.push(clause);
    }

    Ok((format!(" WHERE {}", clauses.join(" AND ")), params))
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(*b as i64),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn from_sql_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::String(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}
