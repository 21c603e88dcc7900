// ==========================================
// 库存看板后端 - 托管表存储 HTTP 实现
// ==========================================
// 职责: 通过 PostgREST 风格的 REST 接口实现 RowStore 契约
// 接口:
// - GET    /rest/v1/{table}?select=*&col=eq.value&limit=N
// - POST   /rest/v1/{table}            （JSON 数组,整批写入）
// - PATCH  /rest/v1/{table}?col=eq.value
// - DELETE /rest/v1/{table}?col=neq.value
// 鉴权: apikey + Bearer（同一访问密钥）
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_store::{validate_identifier, Filter, Query, Row, RowStore};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// REST 接口路径前缀
const REST_PREFIX: &str = "rest/v1";

/// 单次请求超时
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// 唯一约束违反（PostgreSQL SQLSTATE）
const PG_UNIQUE_VIOLATION: &str = "23505";

/// 外键约束违反（PostgreSQL SQLSTATE）
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

/// 存储端错误响应体
#[derive(Debug, Default, Deserialize)]
struct StoreErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

// ==========================================
// RestRowStore
// ==========================================
#[derive(Clone)]
pub struct RestRowStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestRowStore {
    /// 创建托管存储客户端
    ///
    /// # 参数
    /// - base_url: 存储服务根地址（如 https://xyz.example.co）
    /// - api_key: 访问密钥
    pub fn new(base_url: &str, api_key: &str) -> RepositoryResult<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| RepositoryError::InternalError(format!("HTTP 客户端初始化失败: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn table_url(&self, table: &str) -> RepositoryResult<String> {
        Ok(format!(
            "{}/{}/{}",
            self.base_url,
            REST_PREFIX,
            validate_identifier(table)?
        ))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// 发送请求并把非 2xx 响应转换为分类错误
    async fn send(builder: RequestBuilder) -> RepositoryResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_error(status, &body))
    }

    async fn decode_rows(table: &str, response: Response) -> RepositoryResult<Vec<Row>> {
        response
            .json::<Vec<Row>>()
            .await
            .map_err(|e| RepositoryError::DecodeError {
                table: table.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl RowStore for RestRowStore {
    async fn select(&self, query: &Query) -> RepositoryResult<Vec<Row>> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(filter_params(&query.filters)?);
        if let Some(limit) = query.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        let builder = self
            .authorize(self.client.get(self.table_url(&query.table)?))
            .query(&params);
        let response = Self::send(builder).await?;
        Self::decode_rows(&query.table, response).await
    }

    async fn insert(&self, table: &str, rows: Vec<Row>) -> RepositoryResult<usize> {
        let count = rows.len();
        let builder = self
            .authorize(self.client.post(self.table_url(table)?))
            .header("Prefer", "return=minimal")
            .json(&rows);
        Self::send(builder).await?;
        Ok(count)
    }

    async fn update(&self, query: &Query, row: Row) -> RepositoryResult<usize> {
        let builder = self
            .authorize(self.client.patch(self.table_url(&query.table)?))
            .header("Prefer", "return=representation")
            .query(&filter_params(&query.filters)?)
            .json(&row);
        let response = Self::send(builder).await?;
        Ok(Self::decode_rows(&query.table, response).await?.len())
    }

    async fn delete(&self, query: &Query) -> RepositoryResult<usize> {
        let builder = self
            .authorize(self.client.delete(self.table_url(&query.table)?))
            .header("Prefer", "return=representation")
            .query(&filter_params(&query.filters)?);
        let response = Self::send(builder).await?;
        Ok(Self::decode_rows(&query.table, response).await?.len())
    }
}

// ==========================================
// 辅助函数
// ==========================================

/// 把过滤条件转换为 `col=op.value` 查询参数
fn filter_params(filters: &[Filter]) -> RepositoryResult<Vec<(String, String)>> {
    filters
        .iter()
        .map(|filter| {
            let column = validate_identifier(filter.column())?.to_string();
            let expr = match (filter, filter.value()) {
                (Filter::Eq(..), Value::Null) => "is.null".to_string(),
                (Filter::Neq(..), Value::Null) => "not.is.null".to_string(),
                (Filter::Eq(..), value) => format!("eq.{}", literal(value)),
                (Filter::Neq(..), value) => format!("neq.{}", literal(value)),
            };
            Ok((column, expr))
        })
        .collect()
}

fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 按状态码与 SQLSTATE 对存储端错误分类
fn classify_error(status: StatusCode, body: &str) -> RepositoryError {
    let parsed: StoreErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = match (&parsed.message, &parsed.details) {
        (Some(message), Some(details)) => format!("{} ({})", message, details),
        (Some(message), None) => message.clone(),
        _ => format!("HTTP {}: {}", status.as_u16(), body),
    };

    match parsed.code.as_deref() {
        Some(PG_UNIQUE_VIOLATION) => RepositoryError::UniqueConstraintViolation(message),
        Some(PG_FOREIGN_KEY_VIOLATION) => RepositoryError::ForeignKeyViolation(message),
        _ if matches!(
            status,
            StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
        ) =>
        {
            RepositoryError::Unavailable(message)
        }
        _ => RepositoryError::DatabaseQueryError(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_params() {
        let query = Query::table("inventory")
            .eq("part_number", "KQ-001")
            .neq("in_stock", 0)
            .eq("name", Value::Null);

        let params = filter_params(&query.filters).unwrap();

        assert_eq!(params[0], ("part_number".to_string(), "eq.KQ-001".to_string()));
        assert_eq!(params[1], ("in_stock".to_string(), "neq.0".to_string()));
        assert_eq!(params[2], ("name".to_string(), "is.null".to_string()));
    }

    #[test]
    fn test_classify_constraint_errors() {
        let unique = classify_error(
            StatusCode::CONFLICT,
            r#"{"code":"23505","message":"duplicate key value violates unique constraint","details":"Key (part_number)=(KQ-001) already exists."}"#,
        );
        assert!(matches!(unique, RepositoryError::UniqueConstraintViolation(_)));

        let fk = classify_error(
            StatusCode::CONFLICT,
            r#"{"code":"23503","message":"insert or update on table \"orders\" violates foreign key constraint \"orders_part_number_fkey\""}"#,
        );
        assert!(matches!(fk, RepositoryError::ForeignKeyViolation(_)));
    }

    #[test]
    fn test_classify_gateway_errors_as_unavailable() {
        let err = classify_error(StatusCode::SERVICE_UNAVAILABLE, "upstream down");
        assert!(err.is_transient());

        let err = classify_error(StatusCode::BAD_REQUEST, r#"{"message":"bad filter"}"#);
        assert!(matches!(err, RepositoryError::DatabaseQueryError(ref m) if m == "bad filter"));
    }

    #[test]
    fn test_table_url_rejects_bad_identifier() {
        let store = RestRowStore::new("https://store.example.com/", "key").unwrap();
        assert_eq!(
            store.table_url("inventory").unwrap(),
            "https://store.example.com/rest/v1/inventory"
        );
        assert!(store.table_url("inventory?select=*").is_err());
    }
}
