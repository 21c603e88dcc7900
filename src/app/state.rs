// ==========================================
// 库存看板后端 - 应用状态
// ==========================================
// 职责: 管理共享的行存储与 API 实例
// 约束: 请求间不共享内存状态,全部状态在行存储中
// ==========================================

use std::sync::Arc;

use crate::api::{DashboardApi, ImportApi, QueryApi};
use crate::config::AppConfig;
use crate::repository::{
    InventoryRepository, OrderRepository, RepositoryResult, RestRowStore, RetryPolicy,
    RetryingStore, RowStore, SqliteRowStore,
};

/// 应用状态
///
/// 作为 axum 路由状态在所有处理器间共享（克隆开销为若干 Arc）
#[derive(Clone)]
pub struct AppState {
    /// 行存储（已包裹重试）
    pub store: Arc<dyn RowStore>,

    /// 上传导入API
    pub import_api: Arc<ImportApi>,

    /// 全表查询API
    pub query_api: Arc<QueryApi>,

    /// 看板统计API
    pub dashboard_api: Arc<DashboardApi>,
}

impl AppState {
    /// 基于任意行存储创建应用状态
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        let inventory_repo = InventoryRepository::new(store.clone());
        let order_repo = OrderRepository::new(store.clone());

        Self {
            import_api: Arc::new(ImportApi::new(inventory_repo.clone(), order_repo.clone())),
            query_api: Arc::new(QueryApi::new(inventory_repo.clone(), order_repo.clone())),
            dashboard_api: Arc::new(DashboardApi::new(inventory_repo, order_repo)),
            store,
        }
    }

    /// 按配置创建行存储与应用状态
    pub fn from_config(config: &AppConfig) -> RepositoryResult<Self> {
        Ok(Self::new(build_store(config)?))
    }
}

/// 按 STORE_URL 选择后端,并包裹有界重试
///
/// - http(s) URL → 托管表存储
/// - 其它 → SQLite 文件路径（或 :memory:）
pub fn build_store(config: &AppConfig) -> RepositoryResult<Arc<dyn RowStore>> {
    let policy = RetryPolicy {
        max_attempts: config.store_retry_attempts,
        ..RetryPolicy::default()
    };

    if config.uses_hosted_store() {
        let api_key = config.store_key.as_deref().unwrap_or_default();
        let store = RestRowStore::new(&config.store_url, api_key)?;
        tracing::info!("使用托管表存储: {}", config.store_url);
        Ok(Arc::new(RetryingStore::new(store, policy)))
    } else {
        let store = SqliteRowStore::new(&config.store_url)?;
        tracing::info!("使用 SQLite 存储: {}", config.store_url);
        Ok(Arc::new(RetryingStore::new(store, policy)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_config_with_memory_store() {
        let config = AppConfig {
            store_url: ":memory:".to_string(),
            ..AppConfig::default()
        };

        let state = AppState::from_config(&config).unwrap();

        assert!(state.query_api.list_inventory().await.is_empty());
    }

    #[test]
    fn test_hosted_store_selected_for_http_url() {
        let config = AppConfig {
            store_url: "http://127.0.0.1:9".to_string(),
            store_key: Some("key".to_string()),
            ..AppConfig::default()
        };

        assert!(build_store(&config).is_ok());
    }
}
