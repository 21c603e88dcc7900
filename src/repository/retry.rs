// ==========================================
// 库存看板后端 - 存储调用有界重试
// ==========================================
// 职责: 包装任意 RowStore,对连接层瞬时失败做有界指数退避重试
// 约束:
// - 仅 RepositoryError::Unavailable 会被重试（请求未送达存储端）
// - 约束违反/查询错误立即返回,不重试
// ==========================================

use crate::repository::error::RepositoryResult;
use crate::repository::row_store::{Query, Row, RowStore};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// 退避上限
const MAX_BACKOFF: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 最大尝试次数（含首次）
    pub max_attempts: u32,
    /// 首次重试前的等待时间,之后逐次翻倍
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    /// 第 attempt 次失败后的等待时间（attempt 从 1 开始）
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(MAX_BACKOFF)
    }
}

// ==========================================
// RetryingStore
// ==========================================
pub struct RetryingStore<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: RowStore> RetryingStore<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    async fn with_retry<T, F, Fut>(&self, op: &str, mut call: F) -> RepositoryResult<T>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = RepositoryResult<T>> + Send,
        T: Send,
    {
        let mut attempt = 1;
        loop {
            match call().await {
                Err(e) if e.is_transient() && attempt < self.policy.max_attempts => {
                    let delay = self.policy.delay_for(attempt);
                    tracing::warn!(
                        "存储调用 {} 第 {} 次失败,{}ms 后重试: {}",
                        op,
                        attempt,
                        delay.as_millis(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

#[async_trait]
impl<S: RowStore> RowStore for RetryingStore<S> {
    async fn select(&self, query: &Query) -> RepositoryResult<Vec<Row>> {
        self.with_retry("select", || self.inner.select(query)).await
    }

    async fn insert(&self, table: &str, rows: Vec<Row>) -> RepositoryResult<usize> {
        self.with_retry("insert", || self.inner.insert(table, rows.clone()))
            .await
    }

    async fn update(&self, query: &Query, row: Row) -> RepositoryResult<usize> {
        self.with_retry("update", || self.inner.update(query, row.clone()))
            .await
    }

    async fn delete(&self, query: &Query) -> RepositoryResult<usize> {
        self.with_retry("delete", || self.inner.delete(query)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::error::RepositoryError;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// 前 N 次 select 返回指定错误的存储桩
    struct FlakyStore {
        failures: u32,
        transient: bool,
        calls: AtomicU32,
    }

    impl FlakyStore {
        fn new(failures: u32, transient: bool) -> Self {
            Self {
                failures,
                transient,
                calls: AtomicU32::new(0),
            }
        }

        fn fail_or<T>(&self, ok: T) -> RepositoryResult<T> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures {
                if self.transient {
                    Err(RepositoryError::Unavailable("connection refused".to_string()))
                } else {
                    Err(RepositoryError::DatabaseQueryError("syntax".to_string()))
                }
            } else {
                Ok(ok)
            }
        }
    }

    #[async_trait]
    impl RowStore for FlakyStore {
        async fn select(&self, _query: &Query) -> RepositoryResult<Vec<Row>> {
            self.fail_or(Vec::new())
        }
        async fn insert(&self, _table: &str, rows: Vec<Row>) -> RepositoryResult<usize> {
            self.fail_or(rows.len())
        }
        async fn update(&self, _query: &Query, _row: Row) -> RepositoryResult<usize> {
            self.fail_or(1)
        }
        async fn delete(&self, _query: &Query) -> RepositoryResult<usize> {
            self.fail_or(0)
        }
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_retries_transient_failures_until_success() {
        let store = RetryingStore::new(FlakyStore::new(2, true), fast_policy(3));

        let rows = store.select(&Query::table("inventory")).await;

        assert!(rows.is_ok());
        assert_eq!(store.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let store = RetryingStore::new(FlakyStore::new(5, true), fast_policy(3));

        let result = store.insert("inventory", vec![Row::new()]).await;

        assert!(matches!(result, Err(RepositoryError::Unavailable(_))));
        assert_eq!(store.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_does_not_retry_non_transient_errors() {
        let store = RetryingStore::new(FlakyStore::new(1, false), fast_policy(3));

        let result = store.delete(&Query::table("orders")).await;

        assert!(result.is_err());
        assert_eq!(store.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay: Duration::from_millis(100),
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(400));
        assert_eq!(policy.delay_for(10), MAX_BACKOFF);
    }
}
