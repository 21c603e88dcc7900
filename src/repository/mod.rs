// ==========================================
// 库存看板后端 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 行存储契约 (select/insert/update/delete) + 两种后端 + 类型化表访问
// 约束: 所有查询使用参数化,标识符白名单校验
// ==========================================

pub mod error;
pub mod inventory_repo;
pub mod order_repo;
pub mod rest_store;
pub mod retry;
pub mod row_store;
pub mod sqlite_store;

// 重导出核心类型
pub use error::{RepositoryError, RepositoryResult};
pub use inventory_repo::InventoryRepository;
pub use order_repo::OrderRepository;
pub use rest_store::RestRowStore;
pub use retry::{RetryPolicy, RetryingStore};
pub use row_store::{decode_rows, encode_row, Filter, Query, Row, RowStore};
pub use sqlite_store::SqliteRowStore;
