// ==========================================
// 库存看板后端 - 领域层
// ==========================================
// 职责: 定义库存/订单实体与看板汇总对象
// 红线: 领域层不访问存储,不依赖解析库
// ==========================================

pub mod analytics;
pub mod inventory;
pub mod order;

// 重导出核心实体
pub use analytics::AnalyticsSummary;
pub use inventory::InventoryItem;
pub use order::Order;

use serde::{Deserialize, Deserializer};

/// 库存表名
pub const INVENTORY_TABLE: &str = "inventory";

/// 订单表名
pub const ORDERS_TABLE: &str = "orders";

/// 反序列化时把显式 null 视为缺省值（托管存储的可空列）
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
