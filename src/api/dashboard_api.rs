// ==========================================
// 库存看板后端 - 看板统计 API
// ==========================================
// 职责: 每次调用全量读取两张表并现算汇总指标（无缓存）
// 降级: 任一表读取失败 → 全零汇总
// ==========================================

use crate::domain::AnalyticsSummary;
use crate::repository::{InventoryRepository, OrderRepository};

/// 看板统计API
pub struct DashboardApi {
    inventory_repo: InventoryRepository,
    order_repo: OrderRepository,
}

impl DashboardApi {
    pub fn new(inventory_repo: InventoryRepository, order_repo: OrderRepository) -> Self {
        Self {
            inventory_repo,
            order_repo,
        }
    }

    /// 汇总指标
    ///
    /// # 返回
    /// - AnalyticsSummary: 成功时为现算结果,失败时为全零
    pub async fn analytics_summary(&self) -> AnalyticsSummary {
        let fetched = futures::try_join!(self.inventory_repo.list_all(), self.order_repo.list_all());

        match fetched {
            Ok((inventory, orders)) => AnalyticsSummary::compute(&inventory, &orders),
            Err(e) => {
                tracing::error!("统计数据读取失败,返回全零汇总: {}", e);
                AnalyticsSummary::zeroed()
            }
        }
    }
}
