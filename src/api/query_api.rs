// ==========================================
// 库存看板后端 - 查询API
// ==========================================
// 全表读取,存储失败时记录日志并返回空序列
// ==========================================

use crate::domain::{InventoryItem, Order};
use crate::repository::{InventoryRepository, OrderRepository};

pub struct QueryApi {
    inventory_repo: InventoryRepository,
    order_repo: OrderRepository,
}

impl QueryApi {
    pub fn new(inventory_repo: InventoryRepository, order_repo: OrderRepository) -> Self {
        Self {
            inventory_repo,
            order_repo,
        }
    }

    pub async fn list_inventory(&self) -> Vec<InventoryItem> {
        match self.inventory_repo.list_all().await {
            Ok(items) => items,
            Err(e) => {
                tracing::error!("读取库存失败,返回空列表: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn list_orders(&self) -> Vec<Order> {
        match self.order_repo.list_all().await {
            Ok(orders) => orders,
            Err(e) => {
                tracing::error!("读取订单失败,返回空列表: {}", e);
                Vec::new()
            }
        }
    }
}
