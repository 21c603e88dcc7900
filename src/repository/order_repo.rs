// ==========================================
// 库存看板后端 - 订单表仓储
// ==========================================
// 红线: Repository 不含业务规则,只做数据 CRUD
// ==========================================

use crate::domain::{Order, ORDERS_TABLE};
use crate::repository::error::RepositoryResult;
use crate::repository::row_store::{decode_rows, encode_row, Query, RowStore};
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct OrderRepository {
    store: Arc<dyn RowStore>,
}

impl OrderRepository {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> RepositoryResult<Vec<Order>> {
        let rows = self.store.select(&Query::table(ORDERS_TABLE)).await?;
        decode_rows(ORDERS_TABLE, rows)
    }

    /// 整批插入（存储端拒绝时整批失败）
    pub async fn insert_batch(&self, orders: &[Order]) -> RepositoryResult<usize> {
        let rows = orders
            .iter()
            .map(encode_row)
            .collect::<RepositoryResult<Vec<_>>>()?;
        self.store.insert(ORDERS_TABLE, rows).await
    }

    /// 清空订单表（仅供初始化数据工具使用）
    pub async fn delete_all(&self) -> RepositoryResult<usize> {
        self.store
            .delete(&Query::table(ORDERS_TABLE).neq("order_number", Value::Null))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InventoryItem;
    use crate::repository::{InventoryRepository, SqliteRowStore};

    fn order(order_number: &str, part_number: &str) -> Order {
        Order {
            id: None,
            order_number: order_number.to_string(),
            part_number: part_number.to_string(),
            part_name: "Fuel Nozzle".to_string(),
            quantity: 3,
            status: "Pending".to_string(),
            order_date: "2024-03-01".to_string(),
            expected_delivery: "2024-03-20".to_string(),
            supplier: "Acme Aero".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_batch_and_list() {
        let store: Arc<dyn RowStore> = Arc::new(SqliteRowStore::new(":memory:").unwrap());
        InventoryRepository::new(store.clone())
            .insert(&InventoryItem {
                part_number: "KQ-7".to_string(),
                name: "Fuel Nozzle".to_string(),
                category: "Engine".to_string(),
                in_stock: 1,
                min_required: 1,
                on_order: 0,
                last_updated: String::new(),
            })
            .await
            .unwrap();

        let repo = OrderRepository::new(store);
        let count = repo
            .insert_batch(&[order("PO-1", "KQ-7"), order("PO-1", "KQ-7")])
            .await
            .unwrap();
        assert_eq!(count, 2);

        // 订单号不唯一: 两条都保留
        let orders = repo.list_all().await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0], order("PO-1", "KQ-7"));

        assert_eq!(repo.delete_all().await.unwrap(), 2);
    }
}
