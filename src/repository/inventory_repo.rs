// ==========================================
// 库存看板后端 - 库存表仓储
// ==========================================
// 红线: Repository 不含业务规则,只做数据 CRUD
// ==========================================

use crate::domain::{InventoryItem, INVENTORY_TABLE};
use crate::repository::error::RepositoryResult;
use crate::repository::row_store::{decode_rows, encode_row, Query, RowStore};
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct InventoryRepository {
    store: Arc<dyn RowStore>,
}

impl InventoryRepository {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self { store }
    }

    /// 全表查询（存储默认顺序）
    pub async fn list_all(&self) -> RepositoryResult<Vec<InventoryItem>> {
        let rows = self.store.select(&Query::table(INVENTORY_TABLE)).await?;
        decode_rows(INVENTORY_TABLE, rows)
    }

    /// 按件号查询
    pub async fn find_by_part_number(
        &self,
        part_number: &str,
    ) -> RepositoryResult<Option<InventoryItem>> {
        let rows = self
            .store
            .select(
                &Query::table(INVENTORY_TABLE)
                    .eq("part_number", part_number)
                    .limit(1),
            )
            .await?;
        Ok(decode_rows(INVENTORY_TABLE, rows)?.into_iter().next())
    }

    /// 件号是否存在
    pub async fn exists(&self, part_number: &str) -> RepositoryResult<bool> {
        let rows = self
            .store
            .select(
                &Query::table(INVENTORY_TABLE)
                    .eq("part_number", part_number)
                    .limit(1),
            )
            .await?;
        Ok(!rows.is_empty())
    }

    /// 表中是否至少有一条库存
    pub async fn any_exists(&self) -> RepositoryResult<bool> {
        let rows = self
            .store
            .select(&Query::table(INVENTORY_TABLE).limit(1))
            .await?;
        Ok(!rows.is_empty())
    }

    pub async fn insert(&self, item: &InventoryItem) -> RepositoryResult<usize> {
        self.store
            .insert(INVENTORY_TABLE, vec![encode_row(item)?])
            .await
    }

    /// 按件号整体覆盖可变字段
    pub async fn update_by_part_number(&self, item: &InventoryItem) -> RepositoryResult<usize> {
        self.store
            .update(
                &Query::table(INVENTORY_TABLE).eq("part_number", item.part_number.as_str()),
                encode_row(item)?,
            )
            .await
    }

    /// 清空库存表（仅供初始化数据工具使用）
    pub async fn delete_all(&self) -> RepositoryResult<usize> {
        self.store
            .delete(&Query::table(INVENTORY_TABLE).neq("part_number", Value::Null))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::SqliteRowStore;

    fn repo() -> InventoryRepository {
        InventoryRepository::new(Arc::new(SqliteRowStore::new(":memory:").unwrap()))
    }

    fn item(part_number: &str, in_stock: i64) -> InventoryItem {
        InventoryItem {
            part_number: part_number.to_string(),
            name: "Hydraulic Pump".to_string(),
            category: "Hydraulics".to_string(),
            in_stock,
            min_required: 4,
            on_order: 2,
            last_updated: "2024-02-01".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_find_update() {
        let repo = repo();
        assert!(!repo.any_exists().await.unwrap());

        repo.insert(&item("KQ-100", 7)).await.unwrap();
        assert!(repo.any_exists().await.unwrap());
        assert!(repo.exists("KQ-100").await.unwrap());
        assert!(!repo.exists("KQ-999").await.unwrap());

        let updated = repo.update_by_part_number(&item("KQ-100", 1)).await.unwrap();
        assert_eq!(updated, 1);

        let found = repo.find_by_part_number("KQ-100").await.unwrap().unwrap();
        assert_eq!(found.in_stock, 1);
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_all() {
        let repo = repo();
        repo.insert(&item("A", 1)).await.unwrap();
        repo.insert(&item("B", 2)).await.unwrap();

        assert_eq!(repo.delete_all().await.unwrap(), 2);
        assert!(repo.list_all().await.unwrap().is_empty());
    }
}
