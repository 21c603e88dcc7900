// ==========================================
// 库存看板后端 - 样例数据灌入
// ==========================================
// 数据: <样例目录>/sample_inventory.csv, sample_orders.csv
// 顺序: 清空订单 → 清空库存 → 逐行插入库存 → 逐行插入订单
// 策略: 遇到第一条失败即停止（已插入的行保留）
// ==========================================

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::{InventoryItem, Order};
use crate::importer::{CsvParser, FieldMapper, FileParser, ImportError, RawRecord};
use crate::repository::{InventoryRepository, OrderRepository, RepositoryError};

pub const SAMPLE_INVENTORY_FILE: &str = "sample_inventory.csv";
pub const SAMPLE_ORDERS_FILE: &str = "sample_orders.csv";

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid sample data in {}: {source}", path.display())]
    Data { path: PathBuf, source: ImportError },

    #[error("failed to insert {entity} '{key}': {source}")]
    Insert {
        entity: &'static str,
        key: String,
        source: RepositoryError,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 灌入结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub inventory: usize,
    pub orders: usize,
}

pub struct SampleSeeder {
    inventory_repo: InventoryRepository,
    order_repo: OrderRepository,
    data_dir: PathBuf,
}

impl SampleSeeder {
    pub fn new(
        inventory_repo: InventoryRepository,
        order_repo: OrderRepository,
        data_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            inventory_repo,
            order_repo,
            data_dir: data_dir.into(),
        }
    }

    /// 清空两张表并重新灌入全部样例数据
    pub async fn seed_all(&self) -> Result<SeedReport, SeedError> {
        // 先读取并校验两份文件,避免清空后才发现样例数据不可用
        let items = self.load_inventory().await?;
        let orders = self.load_orders().await?;

        let removed_orders = self.order_repo.delete_all().await?;
        let removed_items = self.inventory_repo.delete_all().await?;
        tracing::info!(
            "已清空: orders={}, inventory={}",
            removed_orders,
            removed_items
        );

        let inventory = self.insert_inventory(&items).await?;
        let orders = self.insert_orders(&orders).await?;
        Ok(SeedReport { inventory, orders })
    }

    /// 库存表为空时灌入样例库存（服务启动钩子）
    ///
    /// # 返回
    /// - Ok(None): 库存表非空,未做任何操作
    /// - Ok(Some(n)): 插入 n 条库存
    pub async fn seed_inventory_if_empty(&self) -> Result<Option<usize>, SeedError> {
        if self.inventory_repo.any_exists().await? {
            return Ok(None);
        }
        let items = self.load_inventory().await?;
        let inserted = self.insert_inventory(&items).await?;
        Ok(Some(inserted))
    }

    async fn load_inventory(&self) -> Result<Vec<InventoryItem>, SeedError> {
        let path = self.data_dir.join(SAMPLE_INVENTORY_FILE);
        let records = read_records(&path).await?;
        let mapper = FieldMapper;
        records
            .iter()
            .map(|record| mapper.map_to_inventory_item(record))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| SeedError::Data { path, source })
    }

    async fn load_orders(&self) -> Result<Vec<Order>, SeedError> {
        let path = self.data_dir.join(SAMPLE_ORDERS_FILE);
        let records = read_records(&path).await?;
        let mapper = FieldMapper;
        records
            .iter()
            .map(|record| mapper.map_to_order(record))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| SeedError::Data { path, source })
    }

    async fn insert_inventory(&self, items: &[InventoryItem]) -> Result<usize, SeedError> {
        for item in items {
            self.inventory_repo
                .insert(item)
                .await
                .map_err(|source| SeedError::Insert {
                    entity: "inventory item",
                    key: item.part_number.clone(),
                    source,
                })?;
            tracing::debug!("已插入库存件 {}", item.part_number);
        }
        tracing::info!("已灌入 {} 条库存", items.len());
        Ok(items.len())
    }

    async fn insert_orders(&self, orders: &[Order]) -> Result<usize, SeedError> {
        for order in orders {
            self.order_repo
                .insert_batch(std::slice::from_ref(order))
                .await
                .map_err(|source| SeedError::Insert {
                    entity: "order",
                    key: order.order_number.clone(),
                    source,
                })?;
            tracing::debug!("已插入订单 {}", order.order_number);
        }
        tracing::info!("已灌入 {} 条订单", orders.len());
        Ok(orders.len())
    }
}

async fn read_records(path: &Path) -> Result<Vec<RawRecord>, SeedError> {
    let content = tokio::fs::read(path).await.map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    CsvParser
        .parse_to_raw_records(&content)
        .map_err(|source| SeedError::Data {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{RowStore, SqliteRowStore};
    use std::sync::Arc;

    fn write_samples(dir: &Path, inventory: &str, orders: &str) {
        std::fs::write(dir.join(SAMPLE_INVENTORY_FILE), inventory).unwrap();
        std::fs::write(dir.join(SAMPLE_ORDERS_FILE), orders).unwrap();
    }

    fn seeder(dir: &Path) -> (SampleSeeder, InventoryRepository, OrderRepository) {
        let store: Arc<dyn RowStore> = Arc::new(SqliteRowStore::new(":memory:").unwrap());
        let inventory_repo = InventoryRepository::new(store.clone());
        let order_repo = OrderRepository::new(store);
        (
            SampleSeeder::new(inventory_repo.clone(), order_repo.clone(), dir),
            inventory_repo,
            order_repo,
        )
    }

    const INVENTORY: &str = "Part Number,Name,Category,In Stock,Min Required,On Order,Last Updated\nKQ-1,Pad,Brakes,4,2,0,2024-01-01\nKQ-2,Seal,Engine,1,3,5,2024-01-02\n";
    const ORDERS: &str = "Order Number,Part Number,Part Name,Quantity,Status,Order Date,Expected Delivery,Supplier\nPO-1,KQ-2,Seal,5,Pending,2024-01-03,2024-01-20,Acme\n";

    #[tokio::test]
    async fn test_seed_all_replaces_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        write_samples(dir.path(), INVENTORY, ORDERS);
        let (seeder, inventory_repo, order_repo) = seeder(dir.path());

        let first = seeder.seed_all().await.unwrap();
        let second = seeder.seed_all().await.unwrap();

        assert_eq!(first, SeedReport { inventory: 2, orders: 1 });
        assert_eq!(second, first);
        assert_eq!(inventory_repo.list_all().await.unwrap().len(), 2);
        assert_eq!(order_repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_seed_stops_at_first_failing_order() {
        let dir = tempfile::tempdir().unwrap();
        let orders = format!("{}PO-2,KQ-404,Ghost,1,Pending,,,\nPO-3,KQ-1,Pad,1,Pending,,,\n", ORDERS);
        write_samples(dir.path(), INVENTORY, &orders);
        let (seeder, _, order_repo) = seeder(dir.path());

        let result = seeder.seed_all().await;

        match result {
            Err(SeedError::Insert { entity, key, .. }) => {
                assert_eq!(entity, "order");
                assert_eq!(key, "PO-2");
            }
            other => panic!("Expected insert failure, got {:?}", other),
        }
        assert_eq!(order_repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_seed_inventory_only_when_empty() {
        let dir = tempfile::tempdir().unwrap();
        write_samples(dir.path(), INVENTORY, ORDERS);
        let (seeder, _, _) = seeder(dir.path());

        assert_eq!(seeder.seed_inventory_if_empty().await.unwrap(), Some(2));
        assert_eq!(seeder.seed_inventory_if_empty().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_sample_file() {
        let dir = tempfile::tempdir().unwrap();
        let (seeder, _, _) = seeder(dir.path());

        assert!(matches!(seeder.seed_all().await, Err(SeedError::Io { .. })));
    }
}
