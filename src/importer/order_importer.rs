// ==========================================
// 库存看板后端 - 订单导入器
// ==========================================
// 流程:
// 1. 前置条件: 库存表至少一条记录（否则不读取文件直接失败）
// 2. 解析文件 → Order（任一行非法即整批失败）
// 3. 引用完整性预检: 每个件号必须存在于库存表,任一缺失则整批失败、零写入
// 4. 整批插入（存储端拒绝则整批失败）
// 约束: 订单仅插入,不按订单号去重
// ==========================================

use crate::domain::Order;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::importer_trait::{ImportSummary, TabularImporter};
use crate::repository::{InventoryRepository, OrderRepository};
use async_trait::async_trait;
use std::collections::HashSet;

pub struct OrderImporter {
    inventory_repo: InventoryRepository,
    order_repo: OrderRepository,
    parser: UniversalFileParser,
    mapper: FieldMapper,
}

impl OrderImporter {
    pub fn new(inventory_repo: InventoryRepository, order_repo: OrderRepository) -> Self {
        Self {
            inventory_repo,
            order_repo,
            parser: UniversalFileParser,
            mapper: FieldMapper,
        }
    }

    /// 引用完整性预检（每个件号只查询一次）
    ///
    /// # 返回
    /// - Ok(()): 全部件号存在
    /// - Err(UnknownPartNumbers): 缺失件号列表（按首次出现顺序）
    async fn check_part_numbers(&self, orders: &[Order]) -> ImportResult<()> {
        let mut checked = HashSet::new();
        let mut missing = Vec::new();

        for order in orders {
            if !checked.insert(order.part_number.as_str()) {
                continue;
            }
            if !self.inventory_repo.exists(&order.part_number).await? {
                missing.push(order.part_number.clone());
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ImportError::UnknownPartNumbers(missing))
        }
    }
}

#[async_trait]
impl TabularImporter for OrderImporter {
    async fn import(&self, filename: &str, content: &[u8]) -> ImportResult<ImportSummary> {
        if !self.inventory_repo.any_exists().await? {
            return Err(ImportError::InventoryEmpty);
        }

        let records = self.parser.parse(filename, content)?;
        let orders = records
            .iter()
            .map(|record| self.mapper.map_to_order(record))
            .collect::<ImportResult<Vec<_>>>()?;

        self.check_part_numbers(&orders).await?;

        let inserted = if orders.is_empty() {
            0
        } else {
            self.order_repo.insert_batch(&orders).await?
        };

        tracing::info!("订单导入完成: file={}, count={}", filename, inserted);
        Ok(ImportSummary {
            count: orders.len(),
            inserted,
            updated: 0,
        })
    }
}
