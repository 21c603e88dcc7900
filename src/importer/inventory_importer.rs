// ==========================================
// 库存看板后端 - 库存导入器（对账）
// ==========================================
// 流程:
// 1. 解析文件 → RawRecord
// 2. 全部行映射为 InventoryItem（任一行非法即整批失败,此时尚未写库）
// 3. 按行序逐行对账: 按件号查询 → 存在则覆盖更新,否则插入
// 约束:
// - 每行一次独立存储往返,无跨行事务
// - 中途存储失败: 已处理的行保持已提交,后续行不再处理
// ==========================================

use crate::domain::InventoryItem;
use crate::importer::conflict_handler::ConflictHandler;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::importer_trait::{ImportSummary, TabularImporter};
use crate::repository::InventoryRepository;
use async_trait::async_trait;

pub struct InventoryImporter {
    repo: InventoryRepository,
    parser: UniversalFileParser,
    mapper: FieldMapper,
    conflict_handler: ConflictHandler,
}

impl InventoryImporter {
    pub fn new(repo: InventoryRepository) -> Self {
        Self {
            repo,
            parser: UniversalFileParser,
            mapper: FieldMapper,
            conflict_handler: ConflictHandler,
        }
    }

    /// 逐行对账
    async fn reconcile(&self, items: &[InventoryItem]) -> ImportResult<ImportSummary> {
        let mut summary = ImportSummary {
            count: items.len(),
            ..ImportSummary::default()
        };

        for item in items {
            if self.repo.exists(&item.part_number).await? {
                self.repo.update_by_part_number(item).await?;
                summary.updated += 1;
                tracing::debug!("库存件 {} 已覆盖更新", item.part_number);
            } else {
                self.repo.insert(item).await?;
                summary.inserted += 1;
                tracing::debug!("库存件 {} 已新增", item.part_number);
            }
        }

        Ok(summary)
    }
}

#[async_trait]
impl TabularImporter for InventoryImporter {
    async fn import(&self, filename: &str, content: &[u8]) -> ImportResult<ImportSummary> {
        let records = self.parser.parse(filename, content)?;

        let items = records
            .iter()
            .map(|record| self.mapper.map_to_inventory_item(record))
            .collect::<ImportResult<Vec<_>>>()?;

        for (idx, part_number) in self.conflict_handler.detect_duplicates(&items) {
            tracing::warn!(
                "文件 {} 批内第 {} 条件号 {} 重复,将覆盖先前行",
                filename,
                idx + 1,
                part_number
            );
        }

        let summary = self.reconcile(&items).await?;
        tracing::info!(
            "库存导入完成: file={}, count={}, inserted={}, updated={}",
            filename,
            summary.count,
            summary.inserted,
            summary.updated
        );
        Ok(summary)
    }
}
