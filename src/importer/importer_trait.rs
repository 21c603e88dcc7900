// ==========================================
// 库存看板后端 - 导入接口定义
// ==========================================
// 导入管道:
// 1. 文件解析（按扩展名选择 CSV / Excel）→ RawRecord
// 2. 字段映射与类型转换 → 领域记录
// 3. 校验（引用完整性预检）
// 4. 落库（库存: 逐行对账; 订单: 整批插入）
// ==========================================

use crate::importer::error::ImportResult;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;

// ==========================================
// RawRecord - 解析后的原始行
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    /// 源文件行号（表头为第 1 行）
    pub row_number: usize,
    /// 列名 → 单元格文本（已 TRIM）
    pub fields: HashMap<String, String>,
}

impl RawRecord {
    pub fn new(row_number: usize, fields: HashMap<String, String>) -> Self {
        Self { row_number, fields }
    }

    /// 取单元格值,缺列或空单元格返回 None
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

// ==========================================
// FileParser Trait
// ==========================================
// 实现者: CsvParser / ExcelParser
pub trait FileParser: Send + Sync {
    /// 把上传内容解析为有序的原始行（跳过全空行）
    fn parse_to_raw_records(&self, content: &[u8]) -> ImportResult<Vec<RawRecord>>;
}

// ==========================================
// ImportSummary - 导入结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// 处理行数
    pub count: usize,
    /// 新增行数
    pub inserted: usize,
    /// 覆盖更新行数
    pub updated: usize,
}

// ==========================================
// TabularImporter Trait
// ==========================================
// 实现者: InventoryImporter / OrderImporter
#[async_trait]
pub trait TabularImporter: Send + Sync {
    /// 导入一份上传文件
    ///
    /// # 参数
    /// - filename: 原始文件名（决定解析器）
    /// - content: 文件字节
    async fn import(&self, filename: &str, content: &[u8]) -> ImportResult<ImportSummary>;
}
