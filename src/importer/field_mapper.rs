// ==========================================
// 库存看板后端 - 字段映射器实现
// ==========================================
// 职责: 源列名 → 领域字段映射 + 类型转换
// 规则:
// - 列名精确匹配（区分大小写）
// - 缺列/空单元格: 文本字段取 ""、数值字段取 0、订单状态取 "Pending"
// - 数值非法或为负: 整批导入失败
// - 库存件号缺失: 整批导入失败（订单号不强制,缺失取 ""）
// ==========================================

use crate::domain::order::DEFAULT_STATUS;
use crate::domain::{InventoryItem, Order};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::RawRecord;

// ===== 库存表列名 =====
pub mod inventory_columns {
    pub const PART_NUMBER: &str = "Part Number";
    pub const NAME: &str = "Name";
    pub const CATEGORY: &str = "Category";
    pub const IN_STOCK: &str = "In Stock";
    pub const MIN_REQUIRED: &str = "Min Required";
    pub const ON_ORDER: &str = "On Order";
    pub const LAST_UPDATED: &str = "Last Updated";
}

// ===== 订单表列名 =====
pub mod order_columns {
    pub const ORDER_NUMBER: &str = "Order Number";
    pub const PART_NUMBER: &str = "Part Number";
    pub const PART_NAME: &str = "Part Name";
    pub const QUANTITY: &str = "Quantity";
    pub const STATUS: &str = "Status";
    pub const ORDER_DATE: &str = "Order Date";
    pub const EXPECTED_DELIVERY: &str = "Expected Delivery";
    pub const SUPPLIER: &str = "Supplier";
}

pub struct FieldMapper;

impl FieldMapper {
    /// 原始行 → InventoryItem
    pub fn map_to_inventory_item(&self, row: &RawRecord) -> ImportResult<InventoryItem> {
        use inventory_columns::*;

        Ok(InventoryItem {
            part_number: self.get_key(row, PART_NUMBER)?,
            name: self.get_string(row, NAME),
            category: self.get_string(row, CATEGORY),
            in_stock: self.parse_count(row, IN_STOCK)?,
            min_required: self.parse_count(row, MIN_REQUIRED)?,
            on_order: self.parse_count(row, ON_ORDER)?,
            last_updated: self.get_string(row, LAST_UPDATED),
        })
    }

    /// 原始行 → Order
    pub fn map_to_order(&self, row: &RawRecord) -> ImportResult<Order> {
        use order_columns::*;

        Ok(Order {
            id: None,
            order_number: self.get_string(row, ORDER_NUMBER),
            part_number: self.get_string(row, PART_NUMBER),
            part_name: self.get_string(row, PART_NAME),
            quantity: self.parse_count(row, QUANTITY)?,
            status: row
                .get(STATUS)
                .map(str::to_string)
                .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            order_date: self.get_string(row, ORDER_DATE),
            expected_delivery: self.get_string(row, EXPECTED_DELIVERY),
            supplier: self.get_string(row, SUPPLIER),
        })
    }

    /// 提取文本字段（缺失为空串）
    fn get_string(&self, row: &RawRecord, key: &str) -> String {
        row.get(key).unwrap_or_default().to_string()
    }

    /// 提取自然键（缺失即失败）
    fn get_key(&self, row: &RawRecord, key: &str) -> ImportResult<String> {
        row.get(key)
            .map(str::to_string)
            .ok_or_else(|| ImportError::PrimaryKeyMissing {
                row: row.row_number,
                field: key.to_string(),
            })
    }

    /// 解析非负整数
    ///
    /// 说明：
    /// - 接受 "10" 与 "10.0"（表格导出常见）,小数部分截断
    /// - 缺失为 0
    fn parse_count(&self, row: &RawRecord, key: &str) -> ImportResult<i64> {
        let value = match row.get(key) {
            None => return Ok(0),
            Some(v) => v,
        };

        let parsed = value.parse::<i64>().ok().or_else(|| {
            value
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        });

        match parsed {
            Some(n) if n < 0 => Err(ImportError::ValueRangeError {
                row: row.row_number,
                field: key.to_string(),
                value: n,
            }),
            Some(n) => Ok(n),
            None => Err(ImportError::TypeConversionError {
                row: row.row_number,
                field: key.to_string(),
                value: value.to_string(),
            }),
        }
    }
}
