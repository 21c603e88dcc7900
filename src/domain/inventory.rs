// ==========================================
// 库存看板后端 - 库存领域模型
// ==========================================
// 自然键: part_number（唯一）
// 用途: 导入层写入,查询/看板层只读
// ==========================================

use crate::domain::null_as_default;
use serde::{Deserialize, Serialize};

// ==========================================
// InventoryItem - 库存件
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    // ===== 主键 =====
    pub part_number: String, // 件号（自然键）

    // ===== 基础信息 =====
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,

    // ===== 数量 =====
    #[serde(default, deserialize_with = "null_as_default")]
    pub in_stock: i64,     // 在库数量
    #[serde(default, deserialize_with = "null_as_default")]
    pub min_required: i64, // 最低库存（补货阈值）
    #[serde(default, deserialize_with = "null_as_default")]
    pub on_order: i64,     // 在途数量

    // ===== 时间 =====
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_updated: String, // 不透明日期文本,不做解析
}

impl InventoryItem {
    /// 低库存判定: in_stock <= min_required（派生标志,不落库）
    pub fn is_low_stock(&self) -> bool {
        self.in_stock <= self.min_required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(in_stock: i64, min_required: i64) -> InventoryItem {
        InventoryItem {
            part_number: "KQ-001".to_string(),
            name: "Brake Pad".to_string(),
            category: "Landing Gear".to_string(),
            in_stock,
            min_required,
            on_order: 0,
            last_updated: "2024-01-15".to_string(),
        }
    }

    #[test]
    fn test_low_stock_boundary_is_inclusive() {
        assert!(item(5, 5).is_low_stock());
        assert!(item(2, 5).is_low_stock());
        assert!(!item(10, 5).is_low_stock());
    }

    #[test]
    fn test_deserialize_ignores_store_columns_and_fills_defaults() {
        let json = serde_json::json!({
            "part_number": "KQ-002",
            "in_stock": 3,
            "created_at": "2024-01-01T00:00:00Z"
        });
        let parsed: InventoryItem = serde_json::from_value(json).unwrap();

        assert_eq!(parsed.part_number, "KQ-002");
        assert_eq!(parsed.in_stock, 3);
        assert_eq!(parsed.min_required, 0);
        assert_eq!(parsed.name, "");
    }

    #[test]
    fn test_null_columns_read_as_defaults() {
        let json = serde_json::json!({
            "part_number": "KQ-003",
            "name": null,
            "category": "Engine",
            "in_stock": null,
            "min_required": 2,
            "on_order": null,
            "last_updated": null
        });
        let parsed: InventoryItem = serde_json::from_value(json).unwrap();

        assert_eq!(parsed.name, "");
        assert_eq!(parsed.category, "Engine");
        assert_eq!(parsed.in_stock, 0);
        assert_eq!(parsed.min_required, 2);
        assert_eq!(parsed.last_updated, "");
    }
}
