// ==========================================
// 库存看板后端 - 订单领域模型
// ==========================================
// 自然键: order_number（系统不强制唯一,仅插入,允许为空）
// id: 存储端生成的行号,插入时不写入,读取时原样返回
// 软外键: part_number → inventory.part_number（导入时校验）
// ==========================================

use crate::domain::null_as_default;
use serde::{Deserialize, Deserializer, Serialize};

/// 缺省订单状态（看板欠货统计口径）
pub const DEFAULT_STATUS: &str = "Pending";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub part_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub part_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: i64,
    #[serde(default = "default_status", deserialize_with = "null_as_pending")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub expected_delivery: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub supplier: String,
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

fn null_as_pending<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_status))
}

impl Order {
    /// 是否为欠货（状态精确等于 "Pending"）
    pub fn is_pending(&self) -> bool {
        self.status == DEFAULT_STATUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_is_exact_match() {
        let mut order = Order {
            id: None,
            order_number: "PO-1".to_string(),
            part_number: "KQ-001".to_string(),
            part_name: String::new(),
            quantity: 1,
            status: "Pending".to_string(),
            order_date: String::new(),
            expected_delivery: String::new(),
            supplier: String::new(),
        };
        assert!(order.is_pending());

        order.status = "pending".to_string();
        assert!(!order.is_pending());
    }

    #[test]
    fn test_missing_status_deserializes_as_pending() {
        let json = serde_json::json!({ "order_number": "PO-2", "part_number": "KQ-001", "id": 7 });
        let order: Order = serde_json::from_value(json).unwrap();
        assert_eq!(order.status, "Pending");
        assert_eq!(order.id, Some(7));
    }

    #[test]
    fn test_null_columns_read_as_defaults() {
        let json = serde_json::json!({
            "id": 3,
            "order_number": null,
            "part_number": "KQ-001",
            "part_name": null,
            "quantity": null,
            "status": null,
            "order_date": "2024-03-01",
            "expected_delivery": null,
            "supplier": null
        });
        let order: Order = serde_json::from_value(json).unwrap();

        assert_eq!(order.order_number, "");
        assert_eq!(order.quantity, 0);
        assert_eq!(order.status, "Pending");
        assert_eq!(order.order_date, "2024-03-01");
    }

    #[test]
    fn test_unsaved_order_serializes_without_id() {
        let order = Order {
            id: None,
            order_number: "PO-9".to_string(),
            part_number: "KQ-001".to_string(),
            part_name: String::new(),
            quantity: 1,
            status: DEFAULT_STATUS.to_string(),
            order_date: String::new(),
            expected_delivery: String::new(),
            supplier: String::new(),
        };

        let value = serde_json::to_value(&order).unwrap();
        assert!(value.get("id").is_none());
    }
}
