// ==========================================
// 库存看板后端 - 看板汇总
// ==========================================
// 口径:
// - total_parts = Σ in_stock
// - total_value = total_parts × 1000（单价占位值,非真实估值）
// - low_stock   = in_stock <= min_required 的件数
// - backorders  = status == "Pending" 的订单数
// - turnover_rate / accuracy_rate: 常量占位,total_parts 为 0 时置 0
// 溢出: 累加与乘法饱和到 i64::MAX
// ==========================================

use crate::domain::{InventoryItem, Order};
use serde::{Deserialize, Serialize};

/// 单价占位值
pub const PLACEHOLDER_UNIT_VALUE: i64 = 1000;

/// 周转率占位值
pub const PLACEHOLDER_TURNOVER_RATE: f64 = 4.2;

/// 准确率占位值
pub const PLACEHOLDER_ACCURACY_RATE: f64 = 98.5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_parts: i64,
    pub total_value: i64,
    pub low_stock: usize,
    pub backorders: usize,
    pub turnover_rate: f64,
    pub accuracy_rate: f64,
}

impl AnalyticsSummary {
    /// 全零汇总（任一表读取失败时返回）
    pub fn zeroed() -> Self {
        Self::default()
    }

    /// 基于全量库存与订单计算汇总
    pub fn compute(inventory: &[InventoryItem], orders: &[Order]) -> Self {
        let total_parts = inventory
            .iter()
            .fold(0i64, |acc, item| acc.saturating_add(item.in_stock));
        let total_value = total_parts.saturating_mul(PLACEHOLDER_UNIT_VALUE);
        if total_value == i64::MAX {
            tracing::warn!("库存总量过大,汇总值已饱和: total_parts={}", total_parts);
        }
        let low_stock = inventory.iter().filter(|item| item.is_low_stock()).count();
        let backorders = orders.iter().filter(|order| order.is_pending()).count();

        let (turnover_rate, accuracy_rate) = if total_parts == 0 {
            (0.0, 0.0)
        } else {
            (PLACEHOLDER_TURNOVER_RATE, PLACEHOLDER_ACCURACY_RATE)
        };

        Self {
            total_parts,
            total_value,
            low_stock,
            backorders,
            turnover_rate,
            accuracy_rate,
        }
    }
}
