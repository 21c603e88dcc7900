// ==========================================
// 库存看板后端 - 冲突处理器实现
// ==========================================
// 职责: 检测同批次内重复件号
// 策略: 仅告警; 对账按行序执行,后出现的行覆盖先出现的行
// ==========================================

use crate::domain::InventoryItem;
use std::collections::HashMap;

pub struct ConflictHandler;

impl ConflictHandler {
    /// 检测同批次内重复件号
    ///
    /// # 返回
    /// - Vec<(批内序号, part_number)>: 重复记录列表（不包括第一次出现）
    pub fn detect_duplicates(&self, items: &[InventoryItem]) -> Vec<(usize, String)> {
        let mut first_occurrence: HashMap<&str, usize> = HashMap::new();
        let mut duplicates = Vec::new();

        for (idx, item) in items.iter().enumerate() {
            if first_occurrence.contains_key(item.part_number.as_str()) {
                duplicates.push((idx, item.part_number.clone()));
            } else {
                first_occurrence.insert(item.part_number.as_str(), idx);
            }
        }

        duplicates
    }
}
