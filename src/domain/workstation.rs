// ==========================================
// 工位轮岗系统 - 工位领域模型
// ==========================================
// 红线: 编制为软上限,超编记冲突而非拒绝
// ==========================================

use crate::domain::types::WorkstationId;
use serde::{Deserialize, Serialize};

// ==========================================
// Workstation - 工位
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workstation {
    pub id: WorkstationId,
    pub name: String,
    pub required_workers: u32, // 编制人数
    #[serde(default)]
    pub is_priority: bool,
    pub is_active: bool,
}

impl Workstation {
    pub fn new(id: WorkstationId, name: &str, required_workers: u32) -> Self {
        Self {
            id,
            name: name.to_string(),
            required_workers,
            is_priority: false,
            is_active: true,
        }
    }

    pub fn priority(mut self) -> Self {
        self.is_priority = true;
        self
    }
}

// ==========================================
// Trait: StationCapacity
// ==========================================
// 用途: 补员/均衡阶段的编制检查接口
pub trait StationCapacity {
    /// 当前人数下是否已满编
    fn is_full(&self, assigned: u32) -> bool;

    /// 当前人数下是否超编
    fn is_overflow(&self, assigned: u32) -> bool;

    /// 剩余编制
    fn remaining_slots(&self, assigned: u32) -> u32;

    /// 编制利用率 assigned/required
    ///
    /// 编制为 0 时视为无穷大（永远排在最后）
    fn utilization(&self, assigned: u32) -> f64;
}

impl StationCapacity for Workstation {
    fn is_full(&self, assigned: u32) -> bool {
        assigned >= self.required_workers
    }

    fn is_overflow(&self, assigned: u32) -> bool {
        assigned > self.required_workers
    }

    fn remaining_slots(&self, assigned: u32) -> u32 {
        self.required_workers.saturating_sub(assigned)
    }

    fn utilization(&self, assigned: u32) -> f64 {
        if self.required_workers == 0 {
            return f64::INFINITY;
        }
        f64::from(assigned) / f64::from(self.required_workers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_checks() {
        let ws = Workstation::new(1, "Press", 2);

        assert!(!ws.is_full(1));
        assert!(ws.is_full(2));
        assert!(!ws.is_overflow(2));
        assert!(ws.is_overflow(3));
        assert_eq!(ws.remaining_slots(1), 1);
        assert_eq!(ws.remaining_slots(5), 0);
        assert_eq!(ws.utilization(1), 0.5);
    }

    #[test]
    fn test_zero_capacity_station_is_always_full() {
        let ws = Workstation::new(9, "Spare", 0);

        assert!(ws.is_full(0));
        assert!(ws.utilization(0).is_infinite());
    }
}
