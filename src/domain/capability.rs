// ==========================================
// 工位轮岗系统 - 员工资质模型
// ==========================================
// 规则: 有效 ∧ 等级 ≥ 2 ∧ (已认证 ∨ 等级 ≥ 3) 才可分配
// ==========================================

use crate::domain::types::{WorkerId, WorkstationId};
use serde::{Deserialize, Serialize};

/// 默认最低熟练等级
pub const DEFAULT_MIN_COMPETENCY_LEVEL: u8 = 2;

/// 未认证时的最低熟练等级
pub const DEFAULT_UNCERTIFIED_MIN_COMPETENCY_LEVEL: u8 = 3;

// ==========================================
// Capability - 员工在某工位的资质
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    pub worker_id: WorkerId,
    pub workstation_id: WorkstationId,
    pub competency_level: u8, // 1-4
    #[serde(default)]
    pub is_certified: bool,
    pub is_active: bool,
}

impl Capability {
    pub fn new(worker_id: WorkerId, workstation_id: WorkstationId, competency_level: u8) -> Self {
        Self {
            worker_id,
            workstation_id,
            competency_level,
            is_certified: false,
            is_active: true,
        }
    }

    pub fn certified(mut self) -> Self {
        self.is_certified = true;
        self
    }

    /// 按默认阈值判断是否可分配
    pub fn is_assignable(&self) -> bool {
        self.is_assignable_with(
            DEFAULT_MIN_COMPETENCY_LEVEL,
            DEFAULT_UNCERTIFIED_MIN_COMPETENCY_LEVEL,
        )
    }

    /// 按指定阈值判断是否可分配
    pub fn is_assignable_with(&self, min_level: u8, uncertified_min_level: u8) -> bool {
        self.is_active
            && self.competency_level >= min_level
            && (self.is_certified || self.competency_level >= uncertified_min_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignable_rule() {
        // 等级 1: 无论是否认证都不可分配
        assert!(!Capability::new(1, 1, 1).certified().is_assignable());
        // 等级 2: 需认证
        assert!(!Capability::new(1, 1, 2).is_assignable());
        assert!(Capability::new(1, 1, 2).certified().is_assignable());
        // 等级 3+: 无需认证
        assert!(Capability::new(1, 1, 3).is_assignable());
        assert!(Capability::new(1, 1, 4).is_assignable());
    }

    #[test]
    fn test_inactive_capability_never_assignable() {
        let mut cap = Capability::new(1, 1, 4).certified();
        cap.is_active = false;
        assert!(!cap.is_assignable());
    }
}
