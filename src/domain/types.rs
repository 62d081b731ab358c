// ==========================================
// 工位轮岗系统 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 员工 ID
pub type WorkerId = i64;

/// 工位 ID
pub type WorkstationId = i64;

// ==========================================
// 轮岗阶段 (Phase)
// ==========================================
// CURRENT: 本周期; NEXT: 下一周期
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Current, // 当前位置
    Next,    // 下一位置
}

impl Phase {
    /// 固定处理顺序: CURRENT -> NEXT
    pub const ALL: [Phase; 2] = [Phase::Current, Phase::Next];
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Current => write!(f, "CURRENT"),
            Phase::Next => write!(f, "NEXT"),
        }
    }
}

// ==========================================
// 组长类型 (Leadership Type)
// ==========================================
// 决定组长在哪个阶段被固定到其负责工位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadershipType {
    None,       // 非组长
    BothParts,  // 两个阶段都固定
    FirstPart,  // 仅 CURRENT 固定
    SecondPart, // 仅 NEXT 固定
}

impl LeadershipType {
    /// 该类型是否要求在指定阶段固定
    pub fn pins(&self, phase: Phase) -> bool {
        matches!(
            (self, phase),
            (LeadershipType::BothParts, _)
                | (LeadershipType::FirstPart, Phase::Current)
                | (LeadershipType::SecondPart, Phase::Next)
        )
    }
}

impl Default for LeadershipType {
    fn default() -> Self {
        LeadershipType::None
    }
}

impl fmt::Display for LeadershipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeadershipType::None => write!(f, "NONE"),
            LeadershipType::BothParts => write!(f, "BOTH_PARTS"),
            LeadershipType::FirstPart => write!(f, "FIRST_PART"),
            LeadershipType::SecondPart => write!(f, "SECOND_PART"),
        }
    }
}

// ==========================================
// 落位原因 (Placement Reason)
// ==========================================
// 红线: 每一次落位都必须能解释来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlacementReason {
    TrainingPin,   // 带教固定
    LeadershipPin, // 组长固定
    PriorityFill,  // 优先工位补员
    BalanceFill,   // 均衡分配
    Overflow,      // 超编兜底
}

impl fmt::Display for PlacementReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementReason::TrainingPin => write!(f, "TRAINING_PIN"),
            PlacementReason::LeadershipPin => write!(f, "LEADERSHIP_PIN"),
            PlacementReason::PriorityFill => write!(f, "PRIORITY_FILL"),
            PlacementReason::BalanceFill => write!(f, "BALANCE_FILL"),
            PlacementReason::Overflow => write!(f, "OVERFLOW"),
        }
    }
}

// ==========================================
// PerPhase - 按阶段分桶的值
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerPhase<T> {
    pub current: T,
    pub next: T,
}

impl<T> PerPhase<T> {
    pub fn new(current: T, next: T) -> Self {
        Self { current, next }
    }

    pub fn get(&self, phase: Phase) -> &T {
        match phase {
            Phase::Current => &self.current,
            Phase::Next => &self.next,
        }
    }

    pub fn get_mut(&mut self, phase: Phase) -> &mut T {
        match phase {
            Phase::Current => &mut self.current,
            Phase::Next => &mut self.next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leadership_type_pins() {
        assert!(LeadershipType::BothParts.pins(Phase::Current));
        assert!(LeadershipType::BothParts.pins(Phase::Next));
        assert!(LeadershipType::FirstPart.pins(Phase::Current));
        assert!(!LeadershipType::FirstPart.pins(Phase::Next));
        assert!(!LeadershipType::SecondPart.pins(Phase::Current));
        assert!(LeadershipType::SecondPart.pins(Phase::Next));
        assert!(!LeadershipType::None.pins(Phase::Current));
    }

    #[test]
    fn test_phase_serde_uses_screaming_case() {
        let json = serde_json::to_string(&Phase::Next).unwrap();
        assert_eq!(json, "\"NEXT\"");
        let lt: LeadershipType = serde_json::from_str("\"BOTH_PARTS\"").unwrap();
        assert_eq!(lt, LeadershipType::BothParts);
    }
}
