// ==========================================
// 工位轮岗系统 - 约束违规记录
// ==========================================
// 红线: 违规一律收集返回, 不得中途抛出, 不得静默丢弃
// ==========================================

use crate::domain::types::{Phase, WorkerId, WorkstationId};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 违规类型 (Violation Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    NoAssignableCapability,     // 无可分配资质
    TrainerUnavailable,         // 带教人不可用
    TrainingStationUnavailable, // 带教工位不可用
    TrainerConflict,            // 带教人已被其他带教关系占用
    LeaderOverriddenByTraining, // 组长固定被带教固定覆盖
    LeaderNotPlaced,            // 组长未能固定
    UnmetPriorityCapacity,      // 优先工位缺员
    CapacityOverflow,           // 超编
    UnassignableThisPhase,      // 本阶段无可分配工位
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            ViolationKind::NoAssignableCapability => "NO_ASSIGNABLE_CAPABILITY",
            ViolationKind::TrainerUnavailable => "TRAINER_UNAVAILABLE",
            ViolationKind::TrainingStationUnavailable => "TRAINING_STATION_UNAVAILABLE",
            ViolationKind::TrainerConflict => "TRAINER_CONFLICT",
            ViolationKind::LeaderOverriddenByTraining => "LEADER_OVERRIDDEN_BY_TRAINING",
            ViolationKind::LeaderNotPlaced => "LEADER_NOT_PLACED",
            ViolationKind::UnmetPriorityCapacity => "UNMET_PRIORITY_CAPACITY",
            ViolationKind::CapacityOverflow => "CAPACITY_OVERFLOW",
            ViolationKind::UnassignableThisPhase => "UNASSIGNABLE_THIS_PHASE",
        };
        write!(f, "{}", code)
    }
}

// ==========================================
// Violation - 非致命违规
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub phase: Option<Phase>,
    pub worker_id: Option<WorkerId>,
    pub workstation_id: Option<WorkstationId>,
    pub message: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            phase: None,
            worker_id: None,
            workstation_id: None,
            message: message.into(),
        }
    }

    pub fn in_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn for_worker(mut self, worker_id: WorkerId) -> Self {
        self.worker_id = Some(worker_id);
        self
    }

    pub fn at_station(mut self, workstation_id: WorkstationId) -> Self {
        self.workstation_id = Some(workstation_id);
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.phase {
            Some(phase) => write!(f, "{} [{}]: {}", self.kind, phase, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}
