// ==========================================
// 工位轮岗系统 - 轮岗会话与分配记录
// ==========================================
// 红线: 同一会话同一阶段内, worker_id 唯一
// 红线: 会话创建后只允许修改 is_active 与追加分配
// ==========================================

use crate::domain::capability::Capability;
use crate::domain::types::{Phase, WorkerId, WorkstationId};
use crate::domain::worker::Worker;
use crate::domain::workstation::Workstation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// RotationSession - 轮岗会话
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationSession {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
    pub rotation_interval_minutes: u32,
}

impl RotationSession {
    /// 创建新的激活会话（ID 为 UUID v4）
    pub fn new(name: &str, rotation_interval_minutes: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
            is_active: true,
            rotation_interval_minutes,
        }
    }
}

// ==========================================
// RotationAssignment - 单条分配记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RotationAssignment {
    pub session_id: String,
    pub worker_id: WorkerId,
    pub workstation_id: WorkstationId,
    pub phase: Phase,
}

// ==========================================
// RotationState - 上一轮轮岗状态
// ==========================================
// 用途: 强制轮换判定 + 轮岗计数推进
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationState {
    /// 本次生成所属会话
    pub session_id: String,
    /// 上一次提交的分配记录
    #[serde(default)]
    pub previous_assignments: Vec<RotationAssignment>,
}

impl RotationState {
    pub fn new(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            previous_assignments: Vec::new(),
        }
    }

    pub fn with_previous(mut self, previous_assignments: Vec<RotationAssignment>) -> Self {
        self.previous_assignments = previous_assignments;
        self
    }

    /// 员工当前所在工位
    ///
    /// 上一轮的 NEXT 即本轮起点; 无 NEXT 时回落到 CURRENT
    pub fn prior_station(&self, worker_id: WorkerId) -> Option<WorkstationId> {
        let find = |phase: Phase| {
            self.previous_assignments
                .iter()
                .find(|a| a.worker_id == worker_id && a.phase == phase)
                .map(|a| a.workstation_id)
        };
        find(Phase::Next).or_else(|| find(Phase::Current))
    }
}

// ==========================================
// RotationSnapshot - 引擎输入快照
// ==========================================
// 由数据访问协作方提供, 引擎只读
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationSnapshot {
    pub workers: Vec<Worker>,
    pub workstations: Vec<Workstation>,
    pub capabilities: Vec<Capability>,
    pub prior_state: RotationState,
    /// 数据修订号（乐观并发校验用）
    #[serde(default)]
    pub revision: u64,
}

// ==========================================
// RotationCounterUpdate - 轮岗计数推进结果
// ==========================================
// 由引擎计算, 调用方负责落库
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationCounterUpdate {
    pub worker_id: WorkerId,
    pub previous_station: Option<WorkstationId>,
    pub new_station: WorkstationId,
    pub station_changed: bool,
    pub rotations_in_current_station: u32,
    pub last_rotation_timestamp: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(worker_id: WorkerId, workstation_id: WorkstationId, phase: Phase) -> RotationAssignment {
        RotationAssignment {
            session_id: "S0".to_string(),
            worker_id,
            workstation_id,
            phase,
        }
    }

    #[test]
    fn test_prior_station_prefers_next_phase() {
        let state = RotationState::new("S1").with_previous(vec![
            assignment(1, 10, Phase::Current),
            assignment(1, 20, Phase::Next),
            assignment(2, 30, Phase::Current),
        ]);

        assert_eq!(state.prior_station(1), Some(20));
        assert_eq!(state.prior_station(2), Some(30));
        assert_eq!(state.prior_station(3), None);
    }

    #[test]
    fn test_new_session_is_active_with_uuid() {
        let session = RotationSession::new("早班", 120);

        assert!(session.is_active);
        assert!(Uuid::parse_str(&session.id).is_ok());
        assert_eq!(session.rotation_interval_minutes, 120);
    }
}
