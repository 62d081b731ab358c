// ==========================================
// 工位轮岗系统 - 轮岗网格 (只读视图)
// ==========================================
// 用途: 一个会话的两阶段分配结果 + 合计 + 冲突列表
// ==========================================

use crate::domain::rotation::RotationAssignment;
use crate::domain::types::{Phase, WorkerId, WorkstationId};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 冲突类型 (Conflict Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictKind {
    DuplicateAssignment,  // 同阶段重复分配
    CapacityOverflow,     // 超编
    UnmetPriorityStation, // 优先工位缺员
    BrokenTrainingPair,   // 带教关系被拆散
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictKind::DuplicateAssignment => write!(f, "DUPLICATE_ASSIGNMENT"),
            ConflictKind::CapacityOverflow => write!(f, "CAPACITY_OVERFLOW"),
            ConflictKind::UnmetPriorityStation => write!(f, "UNMET_PRIORITY_STATION"),
            ConflictKind::BrokenTrainingPair => write!(f, "BROKEN_TRAINING_PAIR"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub phase: Phase,
    pub workstation_id: Option<WorkstationId>,
    pub worker_ids: Vec<WorkerId>,
    pub message: String,
}

// ==========================================
// StationSlot - 单个工位的两阶段人员
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSlot {
    pub workstation_id: WorkstationId,
    pub name: String,
    pub required_workers: u32,
    pub is_priority: bool,
    pub current: Vec<WorkerId>,
    pub next: Vec<WorkerId>,
}

impl StationSlot {
    pub fn assigned(&self, phase: Phase) -> &[WorkerId] {
        match phase {
            Phase::Current => &self.current,
            Phase::Next => &self.next,
        }
    }

    pub fn assigned_count(&self, phase: Phase) -> u32 {
        self.assigned(phase).len() as u32
    }

    /// 工位完成率（%），不截断: >100 表示超编
    pub fn completion_pct(&self, phase: Phase) -> f64 {
        completion_pct(self.assigned_count(phase), self.required_workers)
    }
}

/// 完成率计算: 编制为 0 时, 无人为 100%, 有人按 assigned×100
pub fn completion_pct(assigned: u32, required: u32) -> f64 {
    if required == 0 {
        if assigned == 0 {
            return 100.0;
        }
        return f64::from(assigned) * 100.0;
    }
    f64::from(assigned) * 100.0 / f64::from(required)
}

// ==========================================
// RotationGrid - 轮岗网格
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationGrid {
    pub session_id: String,
    pub stations: Vec<StationSlot>,

    // ===== 合计 =====
    pub total_current_assigned: u32,
    pub total_next_assigned: u32,
    pub total_required: u32,
    pub current_completion_pct: f64,
    pub next_completion_pct: f64,

    // ===== 冲突 =====
    pub conflicts: Vec<Conflict>,
}

impl RotationGrid {
    pub fn station(&self, workstation_id: WorkstationId) -> Option<&StationSlot> {
        self.stations.iter().find(|s| s.workstation_id == workstation_id)
    }

    /// 员工在指定阶段所在工位
    pub fn station_of(&self, worker_id: WorkerId, phase: Phase) -> Option<WorkstationId> {
        self.stations
            .iter()
            .find(|s| s.assigned(phase).contains(&worker_id))
            .map(|s| s.workstation_id)
    }

    pub fn total_assigned(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Current => self.total_current_assigned,
            Phase::Next => self.total_next_assigned,
        }
    }

    pub fn completion_pct(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Current => self.current_completion_pct,
            Phase::Next => self.next_completion_pct,
        }
    }

    /// 指定阶段已分配的所有员工（按工位顺序展开）
    pub fn workers_in(&self, phase: Phase) -> Vec<WorkerId> {
        self.stations
            .iter()
            .flat_map(|s| s.assigned(phase).iter().copied())
            .collect()
    }

    pub fn conflicts_of(&self, kind: ConflictKind) -> Vec<&Conflict> {
        self.conflicts.iter().filter(|c| c.kind == kind).collect()
    }

    /// 展开为分配记录（供调用方落库）
    pub fn assignments(&self) -> Vec<RotationAssignment> {
        let mut out = Vec::new();
        for phase in Phase::ALL {
            for slot in &self.stations {
                for worker_id in slot.assigned(phase) {
                    out.push(RotationAssignment {
                        session_id: self.session_id.clone(),
                        worker_id: *worker_id,
                        workstation_id: slot.workstation_id,
                        phase,
                    });
                }
            }
        }
        out
    }
}
