// ==========================================
// 工位轮岗系统 - 在途分配状态
// ==========================================
// 用途: 固定/补员/均衡各阶段之间传递的部分分配
// 红线: 同一阶段内每名员工至多一个工位
// ==========================================

use crate::domain::types::{PerPhase, Phase, PlacementReason, WorkerId, WorkstationId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 单次落位
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub worker_id: WorkerId,
    pub workstation_id: WorkstationId,
    pub phase: Phase,
    pub reason: PlacementReason,
}

// ==========================================
// WorkingAssignment - 部分分配
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct WorkingAssignment {
    placements: Vec<Placement>,
    by_worker: PerPhase<BTreeMap<WorkerId, WorkstationId>>,
    fill: PerPhase<BTreeMap<WorkstationId, u32>>,
}

impl WorkingAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// 落位
    ///
    /// # 返回
    /// - `true`: 落位成功
    /// - `false`: 该员工本阶段已有工位, 未做任何修改
    pub fn place(
        &mut self,
        worker_id: WorkerId,
        workstation_id: WorkstationId,
        phase: Phase,
        reason: PlacementReason,
    ) -> bool {
        let by_worker = self.by_worker.get_mut(phase);
        if by_worker.contains_key(&worker_id) {
            return false;
        }
        by_worker.insert(worker_id, workstation_id);
        *self.fill.get_mut(phase).entry(workstation_id).or_insert(0) += 1;
        self.placements.push(Placement {
            worker_id,
            workstation_id,
            phase,
            reason,
        });
        true
    }

    pub fn station_of(&self, worker_id: WorkerId, phase: Phase) -> Option<WorkstationId> {
        self.by_worker.get(phase).get(&worker_id).copied()
    }

    pub fn is_placed(&self, worker_id: WorkerId, phase: Phase) -> bool {
        self.by_worker.get(phase).contains_key(&worker_id)
    }

    pub fn reason_of(&self, worker_id: WorkerId, phase: Phase) -> Option<PlacementReason> {
        self.placements
            .iter()
            .find(|p| p.worker_id == worker_id && p.phase == phase)
            .map(|p| p.reason)
    }

    /// 工位在指定阶段的当前人数
    pub fn fill_count(&self, workstation_id: WorkstationId, phase: Phase) -> u32 {
        self.fill.get(phase).get(&workstation_id).copied().unwrap_or(0)
    }

    pub fn placed_count(&self, phase: Phase) -> usize {
        self.by_worker.get(phase).len()
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn into_placements(self) -> Vec<Placement> {
        self.placements
    }
}
