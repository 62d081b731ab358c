// ==========================================
// 工位轮岗系统 - 引擎计算上下文
// ==========================================
// 用途: 快照的只读索引, 供固定/补员/均衡/网格各阶段共享
// 红线: 只持有快照借用, 不修改调用方数据
// ==========================================

use crate::domain::rotation::RotationState;
use crate::domain::types::{WorkerId, WorkstationId};
use crate::domain::worker::Worker;
use crate::domain::workstation::Workstation;
use crate::engine::eligibility::EligibilityResult;
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub struct RotationContext<'a> {
    workers: BTreeMap<WorkerId, &'a Worker>,
    /// 启用工位, 按 优先 desc -> 编制 desc -> id asc 排序
    stations: Vec<&'a Workstation>,
    pub eligibility: &'a EligibilityResult,
    pub prior_state: &'a RotationState,
}

impl<'a> RotationContext<'a> {
    pub fn new(
        workers: &'a [Worker],
        workstations: &'a [Workstation],
        eligibility: &'a EligibilityResult,
        prior_state: &'a RotationState,
    ) -> Self {
        let mut by_id = BTreeMap::new();
        for worker in workers {
            by_id.entry(worker.id).or_insert(worker);
        }

        let mut stations: Vec<&Workstation> = workstations.iter().filter(|ws| ws.is_active).collect();
        stations.sort_by(|a, b| compare_stations(a, b));

        Self {
            workers: by_id,
            stations,
            eligibility,
            prior_state,
        }
    }

    /// 按 ID 查找员工（含停用员工）
    pub fn worker(&self, worker_id: WorkerId) -> Option<&'a Worker> {
        self.workers.get(&worker_id).copied()
    }

    /// 按 ID 查找启用工位
    pub fn station(&self, workstation_id: WorkstationId) -> Option<&'a Workstation> {
        self.stations.iter().copied().find(|ws| ws.id == workstation_id)
    }

    pub fn stations(&self) -> &[&'a Workstation] {
        &self.stations
    }

    pub fn priority_stations(&self) -> Vec<&'a Workstation> {
        self.stations.iter().copied().filter(|ws| ws.is_priority).collect()
    }

    pub fn balance_stations(&self) -> Vec<&'a Workstation> {
        self.stations.iter().copied().filter(|ws| !ws.is_priority).collect()
    }

    /// 可参与分配的员工（按 ID 升序）
    pub fn eligible_workers(&self) -> Vec<&'a Worker> {
        self.eligibility
            .eligible
            .keys()
            .filter_map(|id| self.worker(*id))
            .collect()
    }
}

/// 工位处理顺序: 优先工位在前, 编制大的在前, 最后按 ID
pub fn compare_stations(a: &Workstation, b: &Workstation) -> Ordering {
    b.is_priority
        .cmp(&a.is_priority)
        .then_with(|| b.required_workers.cmp(&a.required_workers))
        .then_with(|| a.id.cmp(&b.id))
}
