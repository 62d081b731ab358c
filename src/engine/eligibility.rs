// ==========================================
// 工位轮岗系统 - 资质准入引擎
// ==========================================
// 红线: 无可分配资质的员工不进入任何阶段, 不得默认兜底
// ==========================================
// 职责: 计算每名员工可分配的工位集合
// 输入: 员工 + 工位 + 资质记录
// 输出: worker_id -> 工位集合 + 停用/无资质名单
// ==========================================

use crate::config::RotationConfig;
use crate::domain::capability::Capability;
use crate::domain::types::{WorkerId, WorkstationId};
use crate::domain::violation::{Violation, ViolationKind};
use crate::domain::worker::Worker;
use crate::domain::workstation::Workstation;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, instrument};

// ==========================================
// EligibilityResult - 准入结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct EligibilityResult {
    /// 可参与分配的员工及其工位集合（集合非空）
    pub eligible: BTreeMap<WorkerId, BTreeSet<WorkstationId>>,
    /// 在岗但无可分配资质
    pub ineligible_workers: Vec<WorkerId>,
    /// 停用员工
    pub inactive_workers: Vec<WorkerId>,
    pub violations: Vec<Violation>,
}

impl EligibilityResult {
    pub fn is_eligible(&self, worker_id: WorkerId) -> bool {
        self.eligible.contains_key(&worker_id)
    }

    pub fn stations_of(&self, worker_id: WorkerId) -> Option<&BTreeSet<WorkstationId>> {
        self.eligible.get(&worker_id)
    }

    pub fn can_work_at(&self, worker_id: WorkerId, workstation_id: WorkstationId) -> bool {
        self.eligible
            .get(&worker_id)
            .map(|set| set.contains(&workstation_id))
            .unwrap_or(false)
    }

    pub fn eligible_count(&self) -> usize {
        self.eligible.len()
    }
}

// ==========================================
// EligibilityResolver - 资质准入引擎
// ==========================================
// 红线: 不直接写库,只计算和返回结果
pub struct EligibilityResolver {
    config: Arc<RotationConfig>,
}

impl EligibilityResolver {
    pub fn new(config: Arc<RotationConfig>) -> Self {
        Self { config }
    }

    /// 计算准入结果
    ///
    /// 规则:
    /// 1) 停用员工直接排除
    /// 2) 仅统计有效资质, 且工位存在并启用
    /// 3) 资质需满足 等级 ≥ min ∧ (已认证 ∨ 等级 ≥ uncertified_min)
    /// 4) 集合为空 -> 记录为无资质（报告,不报错）
    #[instrument(skip_all, fields(
        workers_count = workers.len(),
        workstations_count = workstations.len(),
        capabilities_count = capabilities.len()
    ))]
    pub fn resolve(
        &self,
        workers: &[Worker],
        workstations: &[Workstation],
        capabilities: &[Capability],
    ) -> EligibilityResult {
        let active_stations: BTreeSet<WorkstationId> = workstations
            .iter()
            .filter(|ws| ws.is_active)
            .map(|ws| ws.id)
            .collect();

        let mut stations_by_worker: BTreeMap<WorkerId, BTreeSet<WorkstationId>> = BTreeMap::new();
        for cap in capabilities {
            if !active_stations.contains(&cap.workstation_id) {
                continue;
            }
            if !cap.is_assignable_with(
                self.config.min_competency_level,
                self.config.uncertified_min_competency_level,
            ) {
                continue;
            }
            stations_by_worker
                .entry(cap.worker_id)
                .or_default()
                .insert(cap.workstation_id);
        }

        let mut result = EligibilityResult::default();
        let mut ordered: Vec<&Worker> = workers.iter().collect();
        ordered.sort_by_key(|w| w.id);

        for worker in ordered {
            if !worker.is_active {
                result.inactive_workers.push(worker.id);
                continue;
            }

            match stations_by_worker.remove(&worker.id) {
                Some(set) if !set.is_empty() => {
                    result.eligible.insert(worker.id, set);
                }
                _ => {
                    result.ineligible_workers.push(worker.id);
                    result.violations.push(
                        Violation::new(
                            ViolationKind::NoAssignableCapability,
                            format!(
                                "NO_ASSIGNABLE_CAPABILITY: worker={} ({}) 无可分配工位资质, 本轮不参与分配",
                                worker.id, worker.name
                            ),
                        )
                        .for_worker(worker.id),
                    );
                }
            }
        }

        debug!(
            eligible = result.eligible.len(),
            ineligible = result.ineligible_workers.len(),
            inactive = result.inactive_workers.len(),
            "资质准入完成"
        );

        result
    }
}
