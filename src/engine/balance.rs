// ==========================================
// 工位轮岗系统 - 均衡分配引擎
// ==========================================
// 红线: 未满编工位优先; 仅在无可选工位时超编并记录
// ==========================================
// 职责: 把剩余员工分配到利用率最低的普通工位
// 输入: 上下文 + 补员后的部分分配
// 输出: 追加 BalanceFill / Overflow 落位 + 未分配名单
// ==========================================

use crate::domain::types::{PerPhase, Phase, PlacementReason, WorkerId, WorkstationId};
use crate::domain::violation::{Violation, ViolationKind};
use crate::domain::worker::Worker;
use crate::domain::workstation::{StationCapacity, Workstation};
use crate::engine::assignment::WorkingAssignment;
use crate::engine::context::RotationContext;
use crate::engine::ranking::WorkerRanker;
use std::cmp::Ordering;
use tracing::{debug, instrument, warn};

/// 均衡分配结果
#[derive(Debug, Clone, Default)]
pub struct BalanceOutcome {
    /// 本阶段无可用工位的员工
    pub unassigned: PerPhase<Vec<WorkerId>>,
    pub violations: Vec<Violation>,
}

// ==========================================
// BalanceDistributor - 均衡分配引擎
// ==========================================
pub struct BalanceDistributor {
    ranker: WorkerRanker,
}

impl BalanceDistributor {
    pub fn new(ranker: WorkerRanker) -> Self {
        Self { ranker }
    }

    #[instrument(skip_all, fields(balance_stations = ctx.balance_stations().len()))]
    pub fn distribute(&self, ctx: &RotationContext<'_>, assignment: &mut WorkingAssignment) -> BalanceOutcome {
        let mut outcome = BalanceOutcome::default();
        let stations = ctx.balance_stations();

        for phase in Phase::ALL {
            let pool: Vec<&Worker> = ctx
                .eligible_workers()
                .into_iter()
                .filter(|w| !assignment.is_placed(w.id, phase))
                .collect();
            let pool_size = pool.len();

            for worker in self.ranker.rank(pool) {
                self.place_worker(ctx, &stations, worker, phase, assignment, &mut outcome);
            }

            debug!(
                phase = %phase,
                pool_size = pool_size,
                unassigned = outcome.unassigned.get(phase).len(),
                "均衡分配完成"
            );
        }

        outcome
    }

    fn place_worker(
        &self,
        ctx: &RotationContext<'_>,
        stations: &[&Workstation],
        worker: &Worker,
        phase: Phase,
        assignment: &mut WorkingAssignment,
        outcome: &mut BalanceOutcome,
    ) {
        let candidates: Vec<&Workstation> = stations
            .iter()
            .copied()
            .filter(|ws| ctx.eligibility.can_work_at(worker.id, ws.id))
            .collect();

        if candidates.is_empty() {
            outcome.unassigned.get_mut(phase).push(worker.id);
            outcome.violations.push(
                Violation::new(
                    ViolationKind::UnassignableThisPhase,
                    format!(
                        "UNASSIGNABLE_THIS_PHASE: worker={} ({}), phase={}, 无剩余可分配工位",
                        worker.id, worker.name, phase
                    ),
                )
                .in_phase(phase)
                .for_worker(worker.id),
            );
            return;
        }

        let open: Vec<&Workstation> = candidates
            .iter()
            .copied()
            .filter(|ws| !ws.is_full(assignment.fill_count(ws.id, phase)))
            .collect();
        let overflow = open.is_empty();
        let tier = if overflow { candidates } else { open };
        let tier = self.rotate_away(ctx, worker, tier);

        let fills: &WorkingAssignment = assignment;
        let chosen = match tier
            .iter()
            .copied()
            .min_by(|a, b| self.compare_load(a, b, phase, fills))
        {
            Some(ws) => ws,
            None => return,
        };

        let reason = if overflow {
            PlacementReason::Overflow
        } else {
            PlacementReason::BalanceFill
        };
        assignment.place(worker.id, chosen.id, phase, reason);

        if overflow {
            let assigned = assignment.fill_count(chosen.id, phase);
            warn!(
                worker_id = worker.id,
                workstation_id = chosen.id,
                phase = %phase,
                assigned = assigned,
                required = chosen.required_workers,
                "可选工位均已满编, 超编分配"
            );
            outcome.violations.push(
                Violation::new(
                    ViolationKind::CapacityOverflow,
                    format!(
                        "CAPACITY_OVERFLOW: worker={} -> workstation={} ({}), phase={}, assigned={}, required={}",
                        worker.id, chosen.id, chosen.name, phase, assigned, chosen.required_workers
                    ),
                )
                .in_phase(phase)
                .for_worker(worker.id)
                .at_station(chosen.id),
            );
        }
    }

    /// 到期员工去掉原工位（仍有其他候选时）
    fn rotate_away<'a>(
        &self,
        ctx: &RotationContext<'_>,
        worker: &Worker,
        tier: Vec<&'a Workstation>,
    ) -> Vec<&'a Workstation> {
        if !self.ranker.is_due(worker) {
            return tier;
        }
        let prior: Option<WorkstationId> = ctx.prior_state.prior_station(worker.id);
        match prior {
            Some(prior_id) if tier.len() > 1 && tier.iter().any(|ws| ws.id == prior_id) => {
                tier.into_iter().filter(|ws| ws.id != prior_id).collect()
            }
            _ => tier,
        }
    }

    /// 选取键: 利用率 -> 人数 -> id
    fn compare_load(
        &self,
        a: &Workstation,
        b: &Workstation,
        phase: Phase,
        assignment: &WorkingAssignment,
    ) -> Ordering {
        let fill_a = assignment.fill_count(a.id, phase);
        let fill_b = assignment.fill_count(b.id, phase);
        a.utilization(fill_a)
            .total_cmp(&b.utilization(fill_b))
            .then_with(|| fill_a.cmp(&fill_b))
            .then_with(|| a.id.cmp(&b.id))
    }
}

impl Default for BalanceDistributor {
    fn default() -> Self {
        Self::new(WorkerRanker::default())
    }
}
