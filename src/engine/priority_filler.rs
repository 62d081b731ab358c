// ==========================================
// 工位轮岗系统 - 优先工位补员引擎
// ==========================================
// 红线: 优先工位先于普通工位补员, 固定落位计入编制
// ==========================================
// 职责: 按工位顺序把优先工位补足到编制人数
// 输入: 上下文 + 固定落位后的部分分配
// 输出: 追加 PriorityFill 落位 + 缺员违规
// ==========================================

use crate::domain::types::{Phase, PlacementReason, WorkstationId};
use crate::domain::violation::{Violation, ViolationKind};
use crate::domain::worker::Worker;
use crate::domain::workstation::{StationCapacity, Workstation};
use crate::engine::assignment::WorkingAssignment;
use crate::engine::context::RotationContext;
use crate::engine::ranking::WorkerRanker;
use tracing::{debug, instrument, warn};

// ==========================================
// PriorityFiller - 优先工位补员引擎
// ==========================================
pub struct PriorityFiller {
    ranker: WorkerRanker,
}

impl PriorityFiller {
    pub fn new(ranker: WorkerRanker) -> Self {
        Self { ranker }
    }

    /// 两个阶段依次补员
    ///
    /// # 返回
    /// 缺员违规列表（每个未补足的工位每阶段一条）
    #[instrument(skip_all, fields(priority_stations = ctx.priority_stations().len()))]
    pub fn fill(&self, ctx: &RotationContext<'_>, assignment: &mut WorkingAssignment) -> Vec<Violation> {
        let mut violations = Vec::new();
        for phase in Phase::ALL {
            for station in ctx.priority_stations() {
                if let Some(v) = self.fill_station(ctx, station, phase, assignment) {
                    violations.push(v);
                }
            }
        }
        violations
    }

    /// 补足单个工位
    fn fill_station(
        &self,
        ctx: &RotationContext<'_>,
        station: &Workstation,
        phase: Phase,
        assignment: &mut WorkingAssignment,
    ) -> Option<Violation> {
        let already = assignment.fill_count(station.id, phase);
        let needed = station.remaining_slots(already) as usize;
        if needed == 0 {
            return None;
        }

        let candidates = self.candidates(ctx, station.id, phase, assignment);
        let mut added = 0usize;
        for worker in candidates.into_iter().take(needed) {
            if assignment.place(worker.id, station.id, phase, PlacementReason::PriorityFill) {
                added += 1;
            }
        }

        debug!(
            workstation_id = station.id,
            phase = %phase,
            pinned = already,
            added = added,
            required = station.required_workers,
            "优先工位补员"
        );

        if added >= needed {
            return None;
        }

        let assigned = assignment.fill_count(station.id, phase);
        warn!(
            workstation_id = station.id,
            phase = %phase,
            assigned = assigned,
            required = station.required_workers,
            "优先工位未补足"
        );
        Some(
            Violation::new(
                ViolationKind::UnmetPriorityCapacity,
                format!(
                    "UNMET_PRIORITY_CAPACITY: workstation={} ({}), phase={}, assigned={}, required={}",
                    station.id, station.name, phase, assigned, station.required_workers
                ),
            )
            .in_phase(phase)
            .at_station(station.id),
        )
    }

    /// 可补入该工位的候选（按选取顺序）
    ///
    /// 排序后稳定划分: 不在原工位到期的员工在前, 到期且原工位即本工位者垫后
    fn candidates<'a>(
        &self,
        ctx: &RotationContext<'a>,
        workstation_id: WorkstationId,
        phase: Phase,
        assignment: &WorkingAssignment,
    ) -> Vec<&'a Worker> {
        let pool: Vec<&Worker> = ctx
            .eligible_workers()
            .into_iter()
            .filter(|w| !assignment.is_placed(w.id, phase))
            .filter(|w| ctx.eligibility.can_work_at(w.id, workstation_id))
            .collect();

        let (preferred, held_back): (Vec<_>, Vec<_>) = self
            .ranker
            .rank(pool)
            .into_iter()
            .partition(|w| !self.must_rotate_from(ctx, w, workstation_id));

        preferred.into_iter().chain(held_back).collect()
    }

    fn must_rotate_from(&self, ctx: &RotationContext<'_>, worker: &Worker, workstation_id: WorkstationId) -> bool {
        self.ranker.is_due(worker) && ctx.prior_state.prior_station(worker.id) == Some(workstation_id)
    }
}

impl Default for PriorityFiller {
    fn default() -> Self {
        Self::new(WorkerRanker::default())
    }
}
