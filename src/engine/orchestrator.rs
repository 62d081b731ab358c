// ==========================================
// 工位轮岗系统 - 引擎编排器
// ==========================================
// 用途: 协调准入/固定/补员/均衡/网格五个阶段的执行顺序
// 红线: 前置条件不满足直接返回错误; 约束违规一次性汇总, 不中途抛出
// ==========================================

use crate::config::RotationConfig;
use crate::domain::capability::Capability;
use crate::domain::grid::RotationGrid;
use crate::domain::rotation::{RotationSnapshot, RotationState};
use crate::domain::types::{PerPhase, WorkerId};
use crate::domain::violation::Violation;
use crate::domain::worker::Worker;
use crate::domain::workstation::Workstation;
use crate::engine::assignment::Placement;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::{
    BalanceDistributor, EligibilityResolver, GridBuilder, PinResolver, PriorityFiller,
    QualityEvaluator, QualityReport, RotationContext, WorkerRanker,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

// ==========================================
// RotationOutcome - 轮岗生成结果
// ==========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationOutcome {
    pub grid: RotationGrid,

    /// 全部约束违规（按阶段产生顺序: 准入 -> 固定 -> 补员 -> 均衡）
    pub violations: Vec<Violation>,

    // Eligibility 输出
    pub ineligible_workers: Vec<WorkerId>,
    pub inactive_workers: Vec<WorkerId>,

    // Balance 输出
    pub unassigned: PerPhase<Vec<WorkerId>>,

    /// 落位明细（含落位原因）
    pub placements: Vec<Placement>,
}

// ==========================================
// RotationOrchestrator - 引擎编排器
// ==========================================

pub struct RotationOrchestrator {
    config: Arc<RotationConfig>,
    eligibility: EligibilityResolver,
    pins: PinResolver,
    filler: PriorityFiller,
    balancer: BalanceDistributor,
    grid: GridBuilder,
}

impl RotationOrchestrator {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 引擎配置
    pub fn new(config: Arc<RotationConfig>) -> Self {
        let threshold = config.forced_rotation_threshold;
        Self {
            eligibility: EligibilityResolver::new(config.clone()),
            pins: PinResolver::new(),
            filler: PriorityFiller::new(WorkerRanker::new(threshold)),
            balancer: BalanceDistributor::new(WorkerRanker::new(threshold)),
            grid: GridBuilder::new(),
            config,
        }
    }

    pub fn config(&self) -> &RotationConfig {
        &self.config
    }

    /// 生成两阶段轮岗分配
    ///
    /// # 参数
    /// - workers: 员工快照
    /// - workstations: 工位快照
    /// - capabilities: 资质记录
    /// - prior_state: 上一轮状态（含目标会话 ID）
    ///
    /// # 返回
    /// - Ok: 网格 + 违规列表（可能非空）
    /// - Err: 前置条件不满足（无启用工位 / 无可分配员工 / ID 重复）
    #[instrument(skip_all, fields(
        session_id = %prior_state.session_id,
        workers_count = workers.len(),
        workstations_count = workstations.len()
    ))]
    pub fn generate_rotation(
        &self,
        workers: &[Worker],
        workstations: &[Workstation],
        capabilities: &[Capability],
        prior_state: &RotationState,
    ) -> EngineResult<RotationOutcome> {
        info!(
            capabilities_count = capabilities.len(),
            previous_assignments = prior_state.previous_assignments.len(),
            "开始生成轮岗分配"
        );

        check_unique_ids(workers, workstations)?;

        if !workstations.iter().any(|ws| ws.is_active) {
            warn!(total_workstations = workstations.len(), "无启用工位, 终止生成");
            return Err(EngineError::NoActiveWorkstations {
                total_workstations: workstations.len(),
            });
        }

        // ==========================================
        // 步骤1: Eligibility Resolver - 资质准入
        // ==========================================
        debug!("步骤1: 计算资质准入");
        let eligibility = self.eligibility.resolve(workers, workstations, capabilities);
        if eligibility.eligible_count() == 0 {
            warn!(
                total_workers = workers.len(),
                inactive = eligibility.inactive_workers.len(),
                ineligible = eligibility.ineligible_workers.len(),
                "无可分配员工, 终止生成"
            );
            return Err(EngineError::NoEligibleWorkers {
                total_workers: workers.len(),
                inactive: eligibility.inactive_workers.len(),
                ineligible: eligibility.ineligible_workers.len(),
            });
        }

        let ctx = RotationContext::new(workers, workstations, &eligibility, prior_state);
        let mut violations: Vec<Violation> = eligibility.violations.clone();

        // ==========================================
        // 步骤2: Pin Resolver - 带教/组长固定
        // ==========================================
        debug!("步骤2: 解析固定落位");
        let pinned = self.pins.resolve(&ctx);
        let mut assignment = pinned.assignment;
        violations.extend(pinned.violations);

        // ==========================================
        // 步骤3: Priority Filler - 优先工位补员
        // ==========================================
        debug!("步骤3: 优先工位补员");
        violations.extend(self.filler.fill(&ctx, &mut assignment));

        // ==========================================
        // 步骤4: Balance Distributor - 均衡分配
        // ==========================================
        debug!("步骤4: 均衡分配");
        let balance = self.balancer.distribute(&ctx, &mut assignment);
        violations.extend(balance.violations);

        // ==========================================
        // 步骤5: Grid Builder - 汇总网格
        // ==========================================
        debug!("步骤5: 构建轮岗网格");
        let grid = self
            .grid
            .build(&prior_state.session_id, &ctx, assignment.placements(), &pinned.training_pairs);

        info!(
            current_assigned = grid.total_current_assigned,
            next_assigned = grid.total_next_assigned,
            total_required = grid.total_required,
            violations = violations.len(),
            conflicts = grid.conflicts.len(),
            "轮岗分配生成完成"
        );

        Ok(RotationOutcome {
            grid,
            violations,
            ineligible_workers: eligibility.ineligible_workers.clone(),
            inactive_workers: eligibility.inactive_workers.clone(),
            unassigned: balance.unassigned,
            placements: assignment.into_placements(),
        })
    }

    /// 从快照生成
    pub fn generate_from_snapshot(&self, snapshot: &RotationSnapshot) -> EngineResult<RotationOutcome> {
        self.generate_rotation(
            &snapshot.workers,
            &snapshot.workstations,
            &snapshot.capabilities,
            &snapshot.prior_state,
        )
    }

    /// 生成并评估
    pub fn generate_and_evaluate(
        &self,
        snapshot: &RotationSnapshot,
    ) -> EngineResult<(RotationOutcome, QualityReport)> {
        let outcome = self.generate_from_snapshot(snapshot)?;
        let report = QualityEvaluator::new(self.config.clone()).evaluate(
            &outcome.grid,
            &snapshot.workers,
            &snapshot.workstations,
        );
        Ok((outcome, report))
    }
}

/// 快照内 ID 唯一性检查
fn check_unique_ids(workers: &[Worker], workstations: &[Workstation]) -> EngineResult<()> {
    let mut seen = BTreeSet::new();
    for w in workers {
        if !seen.insert(w.id) {
            return Err(EngineError::DuplicateWorkerId(w.id));
        }
    }
    let mut seen = BTreeSet::new();
    for ws in workstations {
        if !seen.insert(ws.id) {
            return Err(EngineError::DuplicateWorkstationId(ws.id));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Phase;

    fn orchestrator() -> RotationOrchestrator {
        RotationOrchestrator::new(Arc::new(RotationConfig::default()))
    }

    #[test]
    fn test_no_active_workstations_checked_first() {
        let mut closed = Workstation::new(10, "A", 1);
        closed.is_active = false;

        let err = orchestrator()
            .generate_rotation(&[], &[closed], &[], &RotationState::new("s-1"))
            .unwrap_err();

        assert_eq!(err, EngineError::NoActiveWorkstations { total_workstations: 1 });
    }

    #[test]
    fn test_no_eligible_workers() {
        let stations = vec![Workstation::new(10, "A", 1)];
        let workers = vec![Worker::new(1, "Uncertified")];
        let caps = vec![Capability::new(1, 10, 1)];

        let err = orchestrator()
            .generate_rotation(&workers, &stations, &caps, &RotationState::new("s-1"))
            .unwrap_err();

        assert_eq!(
            err,
            EngineError::NoEligibleWorkers {
                total_workers: 1,
                inactive: 0,
                ineligible: 1
            }
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let stations = vec![Workstation::new(10, "A", 1), Workstation::new(10, "B", 1)];
        let err = orchestrator()
            .generate_rotation(&[], &stations, &[], &RotationState::new("s-1"))
            .unwrap_err();
        assert_eq!(err, EngineError::DuplicateWorkstationId(10));
    }

    #[test]
    fn test_outcome_collects_all_stage_violations() {
        let workers = vec![Worker::new(1, "Solo"), Worker::new(2, "NoCaps")];
        let stations = vec![Workstation::new(10, "A", 3).priority()];
        let caps = vec![Capability::new(1, 10, 4)];

        let outcome = orchestrator()
            .generate_rotation(&workers, &stations, &caps, &RotationState::new("s-1"))
            .unwrap();

        assert_eq!(outcome.grid.session_id, "s-1");
        assert_eq!(outcome.grid.station(10).unwrap().current, vec![1]);
        assert_eq!(outcome.ineligible_workers, vec![2]);
        // 1 条无资质 + 2 条优先工位缺员
        assert_eq!(outcome.violations.len(), 3);
        assert_eq!(outcome.placements.len(), 2);
        assert_eq!(outcome.grid.total_assigned(Phase::Next), 1);
    }
}
