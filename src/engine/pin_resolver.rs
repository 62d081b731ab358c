// ==========================================
// 工位轮岗系统 - 固定落位解析器
// ==========================================
// 优先级: 带教固定 (两阶段) -> 组长固定 (按组长类型) -> 其余进入分配池
// 红线: 带教固定为最高优先级, 覆盖组长与优先工位规则
// ==========================================

use crate::domain::types::{PerPhase, Phase, PlacementReason, WorkerId, WorkstationId};
use crate::domain::violation::{Violation, ViolationKind};
use crate::domain::worker::Worker;
use crate::engine::assignment::WorkingAssignment;
use crate::engine::context::RotationContext;
use tracing::{debug, instrument, warn};

/// 已落位的带教关系
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingPair {
    pub trainee_id: WorkerId,
    /// 带教人不可用时为 None（学员单独固定）
    pub trainer_id: Option<WorkerId>,
    pub workstation_id: WorkstationId,
}

/// 固定落位结果
#[derive(Debug, Clone)]
pub struct PinResolution {
    pub assignment: WorkingAssignment,
    pub training_pairs: Vec<TrainingPair>,
    /// 各阶段未被固定的可分配员工（按 ID 升序）
    pub remaining: PerPhase<Vec<WorkerId>>,
    pub violations: Vec<Violation>,
}

// ==========================================
// PinResolver - 固定落位解析器
// ==========================================
pub struct PinResolver {
    // 无状态引擎，不需要注入依赖
}

impl PinResolver {
    pub fn new() -> Self {
        Self {}
    }

    /// 按固定顺序解析所有固定落位
    #[instrument(skip_all, fields(eligible_count = ctx.eligibility.eligible_count()))]
    pub fn resolve(&self, ctx: &RotationContext<'_>) -> PinResolution {
        let mut assignment = WorkingAssignment::new();
        let mut violations = Vec::new();

        // 1) 带教关系
        let training_pairs = self.pin_training_pairs(ctx, &mut assignment, &mut violations);

        // 2) 组长
        self.pin_leaders(ctx, &assignment.clone(), &mut assignment, &mut violations);

        // 3) 剩余分配池
        let eligible_ids: Vec<WorkerId> = ctx.eligibility.eligible.keys().copied().collect();
        let remaining_for = |phase: Phase| {
            eligible_ids
                .iter()
                .copied()
                .filter(|id| !assignment.is_placed(*id, phase))
                .collect::<Vec<_>>()
        };
        let remaining = PerPhase::new(remaining_for(Phase::Current), remaining_for(Phase::Next));

        debug!(
            training_pairs = training_pairs.len(),
            pinned_current = assignment.placed_count(Phase::Current),
            pinned_next = assignment.placed_count(Phase::Next),
            violations = violations.len(),
            "固定落位完成"
        );

        PinResolution {
            assignment,
            training_pairs,
            remaining,
            violations,
        }
    }

    // ==========================================
    // 规则 1: 带教固定
    // ==========================================

    fn pin_training_pairs(
        &self,
        ctx: &RotationContext<'_>,
        assignment: &mut WorkingAssignment,
        violations: &mut Vec<Violation>,
    ) -> Vec<TrainingPair> {
        let mut pairs = Vec::new();

        for trainee in ctx.eligible_workers() {
            let (trainer_id, station_id) = match (trainee.is_trainee, trainee.trainer_id, trainee.training_workstation_id) {
                (true, Some(trainer_id), Some(station_id)) => (trainer_id, station_id),
                _ => continue,
            };

            if ctx.station(station_id).is_none() {
                violations.push(
                    Violation::new(
                        ViolationKind::TrainingStationUnavailable,
                        format!(
                            "TRAINING_STATION_UNAVAILABLE: trainee={}, workstation={} 不存在或未启用, 带教关系不固定",
                            trainee.id, station_id
                        ),
                    )
                    .for_worker(trainee.id)
                    .at_station(station_id),
                );
                continue;
            }

            // 学员已作为其他人的带教人被固定
            if let Some(existing) = assignment.station_of(trainee.id, Phase::Current) {
                if existing != station_id {
                    violations.push(
                        Violation::new(
                            ViolationKind::TrainerConflict,
                            format!(
                                "TRAINER_CONFLICT: trainee={} 已作为带教人固定在 workstation={}, 无法固定到 workstation={}",
                                trainee.id, existing, station_id
                            ),
                        )
                        .for_worker(trainee.id)
                        .at_station(station_id),
                    );
                    continue;
                }
            }

            for phase in Phase::ALL {
                assignment.place(trainee.id, station_id, phase, PlacementReason::TrainingPin);
            }

            let trainer_ok = match self.check_trainer(ctx, trainee, trainer_id, station_id, assignment) {
                Ok(()) => {
                    for phase in Phase::ALL {
                        assignment.place(trainer_id, station_id, phase, PlacementReason::TrainingPin);
                    }
                    true
                }
                Err(violation) => {
                    warn!(
                        trainee_id = trainee.id,
                        trainer_id = trainer_id,
                        workstation_id = station_id,
                        "带教人不可用, 学员单独固定"
                    );
                    violations.push(violation);
                    false
                }
            };

            pairs.push(TrainingPair {
                trainee_id: trainee.id,
                trainer_id: trainer_ok.then_some(trainer_id),
                workstation_id: station_id,
            });
        }

        pairs
    }

    /// 检查带教人是否可与学员一起固定
    fn check_trainer(
        &self,
        ctx: &RotationContext<'_>,
        trainee: &Worker,
        trainer_id: WorkerId,
        station_id: WorkstationId,
        assignment: &WorkingAssignment,
    ) -> Result<(), Violation> {
        let unavailable = |reason: &str| {
            Violation::new(
                ViolationKind::TrainerUnavailable,
                format!(
                    "TRAINER_UNAVAILABLE: trainee={}, trainer={}, workstation={}: {}",
                    trainee.id, trainer_id, station_id, reason
                ),
            )
            .for_worker(trainee.id)
            .at_station(station_id)
        };

        if trainer_id == trainee.id {
            return Err(unavailable("学员不能作为自己的带教人"));
        }
        let trainer = ctx
            .worker(trainer_id)
            .ok_or_else(|| unavailable("带教人不存在"))?;
        if !trainer.is_active {
            return Err(unavailable("带教人已停用"));
        }
        if !trainer.is_trainer {
            return Err(unavailable("被引用员工不是带教人"));
        }
        if !ctx.eligibility.can_work_at(trainer_id, station_id) {
            return Err(unavailable("带教人无该工位可分配资质"));
        }
        if let Some(existing) = assignment.station_of(trainer_id, Phase::Current) {
            if existing != station_id {
                return Err(Violation::new(
                    ViolationKind::TrainerConflict,
                    format!(
                        "TRAINER_CONFLICT: trainer={} 已固定在 workstation={}, 学员 {} 单独固定到 workstation={}",
                        trainer_id, existing, trainee.id, station_id
                    ),
                )
                .for_worker(trainee.id)
                .at_station(station_id));
            }
        }
        Ok(())
    }

    // ==========================================
    // 规则 2: 组长固定
    // ==========================================

    fn pin_leaders(
        &self,
        ctx: &RotationContext<'_>,
        training_pins: &WorkingAssignment,
        assignment: &mut WorkingAssignment,
        violations: &mut Vec<Violation>,
    ) {
        for leader in ctx.eligible_workers().into_iter().filter(|w| w.is_leader) {
            for phase in Phase::ALL {
                if !leader.leads_in(phase) {
                    continue;
                }

                // 带教固定优先, 组长保持带教工位
                if let Some(training_station) = training_pins.station_of(leader.id, phase) {
                    if leader.leadership_workstation_id != Some(training_station) {
                        violations.push(
                            Violation::new(
                                ViolationKind::LeaderOverriddenByTraining,
                                format!(
                                    "LEADER_OVERRIDDEN_BY_TRAINING: leader={} 保持带教工位 workstation={}, 组长工位 {:?} 未固定",
                                    leader.id, training_station, leader.leadership_workstation_id
                                ),
                            )
                            .in_phase(phase)
                            .for_worker(leader.id)
                            .at_station(training_station),
                        );
                    }
                    continue;
                }

                let station_id = match leader.leadership_workstation_id {
                    Some(id) if ctx.station(id).is_some() => id,
                    other => {
                        let detail = match other {
                            Some(id) => format!("workstation={} 不存在或未启用", id),
                            None => "未指定组长工位".to_string(),
                        };
                        let mut violation = Violation::new(
                            ViolationKind::LeaderNotPlaced,
                            format!("LEADER_NOT_PLACED: leader={}: {}", leader.id, detail),
                        )
                        .in_phase(phase)
                        .for_worker(leader.id);
                        if let Some(id) = other {
                            violation = violation.at_station(id);
                        }
                        violations.push(violation);
                        continue;
                    }
                };

                assignment.place(leader.id, station_id, phase, PlacementReason::LeadershipPin);
            }
        }
    }
}

impl Default for PinResolver {
    fn default() -> Self {
        Self::new()
    }
}
