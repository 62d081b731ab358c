// ==========================================
// 工位轮岗系统 - 轮岗网格构建
// ==========================================
// 职责: 汇总落位结果, 计算合计与完成率, 检测冲突
// 红线: 纯汇总, 不改变任何落位
// ==========================================

use crate::domain::grid::{completion_pct, Conflict, ConflictKind, RotationGrid, StationSlot};
use crate::domain::types::{Phase, WorkerId, WorkstationId};
use crate::engine::assignment::Placement;
use crate::engine::context::RotationContext;
use crate::engine::pin_resolver::TrainingPair;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

pub struct GridBuilder {
    // 无状态引擎，不需要注入依赖
}

impl GridBuilder {
    pub fn new() -> Self {
        Self {}
    }

    /// 构建轮岗网格
    ///
    /// # 参数
    /// - `session_id`: 所属会话
    /// - `ctx`: 计算上下文（工位顺序即网格行顺序）
    /// - `placements`: 全部落位
    /// - `training_pairs`: 固定阶段记录的带教关系
    #[instrument(skip_all, fields(session_id = %session_id, placements = placements.len()))]
    pub fn build(
        &self,
        session_id: &str,
        ctx: &RotationContext<'_>,
        placements: &[Placement],
        training_pairs: &[TrainingPair],
    ) -> RotationGrid {
        let mut members: BTreeMap<(WorkstationId, Phase), Vec<WorkerId>> = BTreeMap::new();
        for p in placements {
            members
                .entry((p.workstation_id, p.phase))
                .or_default()
                .push(p.worker_id);
        }

        let stations: Vec<StationSlot> = ctx
            .stations()
            .iter()
            .map(|ws| {
                let take = |phase: Phase| {
                    let mut ids = members.get(&(ws.id, phase)).cloned().unwrap_or_default();
                    ids.sort_unstable();
                    ids
                };
                StationSlot {
                    workstation_id: ws.id,
                    name: ws.name.clone(),
                    required_workers: ws.required_workers,
                    is_priority: ws.is_priority,
                    current: take(Phase::Current),
                    next: take(Phase::Next),
                }
            })
            .collect();

        let total_required: u32 = stations.iter().map(|s| s.required_workers).sum();
        let total_current_assigned: u32 = stations.iter().map(|s| s.assigned_count(Phase::Current)).sum();
        let total_next_assigned: u32 = stations.iter().map(|s| s.assigned_count(Phase::Next)).sum();

        let mut grid = RotationGrid {
            session_id: session_id.to_string(),
            stations,
            total_current_assigned,
            total_next_assigned,
            total_required,
            current_completion_pct: completion_pct(total_current_assigned, total_required),
            next_completion_pct: completion_pct(total_next_assigned, total_required),
            conflicts: Vec::new(),
        };
        grid.conflicts = self.detect_conflicts(&grid, ctx, training_pairs);

        debug!(
            current_assigned = grid.total_current_assigned,
            next_assigned = grid.total_next_assigned,
            total_required = grid.total_required,
            conflicts = grid.conflicts.len(),
            "轮岗网格构建完成"
        );

        grid
    }

    // ==========================================
    // 冲突检测
    // ==========================================

    fn detect_conflicts(
        &self,
        grid: &RotationGrid,
        ctx: &RotationContext<'_>,
        training_pairs: &[TrainingPair],
    ) -> Vec<Conflict> {
        let mut conflicts = Vec::new();

        for phase in Phase::ALL {
            // 1) 同阶段重复分配
            let mut seen: BTreeMap<WorkerId, Vec<WorkstationId>> = BTreeMap::new();
            for slot in &grid.stations {
                for worker_id in slot.assigned(phase) {
                    seen.entry(*worker_id).or_default().push(slot.workstation_id);
                }
            }
            for (worker_id, stations) in seen.iter().filter(|(_, s)| s.len() > 1) {
                conflicts.push(Conflict {
                    kind: ConflictKind::DuplicateAssignment,
                    phase,
                    workstation_id: None,
                    worker_ids: vec![*worker_id],
                    message: format!(
                        "DUPLICATE_ASSIGNMENT: worker={} 同阶段出现在工位 {:?}",
                        worker_id, stations
                    ),
                });
            }

            // 2) 超编 / 优先工位缺员
            for slot in &grid.stations {
                let assigned = slot.assigned_count(phase);
                if assigned > slot.required_workers {
                    conflicts.push(Conflict {
                        kind: ConflictKind::CapacityOverflow,
                        phase,
                        workstation_id: Some(slot.workstation_id),
                        worker_ids: slot.assigned(phase).to_vec(),
                        message: format!(
                            "CAPACITY_OVERFLOW: workstation={} ({}), assigned={}, required={}",
                            slot.workstation_id, slot.name, assigned, slot.required_workers
                        ),
                    });
                } else if slot.is_priority && assigned < slot.required_workers {
                    conflicts.push(Conflict {
                        kind: ConflictKind::UnmetPriorityStation,
                        phase,
                        workstation_id: Some(slot.workstation_id),
                        worker_ids: slot.assigned(phase).to_vec(),
                        message: format!(
                            "UNMET_PRIORITY_STATION: workstation={} ({}), assigned={}, required={}",
                            slot.workstation_id, slot.name, assigned, slot.required_workers
                        ),
                    });
                }
            }

            // 3) 带教关系被拆散
            for pair in training_pairs {
                if let Some(conflict) = self.check_pair(grid, ctx, pair, phase) {
                    conflicts.push(conflict);
                }
            }
        }

        conflicts
    }

    fn check_pair(
        &self,
        grid: &RotationGrid,
        ctx: &RotationContext<'_>,
        pair: &TrainingPair,
        phase: Phase,
    ) -> Option<Conflict> {
        let trainee_station = grid.station_of(pair.trainee_id, phase);
        let declared_trainer = ctx.worker(pair.trainee_id).and_then(|w| w.trainer_id);
        let active_trainer = declared_trainer
            .filter(|id| *id != pair.trainee_id)
            .and_then(|id| ctx.worker(id))
            .filter(|w| w.is_active);

        let broken = if trainee_station != Some(pair.workstation_id) {
            true
        } else {
            match active_trainer {
                Some(trainer) => grid.station_of(trainer.id, phase) != Some(pair.workstation_id),
                None => false,
            }
        };
        if !broken {
            return None;
        }

        let mut worker_ids = vec![pair.trainee_id];
        if let Some(trainer) = active_trainer {
            worker_ids.push(trainer.id);
        }
        Some(Conflict {
            kind: ConflictKind::BrokenTrainingPair,
            phase,
            workstation_id: Some(pair.workstation_id),
            worker_ids,
            message: format!(
                "BROKEN_TRAINING_PAIR: trainee={}, trainer={:?}, 带教工位 workstation={} 未同岗",
                pair.trainee_id, declared_trainer, pair.workstation_id
            ),
        })
    }
}

impl Default for GridBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rotation::RotationState;
    use crate::domain::types::PlacementReason;
    use crate::domain::worker::Worker;
    use crate::domain::workstation::Workstation;
    use crate::engine::eligibility::EligibilityResult;

    fn place(worker_id: WorkerId, workstation_id: WorkstationId, phase: Phase) -> Placement {
        Placement {
            worker_id,
            workstation_id,
            phase,
            reason: PlacementReason::BalanceFill,
        }
    }

    #[test]
    fn test_totals_and_conflicts() {
        let workers: Vec<Worker> = (1..=4).map(|i| Worker::new(i, "W")).collect();
        let stations = vec![Workstation::new(10, "A", 3).priority(), Workstation::new(20, "B", 1)];
        let eligibility = EligibilityResult::default();
        let state = RotationState::default();
        let ctx = RotationContext::new(&workers, &stations, &eligibility, &state);

        let placements = vec![
            place(1, 10, Phase::Current),
            place(3, 20, Phase::Current),
            place(2, 20, Phase::Current),
            place(1, 10, Phase::Next),
            place(2, 10, Phase::Next),
            place(3, 10, Phase::Next),
            place(4, 20, Phase::Next),
        ];

        let grid = GridBuilder::new().build("s-1", &ctx, &placements, &[]);

        assert_eq!(grid.total_required, 4);
        assert_eq!(grid.total_current_assigned, 3);
        assert_eq!(grid.total_next_assigned, 4);
        assert_eq!(grid.next_completion_pct, 100.0);
        assert_eq!(grid.station(20).unwrap().current, vec![2, 3]);

        let overflow = grid.conflicts_of(ConflictKind::CapacityOverflow);
        assert_eq!(overflow.len(), 1);
        assert_eq!(overflow[0].phase, Phase::Current);
        let unmet = grid.conflicts_of(ConflictKind::UnmetPriorityStation);
        assert_eq!(unmet.len(), 1);
        assert_eq!(unmet[0].workstation_id, Some(10));
    }

    #[test]
    fn test_broken_training_pair_detected() {
        let mut trainee = Worker::new(2, "T");
        trainee.is_trainee = true;
        trainee.trainer_id = Some(1);
        trainee.training_workstation_id = Some(10);
        let mut trainer = Worker::new(1, "R");
        trainer.is_trainer = true;
        let workers = vec![trainer, trainee];
        let stations = vec![Workstation::new(10, "A", 2), Workstation::new(20, "B", 2)];
        let eligibility = EligibilityResult::default();
        let state = RotationState::default();
        let ctx = RotationContext::new(&workers, &stations, &eligibility, &state);
        let pairs = vec![TrainingPair {
            trainee_id: 2,
            trainer_id: None,
            workstation_id: 10,
        }];
        let placements = vec![
            place(2, 10, Phase::Current),
            place(2, 10, Phase::Next),
            place(1, 20, Phase::Current),
            place(1, 10, Phase::Next),
        ];

        let grid = GridBuilder::new().build("s-1", &ctx, &placements, &pairs);
        let broken = grid.conflicts_of(ConflictKind::BrokenTrainingPair);

        assert_eq!(broken.len(), 1);
        assert_eq!(broken[0].phase, Phase::Current);
        assert_eq!(broken[0].worker_ids, vec![2, 1]);
    }

    #[test]
    fn test_empty_grid_is_complete() {
        let stations = vec![Workstation::new(10, "Spare", 0)];
        let eligibility = EligibilityResult::default();
        let state = RotationState::default();
        let ctx = RotationContext::new(&[], &stations, &eligibility, &state);

        let grid = GridBuilder::new().build("s-1", &ctx, &[], &[]);

        assert_eq!(grid.current_completion_pct, 100.0);
        assert!(grid.conflicts.is_empty());
    }
}
