use super::report::{PhaseQuality, QualityReport};
use crate::config::RotationConfig;
use crate::domain::grid::RotationGrid;
use crate::domain::types::{Phase, WorkstationId};
use crate::domain::worker::Worker;
use crate::domain::workstation::Workstation;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, instrument};

// ==========================================
// QualityEvaluator - 轮岗质量评估引擎
// ==========================================
pub struct QualityEvaluator {
    config: Arc<RotationConfig>,
}

impl QualityEvaluator {
    pub fn new(config: Arc<RotationConfig>) -> Self {
        Self { config }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 评估轮岗网格
    ///
    /// # 参数
    /// - `grid`: 已生成的轮岗网格
    /// - `workers`: 员工快照（用于可用率、组长与带教约束）
    /// - `workstations`: 工位快照（用于违规文本中的工位名称）
    ///
    /// # 返回
    /// 两阶段质量指标及均值、违规文本、建议
    #[instrument(skip_all, fields(session_id = %grid.session_id))]
    pub fn evaluate(&self, grid: &RotationGrid, workers: &[Worker], workstations: &[Workstation]) -> QualityReport {
        let names: BTreeMap<WorkstationId, &str> =
            workstations.iter().map(|ws| (ws.id, ws.name.as_str())).collect();

        let current = self.evaluate_phase(grid, workers, &names, Phase::Current);
        let next = self.evaluate_phase(grid, workers, &names, Phase::Next);

        let mean = |f: fn(&PhaseQuality) -> f64| (f(&current) + f(&next)) / 2.0;
        let balance_index = mean(|q| q.balance_index);
        let assignment_efficiency = mean(|q| q.assignment_efficiency);
        let constraint_satisfaction = mean(|q| q.constraint_satisfaction);
        let average_availability = mean(|q| q.average_availability);
        let distribution_uniformity = mean(|q| q.distribution_uniformity);
        let overall_score = mean(|q| q.overall_score);
        let worker_utilization = mean(|q| q.worker_utilization);
        let leadership_coverage = mean(|q| q.leadership_coverage);
        let training_coverage = mean(|q| q.training_coverage);

        let violations: Vec<String> = current
            .violations
            .iter()
            .chain(next.violations.iter())
            .cloned()
            .collect();

        let recommendations = self.recommend(&[
            ("balance_index", balance_index),
            ("worker_utilization", worker_utilization),
            ("leadership_coverage", leadership_coverage),
            ("training_coverage", training_coverage),
            ("constraint_satisfaction", constraint_satisfaction),
        ]);

        debug!(
            overall_score = overall_score,
            balance_index = balance_index,
            constraint_satisfaction = constraint_satisfaction,
            violations = violations.len(),
            recommendations = recommendations.len(),
            "轮岗质量评估完成"
        );

        QualityReport {
            session_id: grid.session_id.clone(),
            current,
            next,
            balance_index,
            assignment_efficiency,
            constraint_satisfaction,
            average_availability,
            distribution_uniformity,
            overall_score,
            violations,
            recommendations,
        }
    }

    // ==========================================
    // 单阶段指标
    // ==========================================

    fn evaluate_phase(
        &self,
        grid: &RotationGrid,
        workers: &[Worker],
        names: &BTreeMap<WorkstationId, &str>,
        phase: Phase,
    ) -> PhaseQuality {
        let by_id: BTreeMap<_, &Worker> = workers.iter().map(|w| (w.id, w)).collect();
        let active: Vec<&Worker> = workers.iter().filter(|w| w.is_active).collect();
        let assigned: BTreeSet<_> = grid.workers_in(phase).into_iter().collect();
        let grid_stations: BTreeSet<WorkstationId> = grid.stations.iter().map(|s| s.workstation_id).collect();
        let station_name = |id: WorkstationId| names.get(&id).copied().unwrap_or("?");
        let describe = |station: Option<WorkstationId>| match station {
            Some(id) => format!("{} (id={})", station_name(id), id),
            None => "未分配".to_string(),
        };

        // 1) 工位均衡度
        let balance_index = mean_or(
            grid.stations.iter().map(|slot| {
                let n = slot.assigned_count(phase);
                if slot.required_workers > 0 {
                    (f64::from(n) / f64::from(slot.required_workers)).min(1.0)
                } else if n == 0 {
                    1.0
                } else {
                    0.0
                }
            }),
            1.0,
        );

        // 2) 分配效率分项
        let worker_utilization = if active.is_empty() {
            1.0
        } else {
            (assigned.len() as f64 / active.len() as f64).min(1.0)
        };
        let capacity_utilization = if grid.total_required == 0 {
            1.0
        } else {
            (f64::from(grid.total_assigned(phase)) / f64::from(grid.total_required)).min(1.0)
        };

        let mut violations = Vec::new();

        // 组长: 本阶段需固定的在岗组长全部计入, 组长工位缺失或未启用即视为未满足
        let leaders: Vec<&Worker> = active.iter().copied().filter(|w| w.leads_in(phase)).collect();
        let mut leaders_ok = 0u32;
        for leader in &leaders {
            let station_id = match leader.leadership_workstation_id {
                Some(id) if grid_stations.contains(&id) => id,
                Some(id) => {
                    violations.push(format!(
                        "[{}] 组长 {} (id={}) 的组长工位 id={} 不存在或未启用",
                        phase, leader.name, leader.id, id
                    ));
                    continue;
                }
                None => {
                    violations.push(format!(
                        "[{}] 组长 {} (id={}) 未指定组长工位",
                        phase, leader.name, leader.id
                    ));
                    continue;
                }
            };
            match grid.station_of(leader.id, phase) {
                Some(actual) if actual == station_id => leaders_ok += 1,
                actual => violations.push(format!(
                    "[{}] 组长 {} (id={}) 未在组长工位 {} (id={}), 实际: {}",
                    phase,
                    leader.name,
                    leader.id,
                    station_name(station_id),
                    station_id,
                    describe(actual)
                )),
            }
        }

        // 学员: 有带教配对的在岗学员全部计入
        let trainees: Vec<(&Worker, WorkstationId)> = active
            .iter()
            .copied()
            .filter(|w| w.has_training_pair())
            .filter_map(|w| w.training_workstation_id.map(|s| (w, s)))
            .collect();
        let mut trainees_placed = 0u32;
        let mut pairs_ok = 0u32;
        for (trainee, station_id) in &trainees {
            if !grid_stations.contains(station_id) {
                violations.push(format!(
                    "[{}] 学员 {} (id={}) 的带教工位 id={} 不存在或未启用",
                    phase, trainee.name, trainee.id, station_id
                ));
                continue;
            }
            let at_station = grid.station_of(trainee.id, phase) == Some(*station_id);
            if at_station {
                trainees_placed += 1;
            }
            let trainer = trainee.trainer_id.and_then(|id| by_id.get(&id).copied());
            let trainer_with = trainer
                .map(|t| t.is_active && grid.station_of(t.id, phase) == Some(*station_id))
                .unwrap_or(false);

            if at_station && trainer_with {
                pairs_ok += 1;
            } else if !at_station {
                violations.push(format!(
                    "[{}] 学员 {} (id={}) 未在带教工位 {} (id={})",
                    phase,
                    trainee.name,
                    trainee.id,
                    station_name(*station_id),
                    station_id
                ));
            } else {
                violations.push(format!(
                    "[{}] 学员 {} (id={}) 的带教人 {:?} 未与其同在工位 {} (id={})",
                    phase,
                    trainee.name,
                    trainee.id,
                    trainee.trainer_id,
                    station_name(*station_id),
                    station_id
                ));
            }
        }

        let leadership_coverage = ratio_or(leaders_ok, leaders.len() as u32, 1.0);
        let training_coverage = ratio_or(trainees_placed, trainees.len() as u32, 1.0);
        let assignment_efficiency =
            (worker_utilization + capacity_utilization + leadership_coverage + training_coverage) / 4.0;

        // 3) 约束满足率
        let constraints_total = (leaders.len() + trainees.len()) as u32;
        let constraints_satisfied = leaders_ok + pairs_ok;
        let constraint_satisfaction = ratio_or(constraints_satisfied, constraints_total, 1.0);

        // 4) 平均可用率（仅已分配员工）
        let average_availability = mean_or(
            assigned
                .iter()
                .filter_map(|id| by_id.get(id))
                .map(|w| w.availability_ratio()),
            0.0,
        );

        // 5) 分布均匀度
        let counts: Vec<f64> = grid
            .stations
            .iter()
            .map(|s| f64::from(s.assigned_count(phase)))
            .collect();
        let distribution_uniformity = 1.0 / (1.0 + population_std_dev(&counts));

        let w = &self.config.quality_weights;
        let overall_score = w.balance * balance_index
            + w.efficiency * assignment_efficiency
            + w.constraints * constraint_satisfaction
            + w.availability * average_availability
            + w.uniformity * distribution_uniformity;

        PhaseQuality {
            phase,
            balance_index,
            worker_utilization,
            capacity_utilization,
            leadership_coverage,
            training_coverage,
            assignment_efficiency,
            constraint_satisfaction,
            constraints_total,
            constraints_satisfied,
            average_availability,
            distribution_uniformity,
            overall_score,
            violations,
        }
    }

    // ==========================================
    // 建议生成
    // ==========================================

    fn recommend(&self, metrics: &[(&str, f64)]) -> Vec<String> {
        let mut out = Vec::new();
        for (key, threshold) in self.config.recommendation_thresholds.entries() {
            let value = match metrics.iter().find(|(k, _)| *k == key) {
                Some((_, v)) => *v,
                None => continue,
            };
            if value >= threshold {
                continue;
            }
            let advice = match key {
                "balance_index" => "工位均衡度偏低: 建议将超编工位人员调往缺员工位",
                "worker_utilization" => "员工利用率偏低: 建议补充资质培训, 扩大可分配工位范围",
                "leadership_coverage" => "组长覆盖不足: 检查组长工位是否启用, 或是否与带教固定冲突",
                "training_coverage" => "带教覆盖不足: 检查带教工位是否启用, 以及学员是否具备资质",
                "constraint_satisfaction" => "存在未满足的固定约束: 请按违规清单逐项处理",
                _ => continue,
            };
            out.push(format!("{} ({}={:.2}, 阈值={:.2})", advice, key, value, threshold));
        }
        out
    }
}

// ==========================================
// 统计辅助函数
// ==========================================

fn mean_or(values: impl Iterator<Item = f64>, empty: f64) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        empty
    } else {
        sum / n as f64
    }
}

fn ratio_or(num: u32, den: u32, empty: f64) -> f64 {
    if den == 0 {
        empty
    } else {
        f64::from(num) / f64::from(den)
    }
}

/// 总体标准差
pub(super) fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    var.sqrt()
}
