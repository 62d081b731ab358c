// ==========================================
// 工位轮岗系统 - 轮岗计数推进
// ==========================================
// 用途: 根据新网格推进 rotations_in_current_station / last_rotation_timestamp
// 规则: 工位不变 -> 计数 +1; 工位变化 -> 计数清零并记录时间
// 红线: 只计算, 由调用方落库
// ==========================================

use crate::domain::grid::RotationGrid;
use crate::domain::rotation::{RotationCounterUpdate, RotationState};
use crate::domain::types::Phase;
use crate::domain::worker::Worker;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;

pub struct RotationCounterTracker {
    // 无状态引擎，不需要注入依赖
}

impl RotationCounterTracker {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算每名已分配员工的计数推进（按员工 ID 升序）
    ///
    /// 未出现在 CURRENT 阶段的员工不产生记录
    pub fn advance(
        &self,
        workers: &[Worker],
        prior_state: &RotationState,
        grid: &RotationGrid,
        now: DateTime<Utc>,
    ) -> Vec<RotationCounterUpdate> {
        let mut ordered: Vec<&Worker> = workers.iter().collect();
        ordered.sort_by_key(|w| w.id);

        let mut updates = Vec::new();
        for worker in ordered {
            let new_station = match grid.station_of(worker.id, Phase::Current) {
                Some(id) => id,
                None => continue,
            };
            let previous_station = prior_state.prior_station(worker.id);
            let station_changed = previous_station != Some(new_station);

            let (rotations, timestamp) = if station_changed {
                (0, Some(now))
            } else {
                (
                    worker.rotations_in_current_station.saturating_add(1),
                    worker.last_rotation_timestamp,
                )
            };

            updates.push(RotationCounterUpdate {
                worker_id: worker.id,
                previous_station,
                new_station,
                station_changed,
                rotations_in_current_station: rotations,
                last_rotation_timestamp: timestamp,
            });
        }

        debug!(
            updates = updates.len(),
            changed = updates.iter().filter(|u| u.station_changed).count(),
            "轮岗计数推进完成"
        );

        updates
    }

    /// 把推进结果写回员工快照
    ///
    /// # 返回
    /// 实际更新的员工数量
    pub fn apply(&self, workers: &mut [Worker], updates: &[RotationCounterUpdate]) -> usize {
        let by_id: BTreeMap<_, &RotationCounterUpdate> = updates.iter().map(|u| (u.worker_id, u)).collect();
        let mut applied = 0;
        for worker in workers.iter_mut() {
            if let Some(update) = by_id.get(&worker.id) {
                if worker.apply_counter_update(update) {
                    applied += 1;
                }
            }
        }
        applied
    }
}

impl Default for RotationCounterTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::StationSlot;
    use crate::domain::rotation::RotationAssignment;
    use chrono::TimeZone;

    fn grid_with(current: Vec<(i64, Vec<i64>)>) -> RotationGrid {
        RotationGrid {
            session_id: "s-2".to_string(),
            stations: current
                .into_iter()
                .map(|(id, workers)| StationSlot {
                    workstation_id: id,
                    name: format!("S{}", id),
                    required_workers: 2,
                    is_priority: false,
                    current: workers.clone(),
                    next: workers,
                })
                .collect(),
            total_current_assigned: 0,
            total_next_assigned: 0,
            total_required: 0,
            current_completion_pct: 0.0,
            next_completion_pct: 0.0,
            conflicts: Vec::new(),
        }
    }

    #[test]
    fn test_counter_increments_or_resets() {
        let earlier = Utc.with_ymd_and_hms(2026, 1, 5, 6, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 5, 14, 0, 0).unwrap();

        let mut stay = Worker::new(1, "Stay");
        stay.rotations_in_current_station = 1;
        stay.last_rotation_timestamp = Some(earlier);
        let mut mover = Worker::new(2, "Move");
        mover.rotations_in_current_station = 4;
        let fresh = Worker::new(3, "Fresh");
        let absent = Worker::new(4, "Absent");
        let mut workers = vec![stay, mover, fresh, absent];

        let prior = RotationState::new("s-2").with_previous(vec![
            RotationAssignment {
                session_id: "s-1".to_string(),
                worker_id: 1,
                workstation_id: 10,
                phase: Phase::Next,
            },
            RotationAssignment {
                session_id: "s-1".to_string(),
                worker_id: 2,
                workstation_id: 10,
                phase: Phase::Next,
            },
        ]);
        let grid = grid_with(vec![(10, vec![1]), (20, vec![2, 3])]);

        let tracker = RotationCounterTracker::new();
        let updates = tracker.advance(&workers, &prior, &grid, now);

        assert_eq!(updates.len(), 3);
        assert!(!updates[0].station_changed);
        assert_eq!(updates[0].rotations_in_current_station, 2);
        assert_eq!(updates[0].last_rotation_timestamp, Some(earlier));
        assert!(updates[1].station_changed);
        assert_eq!(updates[1].rotations_in_current_station, 0);
        assert_eq!(updates[1].last_rotation_timestamp, Some(now));
        assert_eq!(updates[2].previous_station, None);
        assert!(updates[2].station_changed);

        assert_eq!(tracker.apply(&mut workers, &updates), 3);
        assert_eq!(workers[0].rotations_in_current_station, 2);
        assert_eq!(workers[1].rotations_in_current_station, 0);
        assert_eq!(workers[3].last_rotation_timestamp, None);
    }
}
