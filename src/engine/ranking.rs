// ==========================================
// 工位轮岗系统 - 员工排序引擎
// ==========================================
// 用途: 优先补员与均衡分配共用的候选排序
// 红线: 排序必须是全序, 相同输入得到相同顺序
// ==========================================

use crate::config::DEFAULT_FORCED_ROTATION_THRESHOLD;
use crate::domain::worker::Worker;
use std::cmp::Ordering;

// ==========================================
// WorkerRanker - 候选员工排序
// ==========================================
pub struct WorkerRanker {
    forced_rotation_threshold: u32,
}

impl WorkerRanker {
    /// 构造函数
    ///
    /// # 参数
    /// - `forced_rotation_threshold`: 同一工位连续轮次达到该值即视为应强制轮换
    pub fn new(forced_rotation_threshold: u32) -> Self {
        Self {
            forced_rotation_threshold,
        }
    }

    pub fn is_due(&self, worker: &Worker) -> bool {
        worker.is_due_for_rotation(self.forced_rotation_threshold)
    }

    /// 比较两名员工
    ///
    /// 排序键:
    /// 1) 到达强制轮换阈值者优先
    /// 2) availability_percentage 降序
    /// 3) last_rotation_timestamp 升序 (从未轮换者最先)
    /// 4) id 升序
    pub fn compare(&self, a: &Worker, b: &Worker) -> Ordering {
        self.is_due(b)
            .cmp(&self.is_due(a))
            .then_with(|| b.availability_percentage.cmp(&a.availability_percentage))
            .then_with(|| a.last_rotation_timestamp.cmp(&b.last_rotation_timestamp))
            .then_with(|| a.id.cmp(&b.id))
    }

    /// 排序员工列表（按优先级从高到低）
    pub fn rank<'a>(&self, mut workers: Vec<&'a Worker>) -> Vec<&'a Worker> {
        workers.sort_by(|a, b| self.compare(a, b));
        workers
    }
}

impl Default for WorkerRanker {
    fn default() -> Self {
        Self::new(DEFAULT_FORCED_ROTATION_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn worker(id: i64, availability: u8, rotations: u32) -> Worker {
        let mut w = Worker::new(id, &format!("W{}", id));
        w.availability_percentage = availability;
        w.rotations_in_current_station = rotations;
        w
    }

    #[test]
    fn test_due_workers_rank_first() {
        let a = worker(1, 100, 0);
        let b = worker(2, 50, 2);
        let ranked = WorkerRanker::default().rank(vec![&a, &b]);
        assert_eq!(ranked[0].id, 2);
    }

    #[test]
    fn test_availability_then_timestamp_then_id() {
        let mut a = worker(1, 80, 0);
        let mut b = worker(2, 80, 0);
        let c = worker(3, 80, 0);
        let d = worker(4, 90, 0);
        a.last_rotation_timestamp = Some(Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap());
        b.last_rotation_timestamp = Some(Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap());

        let ranked = WorkerRanker::default().rank(vec![&a, &b, &c, &d]);
        let ids: Vec<_> = ranked.iter().map(|w| w.id).collect();

        // 4 可用率最高; 3 从未轮换; 2 早于 1
        assert_eq!(ids, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_custom_threshold() {
        let a = worker(1, 100, 2);
        let b = worker(2, 90, 3);
        let ranker = WorkerRanker::new(3);
        assert!(!ranker.is_due(&a));
        assert!(ranker.is_due(&b));
        assert_eq!(ranker.rank(vec![&a, &b])[0].id, 2);
    }
}
