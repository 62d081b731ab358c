// ==========================================
// 工位轮岗系统 - 员工领域模型
// ==========================================
// 红线: trainer_id 仅为 ID 引用,计算时按 ID 查找,不持有对象引用
// ==========================================

use crate::domain::rotation::RotationCounterUpdate;
use crate::domain::types::{LeadershipType, Phase, WorkerId, WorkstationId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Worker - 员工
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    // ===== 主键 =====
    pub id: WorkerId,
    pub name: String,

    // ===== 可用性 =====
    pub availability_percentage: u8, // 0-100
    pub is_active: bool,

    // ===== 组长 =====
    #[serde(default)]
    pub is_leader: bool,
    #[serde(default)]
    pub leadership_type: LeadershipType,
    #[serde(default)]
    pub leadership_workstation_id: Option<WorkstationId>,

    // ===== 带教 =====
    #[serde(default)]
    pub is_trainer: bool,
    #[serde(default)]
    pub is_trainee: bool,
    #[serde(default)]
    pub trainer_id: Option<WorkerId>,
    #[serde(default)]
    pub training_workstation_id: Option<WorkstationId>,

    // ===== 备注 (仅提示,不参与计算) =====
    #[serde(default)]
    pub restriction_notes: Option<String>,

    // ===== 轮岗状态 =====
    #[serde(default)]
    pub rotations_in_current_station: u32,
    #[serde(default)]
    pub last_rotation_timestamp: Option<DateTime<Utc>>,
}

impl Worker {
    /// 创建普通在岗员工（可用率 100%）
    pub fn new(id: WorkerId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            availability_percentage: 100,
            is_active: true,
            is_leader: false,
            leadership_type: LeadershipType::None,
            leadership_workstation_id: None,
            is_trainer: false,
            is_trainee: false,
            trainer_id: None,
            training_workstation_id: None,
            restriction_notes: None,
            rotations_in_current_station: 0,
            last_rotation_timestamp: None,
        }
    }

    /// 是否到达强制轮换阈值
    pub fn is_due_for_rotation(&self, threshold: u32) -> bool {
        self.rotations_in_current_station >= threshold
    }

    /// 是否需要在指定阶段固定到组长工位
    pub fn leads_in(&self, phase: Phase) -> bool {
        self.is_leader && self.leadership_type.pins(phase)
    }

    /// 是否声明了完整的带教关系（带教人 + 带教工位）
    pub fn has_training_pair(&self) -> bool {
        self.is_trainee && self.trainer_id.is_some() && self.training_workstation_id.is_some()
    }

    /// 可用率折算为 0.0 - 1.0
    pub fn availability_ratio(&self) -> f64 {
        f64::from(self.availability_percentage.min(100)) / 100.0
    }

    /// 写回轮岗计数推进结果（ID 不匹配时忽略）
    pub fn apply_counter_update(&mut self, update: &RotationCounterUpdate) -> bool {
        if update.worker_id != self.id {
            return false;
        }
        self.rotations_in_current_station = update.rotations_in_current_station;
        self.last_rotation_timestamp = update.last_rotation_timestamp;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leads_in_follows_leadership_type() {
        let mut w = Worker::new(1, "Lead");
        assert!(!w.leads_in(Phase::Current));

        w.is_leader = true;
        w.leadership_type = LeadershipType::SecondPart;
        assert!(!w.leads_in(Phase::Current));
        assert!(w.leads_in(Phase::Next));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let w: Worker = serde_json::from_str(
            r#"{"id":7,"name":"Mia","availability_percentage":80,"is_active":true}"#,
        )
        .unwrap();
        assert_eq!(w.leadership_type, LeadershipType::None);
        assert_eq!(w.trainer_id, None);
        assert_eq!(w.rotations_in_current_station, 0);
        assert!((w.availability_ratio() - 0.8).abs() < 1e-9);
        assert!(w.is_due_for_rotation(0));
        assert!(!w.is_due_for_rotation(1));
    }
}
