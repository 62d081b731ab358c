// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{DateTime, Utc};
use std::sync::Arc;
use workstation_rotation::config::RotationConfig;
use workstation_rotation::domain::{
    Capability, LeadershipType, RotationAssignment, RotationSnapshot, RotationState, Worker,
    Workstation,
};
use workstation_rotation::domain::types::{Phase, WorkerId, WorkstationId};
use workstation_rotation::engine::RotationOrchestrator;

// ==========================================
// Worker 构建器
// ==========================================

pub struct WorkerBuilder {
    worker: Worker,
}

impl WorkerBuilder {
    pub fn new(id: WorkerId) -> Self {
        Self {
            worker: Worker::new(id, &format!("Worker-{}", id)),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.worker.name = name.to_string();
        self
    }

    pub fn availability(mut self, pct: u8) -> Self {
        self.worker.availability_percentage = pct;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.worker.is_active = false;
        self
    }

    pub fn leader(mut self, kind: LeadershipType, station: WorkstationId) -> Self {
        self.worker.is_leader = true;
        self.worker.leadership_type = kind;
        self.worker.leadership_workstation_id = Some(station);
        self
    }

    pub fn trainer(mut self) -> Self {
        self.worker.is_trainer = true;
        self
    }

    pub fn trainee_of(mut self, trainer_id: WorkerId, station: WorkstationId) -> Self {
        self.worker.is_trainee = true;
        self.worker.trainer_id = Some(trainer_id);
        self.worker.training_workstation_id = Some(station);
        self
    }

    pub fn rotations(mut self, n: u32) -> Self {
        self.worker.rotations_in_current_station = n;
        self
    }

    pub fn last_rotation(mut self, at: DateTime<Utc>) -> Self {
        self.worker.last_rotation_timestamp = Some(at);
        self
    }

    pub fn build(self) -> Worker {
        self.worker
    }
}

// ==========================================
// 工位 / 资质 快捷函数
// ==========================================

pub fn station(id: WorkstationId, required: u32) -> Workstation {
    Workstation::new(id, &format!("Station-{}", id), required)
}

pub fn priority_station(id: WorkstationId, required: u32) -> Workstation {
    station(id, required).priority()
}

pub fn inactive_station(id: WorkstationId, required: u32) -> Workstation {
    let mut ws = station(id, required);
    ws.is_active = false;
    ws
}

/// 可分配资质（等级 3）
pub fn cap(worker_id: WorkerId, station_id: WorkstationId) -> Capability {
    Capability::new(worker_id, station_id, 3)
}

/// 员工 × 工位 全部可分配
pub fn caps_for(workers: &[WorkerId], stations: &[WorkstationId]) -> Vec<Capability> {
    workers
        .iter()
        .flat_map(|w| stations.iter().map(move |s| cap(*w, *s)))
        .collect()
}

pub fn prior(worker_id: WorkerId, station_id: WorkstationId, phase: Phase) -> RotationAssignment {
    RotationAssignment {
        session_id: "prev".to_string(),
        worker_id,
        workstation_id: station_id,
        phase,
    }
}

pub fn snapshot(
    workers: Vec<Worker>,
    workstations: Vec<Workstation>,
    capabilities: Vec<Capability>,
) -> RotationSnapshot {
    RotationSnapshot {
        workers,
        workstations,
        capabilities,
        prior_state: RotationState::new("session-test"),
        revision: 0,
    }
}

pub fn orchestrator() -> RotationOrchestrator {
    RotationOrchestrator::new(Arc::new(RotationConfig::default()))
}
