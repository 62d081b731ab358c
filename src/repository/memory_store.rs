// ==========================================
// 工位轮岗系统 - 内存存储
// ==========================================
// 用途: 协作方接口的参考实现, 供测试与演示使用
// 红线: 每次数据变更修订号 +1; 提交必须校验修订号
// ==========================================

use crate::domain::capability::Capability;
use crate::domain::grid::RotationGrid;
use crate::domain::rotation::{
    RotationAssignment, RotationCounterUpdate, RotationSession, RotationSnapshot, RotationState,
};
use crate::domain::worker::Worker;
use crate::domain::workstation::Workstation;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::rotation_repo::{RotationCommitSink, RotationSessionStore, RotationSnapshotSource};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct StoreState {
    workers: Vec<Worker>,
    workstations: Vec<Workstation>,
    capabilities: Vec<Capability>,
    revision: u64,
    sessions: Vec<RotationSession>,
    grids: HashMap<String, RotationGrid>,
    /// 最近一次提交的分配记录（下一次生成的 prior state）
    last_assignments: Vec<RotationAssignment>,
}

// ==========================================
// InMemoryRotationStore - 内存存储
// ==========================================
#[derive(Debug, Default)]
pub struct InMemoryRotationStore {
    state: Mutex<StoreState>,
}

impl InMemoryRotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(workers: Vec<Worker>, workstations: Vec<Workstation>, capabilities: Vec<Capability>) -> Self {
        Self {
            state: Mutex::new(StoreState {
                workers,
                workstations,
                capabilities,
                ..StoreState::default()
            }),
        }
    }

    // ==========================================
    // 数据维护（每次变更修订号 +1）
    // ==========================================

    pub fn upsert_worker(&self, worker: Worker) -> RepositoryResult<u64> {
        let mut state = self.state.lock()?;
        match state.workers.iter_mut().find(|w| w.id == worker.id) {
            Some(existing) => *existing = worker,
            None => state.workers.push(worker),
        }
        state.revision += 1;
        Ok(state.revision)
    }

    pub fn upsert_workstation(&self, workstation: Workstation) -> RepositoryResult<u64> {
        let mut state = self.state.lock()?;
        match state.workstations.iter_mut().find(|ws| ws.id == workstation.id) {
            Some(existing) => *existing = workstation,
            None => state.workstations.push(workstation),
        }
        state.revision += 1;
        Ok(state.revision)
    }

    pub fn upsert_capability(&self, capability: Capability) -> RepositoryResult<u64> {
        let mut state = self.state.lock()?;
        match state.capabilities.iter_mut().find(|c| {
            c.worker_id == capability.worker_id && c.workstation_id == capability.workstation_id
        }) {
            Some(existing) => *existing = capability,
            None => state.capabilities.push(capability),
        }
        state.revision += 1;
        Ok(state.revision)
    }

    pub fn workers(&self) -> RepositoryResult<Vec<Worker>> {
        Ok(self.state.lock()?.workers.clone())
    }

    pub fn last_assignments(&self) -> RepositoryResult<Vec<RotationAssignment>> {
        Ok(self.state.lock()?.last_assignments.clone())
    }
}

#[async_trait]
impl RotationSnapshotSource for InMemoryRotationStore {
    async fn load_snapshot(&self, session_id: &str) -> RepositoryResult<RotationSnapshot> {
        let state = self.state.lock()?;
        Ok(RotationSnapshot {
            workers: state.workers.clone(),
            workstations: state.workstations.clone(),
            capabilities: state.capabilities.clone(),
            prior_state: RotationState::new(session_id).with_previous(state.last_assignments.clone()),
            revision: state.revision,
        })
    }

    async fn current_revision(&self) -> RepositoryResult<u64> {
        Ok(self.state.lock()?.revision)
    }
}

#[async_trait]
impl RotationCommitSink for InMemoryRotationStore {
    async fn commit_rotation(
        &self,
        session_id: &str,
        grid: &RotationGrid,
        counters: &[RotationCounterUpdate],
        expected_revision: u64,
    ) -> RepositoryResult<u64> {
        let mut state = self.state.lock()?;

        if state.revision != expected_revision {
            return Err(RepositoryError::OptimisticLockFailure {
                session_id: session_id.to_string(),
                expected: expected_revision,
                actual: state.revision,
            });
        }
        let session = state
            .sessions
            .iter()
            .find(|s| s.id == session_id)
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "RotationSession".to_string(),
                id: session_id.to_string(),
            })?;
        if !session.is_active {
            return Err(RepositoryError::InvalidStateTransition {
                from: "INACTIVE".to_string(),
                to: "COMMITTED".to_string(),
            });
        }
        if grid.session_id != session_id {
            return Err(RepositoryError::ValidationError(format!(
                "网格会话不一致: grid.session_id={}, session_id={}",
                grid.session_id, session_id
            )));
        }

        let mut updated = 0usize;
        for update in counters {
            if let Some(worker) = state.workers.iter_mut().find(|w| w.id == update.worker_id) {
                if worker.apply_counter_update(update) {
                    updated += 1;
                }
            }
        }
        state.last_assignments = grid.assignments();
        state.grids.insert(session_id.to_string(), grid.clone());
        state.revision += 1;

        info!(
            session_id = %session_id,
            revision = state.revision,
            assignments = state.last_assignments.len(),
            counters_updated = updated,
            "轮岗结果已提交"
        );
        Ok(state.revision)
    }

    async fn latest_grid(&self, session_id: &str) -> RepositoryResult<Option<RotationGrid>> {
        Ok(self.state.lock()?.grids.get(session_id).cloned())
    }
}

#[async_trait]
impl RotationSessionStore for InMemoryRotationStore {
    async fn create_session(&self, mut session: RotationSession) -> RepositoryResult<RotationSession> {
        let mut state = self.state.lock()?;
        if state.sessions.iter().any(|s| s.id == session.id) {
            return Err(RepositoryError::ValidationError(format!("会话已存在: {}", session.id)));
        }
        for existing in state.sessions.iter_mut().filter(|s| s.is_active) {
            existing.is_active = false;
            debug!(session_id = %existing.id, "旧会话停用");
        }
        session.is_active = true;
        state.sessions.push(session.clone());
        Ok(session)
    }

    async fn find_session(&self, session_id: &str) -> RepositoryResult<Option<RotationSession>> {
        Ok(self
            .state
            .lock()?
            .sessions
            .iter()
            .find(|s| s.id == session_id)
            .cloned())
    }

    async fn active_session(&self) -> RepositoryResult<Option<RotationSession>> {
        Ok(self.state.lock()?.sessions.iter().find(|s| s.is_active).cloned())
    }

    async fn deactivate_session(&self, session_id: &str) -> RepositoryResult<()> {
        let mut state = self.state.lock()?;
        let session = state
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "RotationSession".to_string(),
                id: session_id.to_string(),
            })?;
        session.is_active = false;
        Ok(())
    }
}
