// ==========================================
// 工位轮岗系统 - 轮岗生成 API
// ==========================================
// 职责: 会话管理、按会话串行生成、快照重校验后提交
// 红线: 过期快照的生成结果不得提交
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::RotationConfig;
use crate::domain::rotation::{RotationCounterUpdate, RotationSession};
use crate::engine::{
    QualityEvaluator, QualityReport, RotationCounterTracker, RotationOrchestrator, RotationOutcome,
};
use crate::repository::RotationStore;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument, warn};

// ==========================================
// 返回结构
// ==========================================

/// 预览结果（不提交）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationPreview {
    pub session_id: String,
    pub snapshot_revision: u64,
    pub outcome: RotationOutcome,
    pub quality: QualityReport,
}

/// 生成并提交的结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub session_id: String,
    /// 生成所用快照的修订号
    pub snapshot_revision: u64,
    /// 提交后的修订号
    pub committed_revision: u64,
    pub outcome: RotationOutcome,
    pub quality: QualityReport,
    pub counters: Vec<RotationCounterUpdate>,
}

// ==========================================
// RotationApi - 轮岗生成 API
// ==========================================

/// 轮岗生成API
///
/// 职责：
/// 1. 会话管理（创建、查询、停用）
/// 2. 按会话串行生成并提交
/// 3. 预览与质量评估
pub struct RotationApi<S>
where
    S: RotationStore,
{
    store: Arc<S>,
    config: Arc<RotationConfig>,
    orchestrator: RotationOrchestrator,
    evaluator: QualityEvaluator,
    counters: RotationCounterTracker,
    // 每个会话一把异步锁
    session_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl<S> RotationApi<S>
where
    S: RotationStore,
{
    /// 创建新的RotationApi实例
    pub fn new(store: Arc<S>, config: Arc<RotationConfig>) -> Self {
        Self {
            orchestrator: RotationOrchestrator::new(config.clone()),
            evaluator: QualityEvaluator::new(config.clone()),
            counters: RotationCounterTracker::new(),
            session_locks: Mutex::new(HashMap::new()),
            store,
            config,
        }
    }

    pub fn config(&self) -> &RotationConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    // ==========================================
    // 会话管理
    // ==========================================

    /// 创建新会话（其他会话自动停用）
    ///
    /// # 参数
    /// - `name`: 会话名称（非空）
    /// - `rotation_interval_minutes`: 轮换间隔（> 0）
    #[instrument(skip(self))]
    pub async fn start_session(&self, name: &str, rotation_interval_minutes: u32) -> ApiResult<RotationSession> {
        if name.trim().is_empty() {
            return Err(ApiError::InvalidInput("会话名称不能为空".to_string()));
        }
        if rotation_interval_minutes == 0 {
            return Err(ApiError::InvalidInput("轮换间隔必须大于0分钟".to_string()));
        }

        let session = self
            .store
            .create_session(RotationSession::new(name.trim(), rotation_interval_minutes))
            .await?;
        // 其他会话已停用, 其锁不再需要
        self.retain_session_locks(|id| id == session.id)?;
        info!(session_id = %session.id, name = %session.name, "轮岗会话已创建");
        Ok(session)
    }

    pub async fn active_session(&self) -> ApiResult<Option<RotationSession>> {
        Ok(self.store.active_session().await?)
    }

    pub async fn end_session(&self, session_id: &str) -> ApiResult<()> {
        self.store.deactivate_session(session_id).await?;
        self.retain_session_locks(|id| id != session_id)?;
        info!(session_id = %session_id, "轮岗会话已停用");
        Ok(())
    }

    // ==========================================
    // 生成
    // ==========================================

    /// 生成并提交（同一会话串行执行）
    ///
    /// 流程:
    /// 1) 校验会话存在且启用, 再获取会话锁
    /// 2) 持锁后复核会话状态, 读取快照并生成
    /// 3) 重新读取修订号, 变化则返回 StaleSnapshot
    /// 4) 带期望修订号提交
    #[instrument(skip(self))]
    pub async fn generate(&self, session_id: &str) -> ApiResult<GenerationReport> {
        self.require_active(session_id).await?;
        let lock = self.session_lock(session_id)?;
        let _guard = lock.lock().await;

        // 等锁期间会话可能已停用
        self.require_active(session_id).await?;
        let snapshot = self.store.load_snapshot(session_id).await?;
        let (outcome, quality) = self.orchestrator.generate_and_evaluate(&snapshot)?;
        let counters = self
            .counters
            .advance(&snapshot.workers, &snapshot.prior_state, &outcome.grid, Utc::now());

        let current_revision = self.store.current_revision().await?;
        if current_revision != snapshot.revision {
            warn!(
                session_id = %session_id,
                snapshot_revision = snapshot.revision,
                current_revision = current_revision,
                "快照已过期, 放弃提交"
            );
            return Err(ApiError::StaleSnapshot {
                session_id: session_id.to_string(),
                snapshot_revision: snapshot.revision,
                current_revision,
            });
        }

        let committed_revision = self
            .store
            .commit_rotation(session_id, &outcome.grid, &counters, snapshot.revision)
            .await?;

        info!(
            session_id = %session_id,
            committed_revision = committed_revision,
            violations = outcome.violations.len(),
            overall_score = quality.overall_score,
            "轮岗生成并提交完成"
        );

        Ok(GenerationReport {
            session_id: session_id.to_string(),
            snapshot_revision: snapshot.revision,
            committed_revision,
            outcome,
            quality,
            counters,
        })
    }

    /// 预览（不提交）
    #[instrument(skip(self))]
    pub async fn preview(&self, session_id: &str) -> ApiResult<RotationPreview> {
        self.require_active(session_id).await?;
        let snapshot = self.store.load_snapshot(session_id).await?;
        let (outcome, quality) = self.orchestrator.generate_and_evaluate(&snapshot)?;
        Ok(RotationPreview {
            session_id: session_id.to_string(),
            snapshot_revision: snapshot.revision,
            outcome,
            quality,
        })
    }

    /// 评估会话最近一次提交的网格
    #[instrument(skip(self))]
    pub async fn evaluate_latest(&self, session_id: &str) -> ApiResult<QualityReport> {
        let grid = self
            .store
            .latest_grid(session_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("会话{}尚无已提交的轮岗网格", session_id)))?;
        let snapshot = self.store.load_snapshot(session_id).await?;
        Ok(self
            .evaluator
            .evaluate(&grid, &snapshot.workers, &snapshot.workstations))
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    async fn require_active(&self, session_id: &str) -> ApiResult<RotationSession> {
        let session = self
            .store
            .find_session(session_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("RotationSession(id={})不存在", session_id)))?;
        if !session.is_active {
            return Err(ApiError::SessionInactive(session_id.to_string()));
        }
        Ok(session)
    }

    fn session_lock(&self, session_id: &str) -> ApiResult<Arc<tokio::sync::Mutex<()>>> {
        let mut locks = self
            .session_locks
            .lock()
            .map_err(|e| ApiError::InternalError(format!("会话锁表获取失败: {}", e)))?;
        Ok(locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone())
    }

    fn retain_session_locks(&self, keep: impl Fn(&str) -> bool) -> ApiResult<()> {
        self.session_locks
            .lock()
            .map_err(|e| ApiError::InternalError(format!("会话锁表获取失败: {}", e)))?
            .retain(|id, _| keep(id.as_str()));
        Ok(())
    }

    #[cfg(test)]
    fn session_lock_count(&self) -> usize {
        self.session_locks.lock().map(|locks| locks.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::capability::Capability;
    use crate::domain::worker::Worker;
    use crate::domain::workstation::Workstation;
    use crate::repository::InMemoryRotationStore;

    fn api() -> RotationApi<InMemoryRotationStore> {
        let store = InMemoryRotationStore::with_data(
            vec![Worker::new(1, "W1")],
            vec![Workstation::new(10, "A", 1)],
            vec![Capability::new(1, 10, 3)],
        );
        RotationApi::new(Arc::new(store), Arc::new(RotationConfig::default()))
    }

    #[tokio::test]
    async fn test_unknown_session_leaves_no_lock_entry() {
        let api = api();

        for _ in 0..3 {
            assert!(matches!(api.generate("no-such-session").await, Err(ApiError::NotFound(_))));
        }

        assert_eq!(api.session_lock_count(), 0);
    }

    #[tokio::test]
    async fn test_end_session_releases_lock_entry() {
        let api = api();
        let session = api.start_session("早班", 240).await.unwrap();
        api.generate(&session.id).await.unwrap();
        assert_eq!(api.session_lock_count(), 1);

        api.end_session(&session.id).await.unwrap();

        assert_eq!(api.session_lock_count(), 0);
        assert!(matches!(api.generate(&session.id).await, Err(ApiError::SessionInactive(_))));
        assert_eq!(api.session_lock_count(), 0);
    }

    #[tokio::test]
    async fn test_new_session_releases_previous_lock_entry() {
        let api = api();
        let first = api.start_session("早班", 240).await.unwrap();
        api.generate(&first.id).await.unwrap();

        let second = api.start_session("中班", 240).await.unwrap();
        assert_eq!(api.session_lock_count(), 0);

        api.generate(&second.id).await.unwrap();
        assert_eq!(api.session_lock_count(), 1);
    }
}
