// ==========================================
// 工位轮岗系统 - 协作方接口
// ==========================================
// 红线: 接口只描述契约, 不规定存储格式
// ==========================================

use crate::domain::grid::RotationGrid;
use crate::domain::rotation::{RotationCounterUpdate, RotationSession, RotationSnapshot};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

/// 快照数据源
#[async_trait]
pub trait RotationSnapshotSource: Send + Sync {
    /// 读取指定会话的生成快照（prior_state.session_id = session_id）
    async fn load_snapshot(&self, session_id: &str) -> RepositoryResult<RotationSnapshot>;

    /// 当前数据修订号
    async fn current_revision(&self) -> RepositoryResult<u64>;
}

/// 轮岗结果提交
#[async_trait]
pub trait RotationCommitSink: Send + Sync {
    /// 提交网格与计数推进
    ///
    /// # 参数
    /// - `expected_revision`: 生成时读取的修订号, 不一致时返回 OptimisticLockFailure
    ///
    /// # 返回
    /// 提交后的新修订号
    async fn commit_rotation(
        &self,
        session_id: &str,
        grid: &RotationGrid,
        counters: &[RotationCounterUpdate],
        expected_revision: u64,
    ) -> RepositoryResult<u64>;

    /// 会话最近一次提交的网格
    async fn latest_grid(&self, session_id: &str) -> RepositoryResult<Option<RotationGrid>>;
}

/// 轮岗会话存储
#[async_trait]
pub trait RotationSessionStore: Send + Sync {
    /// 保存新会话并设为唯一启用会话
    async fn create_session(&self, session: RotationSession) -> RepositoryResult<RotationSession>;

    async fn find_session(&self, session_id: &str) -> RepositoryResult<Option<RotationSession>>;

    async fn active_session(&self) -> RepositoryResult<Option<RotationSession>>;

    async fn deactivate_session(&self, session_id: &str) -> RepositoryResult<()>;
}

/// 完整存储（三类接口的组合）
pub trait RotationStore: RotationSnapshotSource + RotationCommitSink + RotationSessionStore {}

impl<T> RotationStore for T where T: RotationSnapshotSource + RotationCommitSink + RotationSessionStore {}
