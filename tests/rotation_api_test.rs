// ==========================================
// RotationApi 集成测试
// ==========================================
// 测试目标: 会话管理、按会话串行生成、过期快照拒绝提交
// ==========================================

mod helpers;

use async_trait::async_trait;
use helpers::test_data_builder::*;
use std::sync::Arc;
use workstation_rotation::api::{ApiError, RotationApi};
use workstation_rotation::config::RotationConfig;
use workstation_rotation::domain::{Phase, RotationGrid, RotationSession, RotationSnapshot};
use workstation_rotation::domain::rotation::RotationCounterUpdate;
use workstation_rotation::logging;
use workstation_rotation::repository::{
    InMemoryRotationStore, RepositoryResult, RotationCommitSink, RotationSessionStore, RotationSnapshotSource,
};

// ==========================================
// 测试辅助函数
// ==========================================

/// 两名员工、两个编制为 1 的普通工位
fn two_station_store() -> Arc<InMemoryRotationStore> {
    let workers = vec![WorkerBuilder::new(1).build(), WorkerBuilder::new(2).build()];
    let stations = vec![station(10, 1), station(20, 1)];
    let caps = caps_for(&[1, 2], &[10, 20]);
    Arc::new(InMemoryRotationStore::with_data(workers, stations, caps))
}

fn api_for<S>(store: Arc<S>) -> RotationApi<S>
where
    S: workstation_rotation::repository::RotationStore,
{
    RotationApi::new(store, Arc::new(RotationConfig::default()))
}

/// 每次读取修订号都比真实值大 1, 模拟生成期间数据被修改
struct DriftingStore {
    inner: InMemoryRotationStore,
}

#[async_trait]
impl RotationSnapshotSource for DriftingStore {
    async fn load_snapshot(&self, session_id: &str) -> RepositoryResult<RotationSnapshot> {
        self.inner.load_snapshot(session_id).await
    }

    async fn current_revision(&self) -> RepositoryResult<u64> {
        Ok(self.inner.current_revision().await? + 1)
    }
}

#[async_trait]
impl RotationCommitSink for DriftingStore {
    async fn commit_rotation(
        &self,
        session_id: &str,
        grid: &RotationGrid,
        counters: &[RotationCounterUpdate],
        expected_revision: u64,
    ) -> RepositoryResult<u64> {
        self.inner
            .commit_rotation(session_id, grid, counters, expected_revision)
            .await
    }

    async fn latest_grid(&self, session_id: &str) -> RepositoryResult<Option<RotationGrid>> {
        self.inner.latest_grid(session_id).await
    }
}

#[async_trait]
impl RotationSessionStore for DriftingStore {
    async fn create_session(&self, session: RotationSession) -> RepositoryResult<RotationSession> {
        self.inner.create_session(session).await
    }

    async fn find_session(&self, session_id: &str) -> RepositoryResult<Option<RotationSession>> {
        self.inner.find_session(session_id).await
    }

    async fn active_session(&self) -> RepositoryResult<Option<RotationSession>> {
        self.inner.active_session().await
    }

    async fn deactivate_session(&self, session_id: &str) -> RepositoryResult<()> {
        self.inner.deactivate_session(session_id).await
    }
}

// ==========================================
// 会话管理
// ==========================================

#[tokio::test]
async fn test_start_session_validates_input() {
    let api = api_for(two_station_store());

    assert!(matches!(api.start_session("  ", 240).await, Err(ApiError::InvalidInput(_))));
    assert!(matches!(api.start_session("早班", 0).await, Err(ApiError::InvalidInput(_))));
    assert!(api.active_session().await.unwrap().is_none());
}

#[tokio::test]
async fn test_new_session_deactivates_previous() {
    let api = api_for(two_station_store());

    let first = api.start_session("早班", 240).await.unwrap();
    let second = api.start_session("中班", 120).await.unwrap();

    let active = api.active_session().await.unwrap().unwrap();
    assert_eq!(active.id, second.id);
    assert_ne!(first.id, second.id);
    assert!(matches!(api.generate(&first.id).await, Err(ApiError::SessionInactive(_))));
}

#[tokio::test]
async fn test_unknown_session_not_found() {
    let api = api_for(two_station_store());

    assert!(matches!(api.generate("no-such-session").await, Err(ApiError::NotFound(_))));
    assert!(matches!(api.end_session("no-such-session").await, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn test_end_session_blocks_generation() {
    let api = api_for(two_station_store());
    let session = api.start_session("早班", 240).await.unwrap();

    api.end_session(&session.id).await.unwrap();

    assert!(api.active_session().await.unwrap().is_none());
    assert!(matches!(api.preview(&session.id).await, Err(ApiError::SessionInactive(_))));
}

// ==========================================
// 生成与提交
// ==========================================

#[tokio::test]
async fn test_generate_commits_and_bumps_revision() {
    logging::init_test();
    let store = two_station_store();
    let api = api_for(store.clone());
    let session = api.start_session("早班", 240).await.unwrap();

    let report = api.generate(&session.id).await.unwrap();

    assert_eq!(report.snapshot_revision, 0);
    assert_eq!(report.committed_revision, 1);
    assert_eq!(report.counters.len(), 2);
    assert!(report.counters.iter().all(|c| c.station_changed && c.rotations_in_current_station == 0));
    assert_eq!(store.last_assignments().unwrap().len(), 4);
    assert!(store.latest_grid(&session.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_preview_does_not_commit() {
    let store = two_station_store();
    let api = api_for(store.clone());
    let session = api.start_session("早班", 240).await.unwrap();

    let preview = api.preview(&session.id).await.unwrap();

    assert_eq!(preview.snapshot_revision, 0);
    assert_eq!(store.current_revision().await.unwrap(), 0);
    assert!(store.latest_grid(&session.id).await.unwrap().is_none());
    assert!(matches!(api.evaluate_latest(&session.id).await, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn test_repeated_generation_forces_rotation() {
    let store = two_station_store();
    let api = api_for(store.clone());
    let session = api.start_session("早班", 240).await.unwrap();

    // 第 1 轮: 1->10, 2->20, 计数清零
    let first = api.generate(&session.id).await.unwrap();
    assert_eq!(first.outcome.grid.station_of(1, Phase::Current), Some(10));
    assert_eq!(first.outcome.grid.station_of(2, Phase::Current), Some(20));

    // 第 2、3 轮: 未到阈值, 留在原工位并累加计数
    api.generate(&session.id).await.unwrap();
    let third = api.generate(&session.id).await.unwrap();
    assert_eq!(third.outcome.grid.station_of(1, Phase::Current), Some(10));
    assert!(third.counters.iter().all(|c| !c.station_changed && c.rotations_in_current_station == 2));

    // 第 4 轮: 计数达到阈值 2, 强制调岗
    let fourth = api.generate(&session.id).await.unwrap();
    assert_eq!(fourth.outcome.grid.station_of(1, Phase::Current), Some(20));
    assert_eq!(fourth.outcome.grid.station_of(2, Phase::Current), Some(10));
    assert!(fourth.counters.iter().all(|c| c.station_changed && c.rotations_in_current_station == 0));
    assert_eq!(fourth.committed_revision, 4);

    let workers = store.workers().unwrap();
    assert!(workers.iter().all(|w| w.rotations_in_current_station == 0));
    assert!(workers.iter().all(|w| w.last_rotation_timestamp.is_some()));
}

#[tokio::test]
async fn test_concurrent_generation_is_serialized() {
    let store = two_station_store();
    let api = Arc::new(api_for(store.clone()));
    let session = api.start_session("早班", 240).await.unwrap();

    let (a, b) = tokio::join!(api.generate(&session.id), api.generate(&session.id));
    let a = a.unwrap();
    let b = b.unwrap();

    let mut revisions = vec![a.committed_revision, b.committed_revision];
    revisions.sort_unstable();
    assert_eq!(revisions, vec![1, 2]);
    assert_eq!(store.current_revision().await.unwrap(), 2);
}

#[tokio::test]
async fn test_stale_snapshot_is_not_committed() {
    let store = Arc::new(DriftingStore {
        inner: InMemoryRotationStore::with_data(
            vec![WorkerBuilder::new(1).build()],
            vec![station(10, 1)],
            vec![cap(1, 10)],
        ),
    });
    let api = api_for(store.clone());
    let session = api.start_session("早班", 240).await.unwrap();

    let err = api.generate(&session.id).await.unwrap_err();

    assert!(matches!(
        err,
        ApiError::StaleSnapshot { snapshot_revision: 0, current_revision: 1, .. }
    ));
    assert!(store.latest_grid(&session.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_generation_failure_surfaces_engine_error() {
    let store = Arc::new(InMemoryRotationStore::with_data(
        vec![WorkerBuilder::new(1).inactive().build()],
        vec![station(10, 1)],
        vec![cap(1, 10)],
    ));
    let api = api_for(store);
    let session = api.start_session("早班", 240).await.unwrap();

    let err = api.generate(&session.id).await.unwrap_err();

    assert!(matches!(err, ApiError::GenerationFailed(_)));
}

#[tokio::test]
async fn test_evaluate_latest_after_commit() {
    let store = two_station_store();
    let api = api_for(store);
    let session = api.start_session("早班", 240).await.unwrap();
    let report = api.generate(&session.id).await.unwrap();

    let quality = api.evaluate_latest(&session.id).await.unwrap();

    assert_eq!(quality.session_id, session.id);
    assert!((quality.overall_score - report.quality.overall_score).abs() < 1e-9);
}
