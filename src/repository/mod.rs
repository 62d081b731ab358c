// ==========================================
// 工位轮岗系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含分配逻辑
// ==========================================
// 职责: 提供快照读取 / 结果提交 / 会话管理接口
// 约束: 提交使用修订号做乐观并发校验
// ==========================================

pub mod error;
pub mod memory_store;
pub mod rotation_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use memory_store::InMemoryRotationStore;
pub use rotation_repo::{RotationCommitSink, RotationSessionStore, RotationSnapshotSource, RotationStore};
