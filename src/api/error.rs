// ==========================================
// 工位轮岗系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，把仓储/引擎错误转换为带原因的业务错误
// 红线: 所有错误信息必须包含显式原因与相关 ID
// ==========================================

use crate::engine::error::EngineError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 会话错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("会话未启用: session_id={0}")]
    SessionInactive(String),

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    // ==========================================
    // 生成前置条件
    // ==========================================
    #[error("轮岗生成失败: {0}")]
    GenerationFailed(#[from] EngineError),

    // ==========================================
    // 并发控制错误
    // ==========================================
    #[error("乐观锁冲突: {0}")]
    OptimisticLockFailure(String),

    #[error("快照已过期: session_id={session_id}, snapshot_revision={snapshot_revision}, current_revision={current_revision}")]
    StaleSnapshot {
        session_id: String,
        snapshot_revision: u64,
        current_revision: u64,
    },

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("存储错误: {0}")]
    StorageError(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            // 并发控制错误
            RepositoryError::OptimisticLockFailure {
                session_id,
                expected,
                actual,
            } => ApiError::OptimisticLockFailure(format!(
                "会话{}提交时数据已被修改（期望revision={}，实际revision={}）",
                session_id, expected, actual
            )),
            RepositoryError::LockError(msg) => ApiError::StorageError(format!("存储锁获取失败: {}", msg)),

            // 数据错误
            RepositoryError::NotFound { entity, id } => ApiError::NotFound(format!("{}(id={})不存在", entity, id)),
            RepositoryError::InvalidStateTransition { from, to } => ApiError::InvalidStateTransition { from, to },
            RepositoryError::ValidationError(msg) => ApiError::ValidationError(msg),

            // 通用错误
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
