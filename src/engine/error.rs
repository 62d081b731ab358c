// ==========================================
// 工位轮岗系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 注: 约束违规不走错误通道, 见 domain::violation
// ==========================================

use crate::domain::types::{WorkerId, WorkstationId};
use thiserror::Error;

/// 引擎层错误类型（仅致命前置条件）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("无可分配员工: 共 {total_workers} 名员工, 停用 {inactive} 名, 无可分配资质 {ineligible} 名")]
    NoEligibleWorkers {
        total_workers: usize,
        inactive: usize,
        ineligible: usize,
    },

    #[error("无启用工位: 共 {total_workstations} 个工位均未启用")]
    NoActiveWorkstations { total_workstations: usize },

    #[error("快照数据无效: 员工 ID 重复 worker_id={0}")]
    DuplicateWorkerId(WorkerId),

    #[error("快照数据无效: 工位 ID 重复 workstation_id={0}")]
    DuplicateWorkstationId(WorkstationId),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
