// ==========================================
// 工位轮岗系统 - 领域模型层
// ==========================================
// 职责: 定义员工、工位、资质、轮岗会话与结果视图
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod capability;
pub mod grid;
pub mod rotation;
pub mod types;
pub mod violation;
pub mod worker;
pub mod workstation;

// 重导出核心类型
pub use capability::Capability;
pub use grid::{Conflict, ConflictKind, RotationGrid, StationSlot};
pub use rotation::{
    RotationAssignment, RotationCounterUpdate, RotationSession, RotationSnapshot, RotationState,
};
pub use types::{LeadershipType, PerPhase, Phase, PlacementReason, WorkerId, WorkstationId};
pub use violation::{Violation, ViolationKind};
pub use worker::Worker;
pub use workstation::{StationCapacity, Workstation};
