// ==========================================
// 工位轮岗系统 - 核心库
// ==========================================
// 核心: 轮岗分配引擎 + 轮岗质量评估
// 系统定位: 纯计算引擎, 持久化与调度由调用方负责
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 配置层 - 引擎参数
pub mod config;

// 引擎层 - 分配规则与质量评估
pub mod engine;

// 数据仓储层 - 协作方契约
pub mod repository;

// API 层 - 调用方侧协调
pub mod api;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{LeadershipType, PerPhase, Phase, PlacementReason, WorkerId, WorkstationId};

// 领域实体
pub use domain::{
    Capability, Conflict, ConflictKind, RotationAssignment, RotationGrid, RotationSession,
    RotationSnapshot, RotationState, StationSlot, Violation, ViolationKind, Worker, Workstation,
};

// 配置
pub use config::{ConfigManager, RotationConfig};

// 引擎
pub use engine::{
    EngineError, QualityEvaluator, QualityReport, RotationCounterTracker, RotationOrchestrator,
    RotationOutcome,
};

// API
pub use api::{ApiError, RotationApi};

// 仓储
pub use repository::{InMemoryRotationStore, RepositoryError};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "工位轮岗系统";
