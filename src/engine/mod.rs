// ==========================================
// 工位轮岗系统 - 引擎层
// ==========================================
// 流程: 准入 -> 固定 -> 优先补员 -> 均衡 -> 网格 -> 质量评估
// ==========================================
// 职责: 实现分配规则与质量评估, 不做任何 I/O
// 红线: 引擎只读输入快照, 所有约束违规必须输出 reason
// ==========================================

pub mod assignment;
pub mod balance;
pub mod context;
pub mod eligibility;
pub mod error;
pub mod grid_builder;
pub mod orchestrator;
pub mod pin_resolver;
pub mod priority_filler;
pub mod quality;
pub mod ranking;
pub mod rotation_counter;

// 重导出核心引擎
pub use assignment::{Placement, WorkingAssignment};
pub use balance::{BalanceDistributor, BalanceOutcome};
pub use context::RotationContext;
pub use eligibility::{EligibilityResolver, EligibilityResult};
pub use error::{EngineError, EngineResult};
pub use grid_builder::GridBuilder;
pub use orchestrator::{RotationOrchestrator, RotationOutcome};
pub use pin_resolver::{PinResolution, PinResolver, TrainingPair};
pub use priority_filler::PriorityFiller;
pub use quality::{PhaseQuality, QualityEvaluator, QualityReport};
pub use ranking::WorkerRanker;
pub use rotation_counter::RotationCounterTracker;
