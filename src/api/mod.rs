// ==========================================
// 工位轮岗系统 - API 层
// ==========================================
// 职责: 调用方侧协调（会话、串行生成、乐观并发提交）
// ==========================================

pub mod error;
pub mod rotation_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use rotation_api::{GenerationReport, RotationApi, RotationPreview};
