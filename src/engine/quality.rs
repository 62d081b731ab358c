// ==========================================
// 工位轮岗系统 - 轮岗质量评估引擎
// ==========================================
// 红线: 纯函数, 相同网格得到相同报告
// 红线: 建议文本只做提示, 不参与评分
// ==========================================
// 职责: 均衡度/分配效率/约束满足率/总分 + 违规文本 + 建议
// 输入: 轮岗网格 + 员工 + 工位
// 输出: QualityReport (两阶段分别评估, 顶层取均值)
// ==========================================

mod core;
mod report;


pub use core::QualityEvaluator;
pub use report::{PhaseQuality, QualityReport};
