use crate::domain::types::Phase;
use serde::{Deserialize, Serialize};

// ==========================================
// PhaseQuality - 单阶段质量指标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseQuality {
    pub phase: Phase,

    /// 工位均衡度 (0.0 - 1.0)
    pub balance_index: f64,

    // ===== 分配效率分项 =====
    pub worker_utilization: f64,
    pub capacity_utilization: f64,
    pub leadership_coverage: f64,
    pub training_coverage: f64,

    /// 分配效率 = 四个分项的均值
    pub assignment_efficiency: f64,

    /// 约束满足率 (无约束时为 1.0)
    pub constraint_satisfaction: f64,
    pub constraints_total: u32,
    pub constraints_satisfied: u32,

    /// 已分配员工的平均可用率
    pub average_availability: f64,

    /// 分布均匀度 = 1 / (1 + 各工位人数标准差)
    pub distribution_uniformity: f64,

    pub overall_score: f64,

    /// 未满足约束的说明
    pub violations: Vec<String>,
}

// ==========================================
// QualityReport - 轮岗质量报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub session_id: String,

    pub current: PhaseQuality,
    pub next: PhaseQuality,

    // ===== 两阶段均值 =====
    pub balance_index: f64,
    pub assignment_efficiency: f64,
    pub constraint_satisfaction: f64,
    pub average_availability: f64,
    pub distribution_uniformity: f64,
    pub overall_score: f64,

    /// 两阶段违规文本（CURRENT 在前）
    pub violations: Vec<String>,

    /// 调整建议
    pub recommendations: Vec<String>,
}

impl QualityReport {
    pub fn phase(&self, phase: Phase) -> &PhaseQuality {
        match phase {
            Phase::Current => &self.current,
            Phase::Next => &self.next,
        }
    }

    pub fn is_fully_satisfied(&self) -> bool {
        self.violations.is_empty()
    }
}
