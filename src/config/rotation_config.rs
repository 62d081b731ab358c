// ==========================================
// 工位轮岗系统 - 引擎配置项
// ==========================================
// 职责: 定义轮岗引擎与质量评估的全部可调参数
// 红线: 每一项都必须有默认值, 缺省配置即可运行
// ==========================================

use crate::domain::capability::{
    DEFAULT_MIN_COMPETENCY_LEVEL, DEFAULT_UNCERTIFIED_MIN_COMPETENCY_LEVEL,
};
use serde::{Deserialize, Serialize};

/// 默认强制轮换阈值（同一工位连续轮次数）
pub const DEFAULT_FORCED_ROTATION_THRESHOLD: u32 = 2;

// ==========================================
// RotationConfig - 引擎配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// 强制轮换阈值: rotations_in_current_station ≥ 此值时优先调岗
    pub forced_rotation_threshold: u32,

    /// 最低熟练等级
    pub min_competency_level: u8,

    /// 未认证时的最低熟练等级
    pub uncertified_min_competency_level: u8,

    /// 质量总分权重
    pub quality_weights: QualityWeights,

    /// 建议生成阈值
    pub recommendation_thresholds: RecommendationThresholds,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            forced_rotation_threshold: DEFAULT_FORCED_ROTATION_THRESHOLD,
            min_competency_level: DEFAULT_MIN_COMPETENCY_LEVEL,
            uncertified_min_competency_level: DEFAULT_UNCERTIFIED_MIN_COMPETENCY_LEVEL,
            quality_weights: QualityWeights::default(),
            recommendation_thresholds: RecommendationThresholds::default(),
        }
    }
}

// ==========================================
// QualityWeights - 质量总分权重
// ==========================================
// 约束: 各项之和为 1.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityWeights {
    pub balance: f64,
    pub efficiency: f64,
    pub constraints: f64,
    pub availability: f64,
    pub uniformity: f64,
}

impl QualityWeights {
    pub fn sum(&self) -> f64 {
        self.balance + self.efficiency + self.constraints + self.availability + self.uniformity
    }

    pub(crate) fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("balance", self.balance),
            ("efficiency", self.efficiency),
            ("constraints", self.constraints),
            ("availability", self.availability),
            ("uniformity", self.uniformity),
        ]
    }
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            balance: 0.25,
            efficiency: 0.25,
            constraints: 0.30,
            availability: 0.10,
            uniformity: 0.10,
        }
    }
}

// ==========================================
// RecommendationThresholds - 建议阈值
// ==========================================
// 仅影响提示文本, 不影响评分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationThresholds {
    pub balance_index: f64,
    pub worker_utilization: f64,
    pub leadership_coverage: f64,
    pub training_coverage: f64,
    pub constraint_satisfaction: f64,
}

impl RecommendationThresholds {
    pub(crate) fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("balance_index", self.balance_index),
            ("worker_utilization", self.worker_utilization),
            ("leadership_coverage", self.leadership_coverage),
            ("training_coverage", self.training_coverage),
            ("constraint_satisfaction", self.constraint_satisfaction),
        ]
    }
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            balance_index: 0.7,
            worker_utilization: 0.8,
            leadership_coverage: 1.0,
            training_coverage: 1.0,
            constraint_satisfaction: 1.0,
        }
    }
}
