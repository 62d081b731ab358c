// ==========================================
// 工位轮岗系统 - 配置层
// ==========================================
// 职责: 引擎参数加载与校验
// 存储: JSON 文件 / 默认值
// ==========================================

pub mod config_manager;
pub mod rotation_config;

// 重导出核心配置类型
pub use config_manager::{ConfigError, ConfigManager, ConfigSource, CONFIG_PATH_ENV};
pub use rotation_config::{
    QualityWeights, RecommendationThresholds, RotationConfig, DEFAULT_FORCED_ROTATION_THRESHOLD,
};
