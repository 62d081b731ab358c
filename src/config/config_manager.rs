// ==========================================
// 工位轮岗系统 - 配置管理器
// ==========================================
// 职责: 配置加载、校验、快照
// 存储: JSON 文件（路径可由环境变量覆写）
// ==========================================

use crate::config::rotation_config::RotationConfig;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "WORKSTATION_ROTATION_CONFIG";

/// 权重之和允许误差
const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 (path={path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("配置解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("配置项无效 (key={key}): {message}")]
    InvalidValue { key: String, message: String },
}

/// 配置来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Default,
    File(PathBuf),
    Inline,
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    config: Arc<RotationConfig>,
    source: ConfigSource,
}

impl ConfigManager {
    /// 使用默认配置
    pub fn with_defaults() -> Self {
        Self {
            config: Arc::new(RotationConfig::default()),
            source: ConfigSource::Default,
        }
    }

    /// 从 JSON 字符串加载（缺省字段取默认值）
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: RotationConfig = serde_json::from_str(raw)?;
        validate(&config)?;
        Ok(Self {
            config: Arc::new(config),
            source: ConfigSource::Inline,
        })
    }

    /// 从 JSON 文件加载
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config: RotationConfig = serde_json::from_str(&raw)?;
        validate(&config)?;

        info!(path = %path.display(), "轮岗配置加载完成");

        Ok(Self {
            config: Arc::new(config),
            source: ConfigSource::File(path.to_path_buf()),
        })
    }

    /// 优先读取环境变量指定的文件, 未设置时使用默认配置
    pub fn from_env_or_default() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_path(path.trim()),
            _ => {
                warn!(env = CONFIG_PATH_ENV, "未指定配置文件, 使用默认配置");
                Ok(Self::with_defaults())
            }
        }
    }

    pub fn config(&self) -> Arc<RotationConfig> {
        self.config.clone()
    }

    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    /// 获取配置快照（JSON格式）
    ///
    /// # 用途
    /// - 生成轮岗结果时记录所用参数, 便于复现
    pub fn get_config_snapshot(&self) -> Result<String, ConfigError> {
        let source = match &self.source {
            ConfigSource::Default => "default".to_string(),
            ConfigSource::File(p) => p.display().to_string(),
            ConfigSource::Inline => "inline".to_string(),
        };
        let snapshot = json!({
            "__meta_source": source,
            "config": &*self.config,
        });
        Ok(serde_json::to_string(&snapshot)?)
    }
}

// ==========================================
// 配置校验
// ==========================================

/// 校验配置有效性
///
/// # 校验规则
/// 1. 熟练等级在 1-4 之间, 且未认证阈值不低于最低阈值
/// 2. 各权重在 [0.0, 1.0] 内, 之和接近 1.0
/// 3. 各建议阈值在 [0.0, 1.0] 内
pub fn validate(config: &RotationConfig) -> Result<(), ConfigError> {
    if !(1..=4).contains(&config.min_competency_level) {
        return Err(invalid(
            "min_competency_level",
            format!("{} 超出有效范围 [1, 4]", config.min_competency_level),
        ));
    }
    if !(1..=4).contains(&config.uncertified_min_competency_level)
        || config.uncertified_min_competency_level < config.min_competency_level
    {
        return Err(invalid(
            "uncertified_min_competency_level",
            format!(
                "{} 必须在 [{}, 4] 之间",
                config.uncertified_min_competency_level, config.min_competency_level
            ),
        ));
    }

    for (key, weight) in config.quality_weights.entries() {
        if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
            return Err(invalid(
                &format!("quality_weights.{}", key),
                format!("{} 超出有效范围 [0.0, 1.0]", weight),
            ));
        }
    }

    let sum = config.quality_weights.sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(invalid(
            "quality_weights",
            format!("权重之和 {:.4} 不等于 1.0 (允许误差 {})", sum, WEIGHT_SUM_TOLERANCE),
        ));
    }

    for (key, threshold) in config.recommendation_thresholds.entries() {
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(invalid(
                &format!("recommendation_thresholds.{}", key),
                format!("{} 超出有效范围 [0.0, 1.0]", threshold),
            ));
        }
    }

    Ok(())
}

fn invalid(key: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate(&RotationConfig::default()).is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let manager = ConfigManager::from_json_str(r#"{"forced_rotation_threshold": 3}"#).unwrap();
        let config = manager.config();

        assert_eq!(config.forced_rotation_threshold, 3);
        assert_eq!(config.min_competency_level, 2);
        assert_eq!(config.quality_weights.constraints, 0.30);
        assert_eq!(manager.source(), &ConfigSource::Inline);
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let raw = r#"{"quality_weights": {"balance": 0.5, "efficiency": 0.5, "constraints": 0.3, "availability": 0.1, "uniformity": 0.1}}"#;
        let err = ConfigManager::from_json_str(raw).err().unwrap();

        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "quality_weights"));
    }

    #[test]
    fn test_uncertified_level_below_min_rejected() {
        let raw = r#"{"min_competency_level": 3, "uncertified_min_competency_level": 2}"#;
        assert!(ConfigManager::from_json_str(raw).is_err());
    }

    #[test]
    fn test_snapshot_contains_source_and_config() {
        let snapshot = ConfigManager::with_defaults().get_config_snapshot().unwrap();
        let value: serde_json::Value = serde_json::from_str(&snapshot).unwrap();

        assert_eq!(value["__meta_source"], "default");
        assert_eq!(value["config"]["forced_rotation_threshold"], 2);
    }
}
