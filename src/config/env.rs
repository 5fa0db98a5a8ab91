use std::env;
use std::path::PathBuf;

use crate::error::{CareerFlowError, Result};

pub const ENV_PROVIDER: &str = "CAREERFLOW_PROVIDER";
pub const ENV_BASE_URL: &str = "CAREERFLOW_BASE_URL";
pub const ENV_API_KEY: &str = "CAREERFLOW_API_KEY";
pub const ENV_MODEL: &str = "CAREERFLOW_MODEL";
pub const ENV_TEMPERATURE: &str = "CAREERFLOW_TEMPERATURE";
pub const ENV_HOME: &str = "CAREERFLOW_HOME";
pub const ENV_DEBUG: &str = "CAREERFLOW_DEBUG";

/// 未设置 `CAREERFLOW_HOME` 时的本地数据目录
pub const DEFAULT_HOME: &str = ".careerflow";

/// 环境变量读取
pub struct EnvConfig;

impl EnvConfig {
    /// 解析 API Key
    ///
    /// `${VAR}` 形式从对应环境变量读取；
    /// 空值或 `your_` 开头的占位符回退到 `default_env_var`。
    pub fn get_api_key(api_key: &str, default_env_var: &str) -> Result<String> {
        let api_key = api_key.trim();
        if let Some(name) = api_key.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) {
            Self::get_env(name)
        } else if api_key.is_empty() || api_key.starts_with("your_") {
            Self::get_env(default_env_var)
        } else {
            Ok(api_key.to_string())
        }
    }

    pub fn get_env(key: &str) -> Result<String> {
        env::var(key).map_err(|_| {
            CareerFlowError::Config(format!(
                "环境变量 '{key}' 未设置。请在 shell 中导出或写入启动脚本。"
            ))
        })
    }

    /// 未设置或为空白时返回 None
    pub fn get_env_optional(key: &str) -> Option<String> {
        env::var(key).ok().filter(|value| !value.trim().is_empty())
    }

    pub fn is_debug_mode() -> bool {
        env::var(ENV_DEBUG).is_ok()
    }

    /// 本地数据目录（历史记录等）
    pub fn home_dir() -> PathBuf {
        Self::get_env_optional(ENV_HOME)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HOME))
    }

    pub fn history_dir() -> PathBuf {
        Self::home_dir().join("history")
    }
}
