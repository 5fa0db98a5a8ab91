use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::env::{EnvConfig, ENV_API_KEY, ENV_BASE_URL, ENV_MODEL, ENV_PROVIDER, ENV_TEMPERATURE};
use crate::error::{CareerFlowError, Result};
use crate::llm::{ApiFormat, ModelConfig};
use crate::utils::ConfigValidator;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// 模型服务商连接配置
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    #[serde(default = "default_format", with = "format_serde")]
    pub format: ApiFormat,
    #[serde(default)]
    pub base_url: Option<String>,
    /// 支持 `${VAR}` 间接引用
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

fn default_format() -> ApiFormat {
    ApiFormat::Gemini
}

mod format_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::llm::ApiFormat;

    pub fn serialize<S: Serializer>(format: &ApiFormat, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ApiFormat, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            base_url: None,
            api_key: String::new(),
            model: None,
            temperature: None,
        }
    }
}

impl ProviderConfig {
    /// 从 `CAREERFLOW_*` 环境变量读取
    pub fn from_env() -> Result<Self> {
        let format = match EnvConfig::get_env_optional(ENV_PROVIDER) {
            Some(text) => text.parse().map_err(CareerFlowError::Config)?,
            None => default_format(),
        };
        let temperature = match EnvConfig::get_env_optional(ENV_TEMPERATURE) {
            Some(text) => Some(text.trim().parse::<f32>().map_err(|_| {
                CareerFlowError::Config(format!("{ENV_TEMPERATURE} 不是有效的数字: {text}"))
            })?),
            None => None,
        };
        let api_key = EnvConfig::get_api_key(
            &EnvConfig::get_env_optional(ENV_API_KEY).unwrap_or_default(),
            ENV_API_KEY,
        )?;

        let config = Self {
            format,
            base_url: EnvConfig::get_env_optional(ENV_BASE_URL),
            api_key,
            model: EnvConfig::get_env_optional(ENV_MODEL),
            temperature,
        };
        debug!(
            format = %config.format,
            model = %config.model_name(),
            "provider config loaded from env"
        );
        Ok(config)
    }

    /// 从 JSON 配置读取，`apiKey` 中的 `${VAR}` 会被解析
    pub fn from_json(value: &Value) -> Result<Self> {
        let mut config: Self = serde_json::from_value(value.clone())
            .map_err(|e| CareerFlowError::Config(format!("invalid provider config: {e}")))?;
        config.api_key = EnvConfig::get_api_key(&config.api_key, ENV_API_KEY)?;
        Ok(config)
    }

    pub fn base_url(&self) -> &str {
        match (&self.base_url, self.format) {
            (Some(url), _) => url,
            (None, ApiFormat::OpenAI) => OPENAI_BASE_URL,
            (None, ApiFormat::Gemini) => GEMINI_BASE_URL,
        }
    }

    pub fn model_name(&self) -> &str {
        match (&self.model, self.format) {
            (Some(model), _) => model,
            (None, ApiFormat::OpenAI) => OPENAI_DEFAULT_MODEL,
            (None, ApiFormat::Gemini) => GEMINI_DEFAULT_MODEL,
        }
    }

    /// 请求级默认参数，flow 自身的设置优先
    pub fn model_defaults(&self) -> ModelConfig {
        let defaults = ModelConfig::default().with_model(self.model_name());
        match self.temperature {
            Some(temperature) => defaults.with_temperature(temperature),
            None => defaults,
        }
    }

    pub fn validate(&self) -> Result<()> {
        ConfigValidator::validate_api_key(&self.api_key)?;
        ConfigValidator::validate_url(self.base_url())?;
        ConfigValidator::validate_model_name(self.model_name())?;
        if let Some(temperature) = self.temperature {
            ConfigValidator::validate_temperature(f64::from(temperature))?;
        }
        Ok(())
    }

    #[cfg(feature = "http-client")]
    pub fn build_client(&self) -> Result<crate::llm::DynLlmClient> {
        self.validate()?;
        let client = crate::llm::GenericHttpClient::new(
            self.base_url(),
            self.api_key.clone(),
            self.model_name(),
            self.format,
        )?;
        Ok(std::sync::Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_follow_format() {
        let config = ProviderConfig::from_json(&json!({
            "format": "openai",
            "apiKey": "sk-1234567890abcdef1234567890"
        }))
        .unwrap();
        assert_eq!(config.base_url(), OPENAI_BASE_URL);
        assert_eq!(config.model_name(), OPENAI_DEFAULT_MODEL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn out_of_range_temperature_is_rejected() {
        let config = ProviderConfig {
            api_key: "AIzaSyA-real-looking-key-0123456789".into(),
            temperature: Some(3.5),
            ..ProviderConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn explicit_model_lands_in_request_defaults() {
        let config = ProviderConfig {
            model: Some("gemini-1.5-pro".into()),
            temperature: Some(0.4),
            ..ProviderConfig::default()
        };
        let defaults = config.model_defaults();
        assert_eq!(defaults.model.as_deref(), Some("gemini-1.5-pro"));
        assert_eq!(defaults.temperature, Some(0.4));
    }
}
