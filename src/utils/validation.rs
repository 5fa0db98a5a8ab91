use crate::error::{CareerFlowError, Result};

/// 配置验证器
pub struct ConfigValidator;

impl ConfigValidator {
    /// 验证 API Key：非空且不是占位符
    pub fn validate_api_key(api_key: &str) -> Result<()> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(CareerFlowError::Config("API Key 不能为空".into()));
        }

        let placeholder = api_key.starts_with("your_")
            || api_key.starts_with("${")
            || (api_key.starts_with("sk-") && api_key.len() < 20);
        if placeholder {
            return Err(CareerFlowError::Config(
                "API Key 看起来是占位符，请提供真实的 API Key".into(),
            ));
        }

        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if url.trim().is_empty() {
            return Err(CareerFlowError::Config("URL 不能为空".into()));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(CareerFlowError::Config(format!(
                "URL 必须以 http:// 或 https:// 开头: {url}"
            )));
        }

        Ok(())
    }

    pub fn validate_model_name(model: &str) -> Result<()> {
        if model.trim().is_empty() {
            return Err(CareerFlowError::Config("模型名称不能为空".into()));
        }
        if model.contains(char::is_whitespace) {
            return Err(CareerFlowError::Config(format!(
                "模型名称不能包含空白字符: '{model}'"
            )));
        }
        Ok(())
    }

    /// 温度参数范围 0.0 ..= 2.0
    pub fn validate_temperature(temperature: f64) -> Result<()> {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(CareerFlowError::Config(format!(
                "温度参数必须在 0.0 到 2.0 之间，当前值: {temperature}"
            )));
        }
        Ok(())
    }

    /// Flow 名称：小写字母、数字与短横线
    pub fn validate_flow_name(name: &str) -> Result<()> {
        let valid = !name.is_empty()
            && name.len() <= 64
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !valid {
            return Err(CareerFlowError::Config(format!(
                "Flow 名称 '{name}' 无效，只能包含小写字母、数字和短横线（最多 64 字符）"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_api_key() {
        assert!(ConfigValidator::validate_api_key("").is_err());
        assert!(ConfigValidator::validate_api_key("your_api_key_here").is_err());
        assert!(ConfigValidator::validate_api_key("${CAREERFLOW_API_KEY}").is_err());
        assert!(ConfigValidator::validate_api_key("sk-short").is_err());
        assert!(ConfigValidator::validate_api_key("sk-1234567890abcdef1234567890").is_ok());
    }

    #[test]
    fn test_validate_url() {
        assert!(ConfigValidator::validate_url("").is_err());
        assert!(ConfigValidator::validate_url("api.openai.com").is_err());
        assert!(ConfigValidator::validate_url("https://api.openai.com/v1").is_ok());
    }

    #[test]
    fn test_validate_flow_name() {
        assert!(ConfigValidator::validate_flow_name("cover-letter").is_ok());
        assert!(ConfigValidator::validate_flow_name("Cover Letter").is_err());
        assert!(ConfigValidator::validate_flow_name("").is_err());
    }

    #[test]
    fn test_validate_temperature() {
        assert!(ConfigValidator::validate_temperature(-0.1).is_err());
        assert!(ConfigValidator::validate_temperature(0.0).is_ok());
        assert!(ConfigValidator::validate_temperature(2.0).is_ok());
        assert!(ConfigValidator::validate_temperature(2.1).is_err());
    }
}
