use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use super::client::DynLlmClient;
use super::types::{LlmRequest, ModelConfig};
use crate::error::{CareerFlowError, Result};
use crate::prompt::RenderedPrompt;
use crate::schema::{validate, Schema};

/// 模型调用适配器
///
/// 把 (prompt, 输出 Shape) 发送给模型服务，解析并校验返回值。
/// 每次调用恰好一次网络请求，不做重试。
#[derive(Clone)]
pub struct ModelInvoker {
    client: DynLlmClient,
    defaults: ModelConfig,
}

impl ModelInvoker {
    pub fn new(client: DynLlmClient) -> Self {
        Self {
            client,
            defaults: ModelConfig::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: ModelConfig) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn defaults(&self) -> &ModelConfig {
        &self.defaults
    }

    #[instrument(skip(self, prompt, output, config), fields(client = %self.client.describe()))]
    pub async fn invoke(
        &self,
        flow: &str,
        prompt: &RenderedPrompt,
        output: &Schema,
        config: &ModelConfig,
    ) -> Result<Value> {
        let config = config.or(&self.defaults);
        let request = LlmRequest {
            system: prompt.system.clone(),
            user: prompt.user.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            response_schema: Some(output.to_json_schema()),
            attachments: prompt.attachments.clone(),
            metadata: Some(json!({ "flow": flow })),
        };

        debug!(
            prompt_len = prompt.len(),
            attachments = prompt.attachments.len(),
            model = config.model.as_deref().unwrap_or("<default>"),
            "invoking model"
        );

        let response = self.client.complete(request).await.map_err(|err| {
            warn!(error = %err, retryable = err.is_retryable(), "model call failed");
            err
        })?;

        let value = parse_output(&response.content)?;
        validate(output, &value).map_err(|errors| {
            warn!(violations = errors.len(), %errors, "model output rejected");
            CareerFlowError::OutputValidation(errors)
        })?;

        Ok(value)
    }
}

/// 解析模型返回的文本为 JSON，允许外层包裹 Markdown 代码块
pub fn parse_output(text: &str) -> Result<Value> {
    let text = strip_json_fences(text);
    if text.is_empty() {
        return Err(CareerFlowError::OutputParse(
            "model returned empty content".to_string(),
        ));
    }
    serde_json::from_str(text).map_err(|err| CareerFlowError::OutputParse(err.to_string()))
}

fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .strip_suffix("```")
                .map(str::trim)
                .unwrap_or(stripped)
        }
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tagged_and_bare_fences() {
        assert_eq!(strip_json_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_json_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_json_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn empty_and_prose_outputs_are_parse_failures() {
        assert!(matches!(
            parse_output("   "),
            Err(CareerFlowError::OutputParse(_))
        ));
        assert!(matches!(
            parse_output("Sure! Here is your cover letter."),
            Err(CareerFlowError::OutputParse(_))
        ));
    }
}
