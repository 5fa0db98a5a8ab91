use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::registry::{default_registry, FlowRegistry};
use crate::error::{CareerFlowError, Result};
use crate::llm::{DynLlmClient, ModelInvoker};
use crate::prompt::{ensure_no_placeholders, RenderedPrompt};

/// Flow 执行入口
///
/// 每次调用是一次独立的请求/响应：校验输入、渲染 prompt、调用模型，
/// 再原样返回结果。
/// 不修改共享状态，也不在 flow 之间互相调用。
#[derive(Clone)]
pub struct FlowEngine {
    registry: Arc<FlowRegistry>,
    invoker: ModelInvoker,
}

impl FlowEngine {
    pub fn new(registry: Arc<FlowRegistry>, invoker: ModelInvoker) -> Self {
        Self { registry, invoker }
    }

    /// 使用进程级内置注册表
    pub fn with_client(client: DynLlmClient) -> Self {
        Self::new(default_registry(), ModelInvoker::new(client))
    }

    pub fn registry(&self) -> &FlowRegistry {
        &self.registry
    }

    pub fn invoker(&self) -> &ModelInvoker {
        &self.invoker
    }

    /// 校验并渲染，不发起网络调用
    pub fn render(&self, name: &str, input: &Value) -> Result<RenderedPrompt> {
        let spec = self.registry.get(name)?;
        spec.validate_input(input)?;
        Ok(spec.render(input))
    }

    #[instrument(skip(self, input))]
    pub async fn execute(&self, name: &str, input: Value) -> Result<Value> {
        let spec = self.registry.get(name)?;

        if let Err(err) = spec.validate_input(&input) {
            info!(error = %err, "flow input rejected");
            return Err(err);
        }

        let prompt = spec.render(&input);
        if let Err(markers) = ensure_no_placeholders(&prompt.user) {
            warn!(?markers, "rendered prompt contains placeholder markers");
        }
        debug!(prompt_len = prompt.len(), "prompt rendered");

        let output = self
            .invoker
            .invoke(spec.name(), &prompt, spec.output(), spec.model())
            .await?;

        info!("flow completed");
        Ok(output)
    }

    /// 类型化调用：输入按 camelCase 序列化，输出按声明的结构体反序列化
    pub async fn execute_typed<I, O>(&self, name: &str, input: &I) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let value = serde_json::to_value(input).map_err(|e| CareerFlowError::Other(e.into()))?;
        let output = self.execute(name, value).await?;
        serde_json::from_value(output).map_err(|e| CareerFlowError::OutputParse(e.to_string()))
    }
}
