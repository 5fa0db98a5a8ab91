use std::sync::Arc;

use async_trait::async_trait;

use super::types::{LlmRequest, LlmResponse};
use crate::error::Result;

/// 外部生成模型服务的唯一出口
///
/// 每次 `complete` 恰好对应一次出站调用；实现方不得重试、缓存或去重。
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse>;

    fn describe(&self) -> String {
        "llm".to_string()
    }
}

pub type DynLlmClient = Arc<dyn LlmClient>;
