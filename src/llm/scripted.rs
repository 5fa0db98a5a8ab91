use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use super::client::LlmClient;
use super::types::{LlmRequest, LlmResponse};
use crate::error::{CareerFlowError, Result};

#[derive(Clone, Debug)]
enum ScriptedReply {
    Content(String),
    Failure { message: String, retryable: bool },
}

/// 按顺序返回预设响应的本地客户端，同时记录收到的全部请求
///
/// 用于测试（作为调用侧的 spy）以及 CLI 的 `--dry-run`。
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(self, content: impl Into<String>) -> Self {
        self.push_content(content);
        self
    }

    pub fn with_json(self, value: Value) -> Self {
        self.push_content(value.to_string());
        self
    }

    pub fn with_failure(self, message: impl Into<String>, retryable: bool) -> Self {
        self.replies.lock().push_back(ScriptedReply::Failure {
            message: message.into(),
            retryable,
        });
        self
    }

    pub fn push_content(&self, content: impl Into<String>) {
        self.replies
            .lock()
            .push_back(ScriptedReply::Content(content.into()));
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        self.requests.lock().push(request);
        match self.replies.lock().pop_front() {
            Some(ScriptedReply::Content(content)) => Ok(LlmResponse {
                content,
                metadata: None,
            }),
            Some(ScriptedReply::Failure { message, retryable }) => {
                Err(CareerFlowError::transport(message, retryable))
            }
            None => Err(CareerFlowError::transport(
                "scripted client has no reply left",
                false,
            )),
        }
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}
