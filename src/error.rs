use thiserror::Error;

use crate::schema::ValidationErrors;

pub type Result<T> = std::result::Result<T, CareerFlowError>;

/// Message shown to the user for any failure that is not their input's fault.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Something went wrong while generating your result. Please try again.";

#[derive(Debug, Error)]
pub enum CareerFlowError {
    #[error("invalid input: {0}")]
    InputValidation(ValidationErrors),
    #[error("provider request failed: {message}")]
    Transport { message: String, retryable: bool },
    #[error("provider returned unparseable output: {0}")]
    OutputParse(String),
    #[error("provider output does not match the expected shape: {0}")]
    OutputValidation(ValidationErrors),
    #[error("flow `{0}` not registered")]
    FlowNotRegistered(String),
    #[error("flow `{0}` already registered")]
    DuplicateFlow(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("history error: {0}")]
    History(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("attachment error: {0}")]
    Attachment(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CareerFlowError {
    pub fn transport(message: impl Into<String>, retryable: bool) -> Self {
        Self::Transport {
            message: message.into(),
            retryable,
        }
    }

    /// 是否值得由调用方重试（本库自身从不重试）
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { retryable: true, .. })
    }

    /// 稳定的错误代码，用于日志与诊断
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InputValidation(_) => "flow.input_invalid",
            Self::Transport { .. } => "provider.transport",
            Self::OutputParse(_) => "provider.output_unparseable",
            Self::OutputValidation(_) => "provider.output_invalid",
            Self::FlowNotRegistered(_) => "flow.not_registered",
            Self::DuplicateFlow(_) => "flow.duplicate",
            Self::Config(_) => "config.invalid",
            Self::History(_) => "history.failed",
            Self::Storage(_) => "storage.failed",
            Self::Attachment(_) => "attachment.invalid",
            Self::Other(_) => "internal",
        }
    }

    /// 面向用户的提示文本
    ///
    /// 输入错误逐字段说明；传输与输出错误统一为通用提示，
    /// 不暴露技术细节。
    pub fn user_message(&self) -> String {
        match self {
            Self::InputValidation(errors) => errors
                .iter()
                .map(|violation| violation.to_string())
                .collect::<Vec<_>>()
                .join("\n"),
            Self::Attachment(message) => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}
