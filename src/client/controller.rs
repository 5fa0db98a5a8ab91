use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::attachment::{mime_allowed, DataUri};
use super::history::{HistoryEntry, HistoryStore};
use crate::error::CareerFlowError;
use crate::flow::FlowEngine;
use crate::schema::{FieldViolation, ValidationErrors, ViolationKind};

/// 页面生命周期状态
#[derive(Clone, Debug, PartialEq)]
pub enum PageState {
    Idle,
    AwaitingInput,
    Submitting,
    Success(Value),
    /// 面向用户的提示文本，不包含技术细节
    Error(String),
}

impl PageState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }
}

/// 提交前的客户端检查，避免明显无效的输入发起网络调用
#[derive(Clone, Debug, PartialEq)]
pub enum FormRule {
    Required(String),
    AllowedMime { field: String, allowed: Vec<String> },
}

impl FormRule {
    pub fn required(field: impl Into<String>) -> Self {
        Self::Required(field.into())
    }

    pub fn allowed_mime<I, S>(field: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AllowedMime {
            field: field.into(),
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    fn check(&self, form: &Map<String, Value>) -> Option<FieldViolation> {
        match self {
            Self::Required(field) => {
                let present = match form.get(field) {
                    None | Some(Value::Null) => false,
                    Some(Value::String(text)) => !text.trim().is_empty(),
                    Some(Value::Array(items)) => !items.is_empty(),
                    Some(_) => true,
                };
                (!present).then(|| FieldViolation {
                    path: field.clone(),
                    kind: ViolationKind::MissingRequired,
                })
            }
            Self::AllowedMime { field, allowed } => {
                let text = form.get(field).and_then(Value::as_str)?;
                let found = match DataUri::parse(text) {
                    Ok(uri) => uri.mime_type().to_string(),
                    Err(_) => "unknown".to_string(),
                };
                let patterns: Vec<&str> = allowed.iter().map(String::as_str).collect();
                (!mime_allowed(&found, &patterns)).then(|| FieldViolation {
                    path: field.clone(),
                    kind: ViolationKind::UnsupportedMediaType {
                        allowed: allowed.clone(),
                        found,
                    },
                })
            }
        }
    }
}

/// 一次提交的结果
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    Success(Value),
    /// 客户端或 flow 输入校验失败，未发起或未完成模型调用
    Invalid(ValidationErrors),
    Failed { message: String, retryable: bool },
    /// 已有一次提交在进行中
    Busy,
    /// 提交期间页面被重置或卸载，结果已丢弃
    Discarded,
}

struct Inner {
    state: PageState,
    form: Map<String, Value>,
    field_errors: ValidationErrors,
    generation: u64,
    mounted: bool,
}

/// 单个页面的请求生命周期控制器，绑定一个 flow
///
/// 内部锁只在状态切换时短暂持有，从不跨越 await。
pub struct PageController {
    flow: String,
    rules: Vec<FormRule>,
    history: Option<Arc<HistoryStore>>,
    title_field: Option<String>,
    inner: Mutex<Inner>,
}

impl PageController {
    pub fn new(flow: impl Into<String>) -> Self {
        Self {
            flow: flow.into(),
            rules: Vec::new(),
            history: None,
            title_field: None,
            inner: Mutex::new(Inner {
                state: PageState::Idle,
                form: Map::new(),
                field_errors: ValidationErrors::default(),
                generation: 0,
                mounted: true,
            }),
        }
    }

    pub fn with_rule(mut self, rule: FormRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_history(mut self, history: Arc<HistoryStore>) -> Self {
        self.history = Some(history);
        self
    }

    /// 历史记录标题取自哪个表单字段；缺省时使用 flow 名称
    pub fn with_title_field(mut self, field: impl Into<String>) -> Self {
        self.title_field = Some(field.into());
        self
    }

    pub fn flow(&self) -> &str {
        &self.flow
    }

    pub fn state(&self) -> PageState {
        self.inner.lock().state.clone()
    }

    pub fn form(&self) -> Map<String, Value> {
        self.inner.lock().form.clone()
    }

    pub fn field_errors(&self) -> ValidationErrors {
        self.inner.lock().field_errors.clone()
    }

    /// 提交按钮是否可用
    pub fn can_submit(&self) -> bool {
        let inner = self.inner.lock();
        inner.mounted && !inner.state.is_submitting()
    }

    pub fn edit(&self, field: impl Into<String>, value: impl Into<Value>) {
        let mut inner = self.inner.lock();
        inner.form.insert(field.into(), value.into());
        if inner.state == PageState::Idle {
            inner.state = PageState::AwaitingInput;
        }
    }

    pub fn remove(&self, field: &str) -> Option<Value> {
        self.inner.lock().form.remove(field)
    }

    /// 附件以 data URI 文本形式进入表单
    pub fn attach(&self, field: impl Into<String>, uri: &DataUri) {
        self.edit(field, uri.to_string());
    }

    pub async fn submit(&self, engine: &FlowEngine) -> SubmitOutcome {
        let (generation, input) = {
            let mut inner = self.inner.lock();
            if !inner.mounted || inner.state.is_submitting() {
                return SubmitOutcome::Busy;
            }

            let violations: Vec<FieldViolation> =
                self.rules.iter().filter_map(|rule| rule.check(&inner.form)).collect();
            if !violations.is_empty() {
                let errors = ValidationErrors::new(violations);
                debug!(flow = %self.flow, errors = %errors, "form rejected before submit");
                inner.field_errors = errors.clone();
                inner.state = PageState::AwaitingInput;
                return SubmitOutcome::Invalid(errors);
            }

            inner.field_errors = ValidationErrors::default();
            inner.state = PageState::Submitting;
            (inner.generation, Value::Object(inner.form.clone()))
        };

        let result = engine.execute(&self.flow, input.clone()).await;

        let outcome = {
            let mut inner = self.inner.lock();
            if !inner.mounted || inner.generation != generation {
                info!(flow = %self.flow, "discarding result of a reset page");
                return SubmitOutcome::Discarded;
            }
            match result {
                Ok(output) => {
                    inner.state = PageState::Success(output.clone());
                    SubmitOutcome::Success(output)
                }
                Err(CareerFlowError::InputValidation(errors)) => {
                    inner.field_errors = errors.clone();
                    inner.state = PageState::AwaitingInput;
                    SubmitOutcome::Invalid(errors)
                }
                Err(err) => {
                    warn!(flow = %self.flow, kind = err.kind(), error = %err, "flow call failed");
                    let message = err.user_message();
                    inner.state = PageState::Error(message.clone());
                    SubmitOutcome::Failed {
                        message,
                        retryable: err.is_retryable(),
                    }
                }
            }
        };

        if let (SubmitOutcome::Success(output), Some(history)) = (&outcome, &self.history) {
            let title = self.history_title(&input);
            let entry = HistoryEntry::new(&self.flow, title, input, output.clone());
            if let Err(err) = history.append(entry).await {
                warn!(flow = %self.flow, error = %err, "failed to save history entry");
            }
        }

        outcome
    }

    /// 重新开始：清空表单与结果，进行中的调用结果将被丢弃
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.form.clear();
        inner.field_errors = ValidationErrors::default();
        inner.state = PageState::Idle;
    }

    /// 从历史记录恢复表单输入
    pub fn replay(&self, entry: &HistoryEntry) {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.form = entry.input.as_object().cloned().unwrap_or_default();
        inner.field_errors = ValidationErrors::default();
        inner.state = PageState::AwaitingInput;
    }

    /// 页面卸载后不再接受任何状态更新
    pub fn unmount(&self) {
        let mut inner = self.inner.lock();
        inner.mounted = false;
        inner.generation += 1;
    }

    fn history_title(&self, input: &Value) -> String {
        self.title_field
            .as_deref()
            .and_then(|field| input.get(field))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or(&self.flow)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn editing_moves_idle_page_to_awaiting_input() {
        let page = PageController::new("cover-letter");
        assert_eq!(page.state(), PageState::Idle);
        page.edit("jobTitle", "Engineer");
        assert_eq!(page.state(), PageState::AwaitingInput);
        assert_eq!(page.form().get("jobTitle"), Some(&json!("Engineer")));
    }

    #[test]
    fn reset_clears_form_and_returns_to_idle() {
        let page = PageController::new("cover-letter");
        page.edit("jobTitle", "Engineer");
        page.reset();
        assert!(page.form().is_empty());
        assert_eq!(page.state(), PageState::Idle);
    }

    #[test]
    fn mime_rule_reports_found_type() {
        let rule = FormRule::allowed_mime("resume", ["application/pdf", "image/*"]);
        let mut form = Map::new();
        form.insert("resume".into(), json!(DataUri::encode("image/png", b"x").to_string()));
        assert!(rule.check(&form).is_none());

        form.insert("resume".into(), json!(DataUri::encode("text/html", b"x").to_string()));
        let violation = rule.check(&form).unwrap();
        assert_eq!(violation.path, "resume");
        assert!(matches!(
            violation.kind,
            ViolationKind::UnsupportedMediaType { ref found, .. } if found == "text/html"
        ));
    }

    #[test]
    fn unmounted_page_cannot_submit() {
        let page = PageController::new("cover-letter");
        page.unmount();
        assert!(!page.can_submit());
    }
}
