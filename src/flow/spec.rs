use std::fmt;

use serde_json::Value;

use crate::client::DataUri;
use crate::error::{CareerFlowError, Result};
use crate::llm::ModelConfig;
use crate::prompt::{FlowInput, RenderedPrompt, TemplateFn};
use crate::schema::{validate, FieldViolation, Schema, ValidationErrors, ViolationKind};

/// 单个能力的配置单元：输入 Shape、输出 Shape、prompt 模板与模型参数
///
/// 构造完成后只读，注册后随进程存活。
#[derive(Clone)]
pub struct FlowSpec {
    name: String,
    title: String,
    description: String,
    input: Schema,
    output: Schema,
    system: Option<String>,
    template: TemplateFn,
    attachment_fields: Vec<String>,
    model: ModelConfig,
}

impl FlowSpec {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        input: Schema,
        output: Schema,
        template: TemplateFn,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            description: String::new(),
            input,
            output,
            system: None,
            template,
            attachment_fields: Vec::new(),
            model: ModelConfig::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// 声明输入中承载 data URI 的字段，渲染时作为附件随 prompt 发送
    pub fn with_attachment_field(mut self, field: impl Into<String>) -> Self {
        self.attachment_fields.push(field.into());
        self
    }

    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn input(&self) -> &Schema {
        &self.input
    }

    pub fn output(&self) -> &Schema {
        &self.output
    }

    pub fn system(&self) -> Option<&str> {
        self.system.as_deref()
    }

    pub fn model(&self) -> &ModelConfig {
        &self.model
    }

    pub fn attachment_fields(&self) -> &[String] {
        &self.attachment_fields
    }

    /// 校验输入 Shape，并要求附件字段是可解码的 data URI
    pub fn validate_input(&self, value: &Value) -> Result<()> {
        let mut violations = match validate(&self.input, value) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.into_inner(),
        };
        violations.extend(self.attachment_violations(value));

        if violations.is_empty() {
            Ok(())
        } else {
            Err(CareerFlowError::InputValidation(ValidationErrors::new(violations)))
        }
    }

    fn attachment_violations(&self, value: &Value) -> Vec<FieldViolation> {
        self.attachment_fields
            .iter()
            .filter_map(|field| {
                let text = value
                    .get(field)
                    .and_then(Value::as_str)
                    .filter(|text| !text.is_empty())?;
                let reason = match DataUri::parse(text).and_then(|uri| uri.decode()) {
                    Ok(_) => return None,
                    Err(CareerFlowError::Attachment(reason)) => reason,
                    Err(other) => other.to_string(),
                };
                Some(FieldViolation {
                    path: field.clone(),
                    kind: ViolationKind::MalformedDataUri { reason },
                })
            })
            .collect()
    }

    pub fn validate_output(&self, value: &Value) -> Result<()> {
        validate(&self.output, value).map_err(CareerFlowError::OutputValidation)
    }

    /// 渲染 prompt；调用方需先完成输入校验
    pub fn render(&self, value: &Value) -> RenderedPrompt {
        let input = FlowInput::new(value);
        let attachments = self
            .attachment_fields
            .iter()
            .filter_map(|field| value.get(field).and_then(Value::as_str))
            .filter(|uri| !uri.is_empty())
            .map(str::to_string)
            .collect();
        RenderedPrompt::new(self.system(), (self.template)(&input)).with_attachments(attachments)
    }
}

impl fmt::Debug for FlowSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowSpec")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}
