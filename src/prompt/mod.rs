//! Prompt 渲染
//!
//! 每个 flow 的模板都是一个显式的 Rust 函数 `fn(&FlowInput) -> String`，
//! 借助 [`PromptWriter`] 拼接文本；同一输入总是得到逐字节相同的结果。

mod input;
mod writer;

use serde::{Deserialize, Serialize};

pub use input::FlowInput;
pub use writer::PromptWriter;

/// 模板函数签名
pub type TemplateFn = fn(&FlowInput<'_>) -> String;

/// 渲染完成的 prompt，单次调用后即丢弃
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPrompt {
    pub system: Option<String>,
    pub user: String,
    /// 随 prompt 一起发送的 `data:` URI 附件
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
}

impl RenderedPrompt {
    pub fn new(system: Option<&str>, user: String) -> Self {
        Self {
            system: system.map(str::to_string),
            user,
            attachments: Vec::new(),
        }
    }

    pub fn with_attachments(mut self, attachments: Vec<String>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn len(&self) -> usize {
        self.system.as_deref().map(str::len).unwrap_or(0) + self.user.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 字段行末残留的空值
const EMPTY_VALUE_MARKERS: &[&str] = &[": undefined", ": null", ": None"];

/// 检查渲染结果中是否残留占位符
///
/// 只识别模板本身会留下的痕迹：行尾的空值，以及未替换的 `{{name}}`。
/// 用户正文里出现的 `undefined` 之类单词不算。
pub fn ensure_no_placeholders(text: &str) -> std::result::Result<(), Vec<&'static str>> {
    let mut found = Vec::new();
    for marker in EMPTY_VALUE_MARKERS {
        if text.lines().any(|line| line.trim_end().ends_with(marker)) {
            found.push(*marker);
        }
    }
    if has_unfilled_slot(text) {
        found.push("{{..}}");
    }
    if found.is_empty() {
        Ok(())
    } else {
        Err(found)
    }
}

fn has_unfilled_slot(text: &str) -> bool {
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        if let Some(end) = after.find("}}") {
            let name = after[..end].trim();
            if !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
            {
                return true;
            }
        }
        rest = after;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_placeholder_artifacts() {
        assert!(ensure_no_placeholders("Role: Engineer").is_ok());
        assert_eq!(
            ensure_no_placeholders("Role: undefined\nYears: {{years}}"),
            Err(vec![": undefined", "{{..}}"])
        );
    }

    #[test]
    fn user_prose_mentioning_markers_is_not_flagged() {
        let text = "Experience: fixed undefined behaviour in C parsers\n\
                    Skills: Jinja {{ }} blocks, null safety";
        assert!(ensure_no_placeholders(text).is_ok());
    }
}
