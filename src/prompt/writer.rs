/// 逐行构建 prompt 文本
///
/// 可选字段缺省时整行省略，不会留下占位符。
#[derive(Debug, Default)]
pub struct PromptWriter {
    buf: String,
}

impl PromptWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.buf.push_str(text.as_ref());
        self.buf.push('\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        if !self.buf.is_empty() && !self.buf.ends_with("\n\n") {
            self.buf.push('\n');
        }
        self
    }

    pub fn field(&mut self, label: &str, value: impl AsRef<str>) -> &mut Self {
        self.line(format!("{label}: {}", value.as_ref()))
    }

    pub fn optional_field(&mut self, label: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.field(label, value);
        }
        self
    }

    pub fn optional_number(&mut self, label: &str, value: Option<f64>) -> &mut Self {
        if let Some(value) = value {
            self.field(label, value.to_string());
        }
        self
    }

    /// 多行文本块：标签独占一行，正文原样跟随
    pub fn block(&mut self, label: &str, text: impl AsRef<str>) -> &mut Self {
        self.line(format!("{label}:"));
        self.line(text.as_ref().trim_end())
    }

    pub fn bullets(&mut self, label: &str, items: &[&str]) -> &mut Self {
        if items.is_empty() {
            return self;
        }
        self.line(format!("{label}:"));
        for item in items {
            self.line(format!("- {item}"));
        }
        self
    }

    pub fn section_if(&mut self, condition: bool, build: impl FnOnce(&mut Self)) -> &mut Self {
        if condition {
            build(self);
        }
        self
    }

    pub fn finish(&mut self) -> String {
        std::mem::take(&mut self.buf).trim_end().to_string()
    }
}
