use serde_json::Value;

/// 已通过输入 Shape 校验的值的只读视图
///
/// 模板函数只通过它读取字段，缺省与空白字符串统一视为“不存在”。
#[derive(Clone, Copy, Debug)]
pub struct FlowInput<'a> {
    value: &'a Value,
}

impl<'a> FlowInput<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    pub fn raw(&self) -> &'a Value {
        self.value
    }

    /// 必填字符串字段；校验后必然存在，缺失时返回空串
    pub fn text(&self, field: &str) -> &'a str {
        self.value
            .get(field)
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or("")
    }

    pub fn optional_text(&self, field: &str) -> Option<&'a str> {
        self.value
            .get(field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.value.get(field).and_then(Value::as_f64)
    }

    pub fn flag(&self, field: &str) -> bool {
        self.value
            .get(field)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// 字符串数组，跳过空白项
    pub fn list(&self, field: &str) -> Vec<&'a str> {
        self.items(field)
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .collect()
    }

    pub fn items(&self, field: &str) -> &'a [Value] {
        self.value
            .get(field)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn nested(&self, field: &str) -> Option<FlowInput<'a>> {
        self.value
            .get(field)
            .filter(|value| value.is_object())
            .map(FlowInput::new)
    }
}
