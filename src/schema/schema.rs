use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// 对象中的单个字段，按声明顺序保存
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SchemaField {
    pub name: String,
    pub schema: Schema,
}

/// Shape 类型枚举
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum SchemaKind {
    #[serde(rename = "string")]
    String {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_length: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
    },
    #[serde(rename = "number")]
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        minimum: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        maximum: Option<f64>,
    },
    #[serde(rename = "integer")]
    Integer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        minimum: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        maximum: Option<f64>,
    },
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "enum")]
    Enum { values: Vec<String> },
    #[serde(rename = "optional")]
    Optional { inner: Box<Schema> },
    #[serde(rename = "array")]
    Array { items: Box<Schema> },
    #[serde(rename = "object")]
    Object {
        fields: Vec<SchemaField>,
        #[serde(default)]
        additional: bool,
    },
    #[serde(rename = "any")]
    Any,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Schema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub kind: SchemaKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Schema {
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            name: None,
            kind,
            description: None,
        }
    }

    pub fn string() -> Self {
        Self::new(SchemaKind::String {
            min_length: None,
            max_length: None,
        })
    }

    pub fn number() -> Self {
        Self::new(SchemaKind::Number {
            minimum: None,
            maximum: None,
        })
    }

    pub fn integer() -> Self {
        Self::new(SchemaKind::Integer {
            minimum: None,
            maximum: None,
        })
    }

    pub fn boolean() -> Self {
        Self::new(SchemaKind::Boolean)
    }

    pub fn any() -> Self {
        Self::new(SchemaKind::Any)
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(SchemaKind::Enum {
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    pub fn array(items: Schema) -> Self {
        Self::new(SchemaKind::Array {
            items: Box::new(items),
        })
    }

    /// 空对象，字段通过 [`Schema::field`] 逐个追加
    pub fn object() -> Self {
        Self::new(SchemaKind::Object {
            fields: Vec::new(),
            additional: false,
        })
    }

    pub fn field(mut self, name: impl Into<String>, schema: Schema) -> Self {
        if let SchemaKind::Object { fields, .. } = &mut self.kind {
            fields.push(SchemaField {
                name: name.into(),
                schema,
            });
        }
        self
    }

    pub fn allow_additional(mut self) -> Self {
        if let SchemaKind::Object { additional, .. } = &mut self.kind {
            *additional = true;
        }
        self
    }

    /// 包装为可选字段：可以缺省，也可以是 `null`
    pub fn optional(self) -> Self {
        Self::new(SchemaKind::Optional {
            inner: Box::new(self),
        })
    }

    pub fn min_length(mut self, min: usize) -> Self {
        if let SchemaKind::String { min_length, .. } = &mut self.kind {
            *min_length = Some(min);
        }
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        if let SchemaKind::String { max_length, .. } = &mut self.kind {
            *max_length = Some(max);
        }
        self
    }

    /// 数值下界（含）；对非数值类型无效
    pub fn minimum(mut self, min: impl Into<f64>) -> Self {
        if let SchemaKind::Number { minimum, .. } | SchemaKind::Integer { minimum, .. } =
            &mut self.kind
        {
            *minimum = Some(min.into());
        }
        self
    }

    /// 数值上界（含）
    pub fn maximum(mut self, max: impl Into<f64>) -> Self {
        if let SchemaKind::Number { maximum, .. } | SchemaKind::Integer { maximum, .. } =
            &mut self.kind
        {
            *maximum = Some(max.into());
        }
        self
    }

    pub fn range(self, min: impl Into<f64>, max: impl Into<f64>) -> Self {
        self.minimum(min).maximum(max)
    }

    pub fn non_empty(self) -> Self {
        self.min_length(1)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_optional(&self) -> bool {
        matches!(self.kind, SchemaKind::Optional { .. })
    }

    pub fn fields(&self) -> &[SchemaField] {
        match &self.kind {
            SchemaKind::Object { fields, .. } => fields,
            _ => &[],
        }
    }

    /// 渲染为 JSON Schema，供支持结构化输出的模型服务使用
    pub fn to_json_schema(&self) -> Value {
        let mut out = match &self.kind {
            SchemaKind::String {
                min_length,
                max_length,
            } => {
                let mut map = Map::new();
                map.insert("type".into(), json!("string"));
                if let Some(min) = min_length {
                    map.insert("minLength".into(), json!(min));
                }
                if let Some(max) = max_length {
                    map.insert("maxLength".into(), json!(max));
                }
                map
            }
            SchemaKind::Number { minimum, maximum } => bounded("number", *minimum, *maximum),
            SchemaKind::Integer { minimum, maximum } => bounded("integer", *minimum, *maximum),
            SchemaKind::Boolean => single_type("boolean"),
            SchemaKind::Enum { values } => {
                let mut map = single_type("string");
                map.insert("enum".into(), json!(values));
                map
            }
            SchemaKind::Optional { inner } => match inner.to_json_schema() {
                Value::Object(map) => map,
                _ => Map::new(),
            },
            SchemaKind::Array { items } => {
                let mut map = single_type("array");
                map.insert("items".into(), items.to_json_schema());
                map
            }
            SchemaKind::Object { fields, additional } => {
                let mut properties = Map::new();
                let mut required = Vec::new();
                for field in fields {
                    properties.insert(field.name.clone(), field.schema.to_json_schema());
                    if !field.schema.is_optional() {
                        required.push(field.name.clone());
                    }
                }
                let mut map = single_type("object");
                map.insert("properties".into(), Value::Object(properties));
                map.insert("required".into(), json!(required));
                map.insert("additionalProperties".into(), json!(additional));
                map
            }
            SchemaKind::Any => Map::new(),
        };

        if let Some(description) = &self.description {
            out.insert("description".into(), json!(description));
        }
        Value::Object(out)
    }
}

fn single_type(name: &str) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("type".into(), json!(name));
    map
}

fn bounded(name: &str, minimum: Option<f64>, maximum: Option<f64>) -> Map<String, Value> {
    let mut map = single_type(name);
    if let Some(min) = minimum {
        map.insert("minimum".into(), json!(min));
    }
    if let Some(max) = maximum {
        map.insert("maximum".into(), json!(max));
    }
    map
}
