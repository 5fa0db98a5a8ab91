use std::fmt;

use serde::Serialize;

/// 单条违规的原因
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ViolationKind {
    WrongType { expected: String, found: String },
    MissingRequired,
    UnknownField,
    EnumMismatch { allowed: Vec<String>, found: String },
    TooShort { min: usize, actual: usize },
    TooLong { max: usize, actual: usize },
    OutOfRange {
        minimum: Option<f64>,
        maximum: Option<f64>,
        found: f64,
    },
    /// 附件字段不是合法的 `data:<mimetype>;base64,<payload>`
    MalformedDataUri {
        #[serde(rename = "detail")]
        reason: String,
    },
    /// 附件的 MIME 类型不在允许列表内（仅客户端表单规则产生）
    UnsupportedMediaType { allowed: Vec<String>, found: String },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongType { expected, found } => write!(f, "expected {expected}, found {found}"),
            Self::MissingRequired => write!(f, "is required"),
            Self::UnknownField => write!(f, "is not an allowed field"),
            Self::EnumMismatch { allowed, found } => {
                write!(f, "must be one of [{}], found `{found}`", allowed.join(", "))
            }
            Self::TooShort { min: 1, actual: 0 } => write!(f, "must not be empty"),
            Self::TooShort { min, actual } => {
                write!(f, "must be at least {min} characters long (got {actual})")
            }
            Self::TooLong { max, actual } => {
                write!(f, "must be at most {max} characters long (got {actual})")
            }
            Self::OutOfRange {
                minimum,
                maximum,
                found,
            } => match (minimum, maximum) {
                (Some(min), Some(max)) => {
                    write!(f, "must be between {min} and {max}, found {found}")
                }
                (Some(min), None) => write!(f, "must be at least {min}, found {found}"),
                (None, Some(max)) => write!(f, "must be at most {max}, found {found}"),
                (None, None) => write!(f, "is out of range, found {found}"),
            },
            Self::MalformedDataUri { reason } => {
                write!(f, "must be a data:<mimetype>;base64,<payload> string ({reason})")
            }
            Self::UnsupportedMediaType { allowed, found } => {
                write!(f, "must be a file of type [{}], found `{found}`", allowed.join(", "))
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldViolation {
    /// 形如 `experience[0].title` 的字段路径，根值为空串
    pub path: String,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "value {}", self.kind)
        } else {
            write!(f, "{} {}", self.path, self.kind)
        }
    }
}

/// 一次校验收集到的全部违规，按声明顺序排列
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldViolation>);

impl ValidationErrors {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self(violations)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldViolation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn for_path(&self, path: &str) -> Vec<&ViolationKind> {
        self.0
            .iter()
            .filter(|violation| violation.path == path)
            .map(|violation| &violation.kind)
            .collect()
    }

    pub fn into_inner(self) -> Vec<FieldViolation> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}
