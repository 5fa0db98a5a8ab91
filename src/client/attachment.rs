use std::fmt;
use std::path::Path;
use std::str::FromStr;

use base64::{engine::general_purpose, Engine as _};

use crate::error::{CareerFlowError, Result};

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";
const FALLBACK_MIME: &str = "application/octet-stream";

const EXTENSION_MIME: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("txt", "text/plain"),
    ("md", "text/markdown"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("webp", "image/webp"),
];

/// `data:<mimetype>;base64,<payload>` 形式的自描述文本
///
/// 这是系统中唯一的二进制到文本边界，
/// flow 的输入 Shape 只把它当作普通字符串。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataUri {
    mime_type: String,
    payload: String,
}

impl DataUri {
    pub fn encode(mime_type: &str, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            payload: general_purpose::STANDARD.encode(bytes),
        }
    }

    pub fn parse(text: &str) -> Result<Self> {
        let rest = text
            .strip_prefix(DATA_PREFIX)
            .ok_or_else(|| CareerFlowError::Attachment("data URI must start with `data:`".into()))?;
        let (mime_type, payload) = rest.split_once(BASE64_MARKER).ok_or_else(|| {
            CareerFlowError::Attachment("data URI must be base64 encoded".into())
        })?;
        if !is_mime_type(mime_type) {
            return Err(CareerFlowError::Attachment(format!(
                "invalid MIME type `{mime_type}` in data URI"
            )));
        }
        Ok(Self {
            mime_type: mime_type.to_string(),
            payload: payload.to_string(),
        })
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        general_purpose::STANDARD
            .decode(&self.payload)
            .map_err(|e| CareerFlowError::Attachment(format!("invalid base64 payload: {e}")))
    }

    /// 客户端文件类型检查；`image/*` 形式匹配整个大类
    pub fn ensure_allowed(&self, allowed: &[&str]) -> Result<()> {
        if mime_allowed(&self.mime_type, allowed) {
            Ok(())
        } else {
            Err(CareerFlowError::Attachment(format!(
                "Unsupported file type `{}`. Please upload one of: {}.",
                self.mime_type,
                allowed.join(", ")
            )))
        }
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{DATA_PREFIX}{}{BASE64_MARKER}{}", self.mime_type, self.payload)
    }
}

impl FromStr for DataUri {
    type Err = CareerFlowError;

    fn from_str(text: &str) -> Result<Self> {
        Self::parse(text)
    }
}

pub(crate) fn mime_allowed(mime_type: &str, allowed: &[&str]) -> bool {
    allowed.iter().any(|pattern| match pattern.strip_suffix("/*") {
        Some(major) => mime_type
            .split_once('/')
            .map(|(found, _)| found == major)
            .unwrap_or(false),
        None => *pattern == mime_type,
    })
}

fn is_mime_type(text: &str) -> bool {
    match text.split_once('/') {
        Some((major, minor)) => {
            !major.is_empty()
                && !minor.is_empty()
                && !text.contains(|c: char| c.is_whitespace() || c == ',')
        }
        None => false,
    }
}

/// 根据文件内容与扩展名推断 MIME 类型
///
/// 优先识别魔数（PDF 签名与常见图片格式），其次查扩展名表。
pub fn detect_mime(file_name: &str, bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"%PDF-") {
        return "application/pdf";
    }
    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type();
    }
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    extension
        .and_then(|ext| {
            EXTENSION_MIME
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, mime)| *mime)
        })
        .unwrap_or(FALLBACK_MIME)
}

/// 用户上传的文件，已编码为 data URI
#[derive(Clone, Debug)]
pub struct FileAttachment {
    file_name: String,
    size: usize,
    data: DataUri,
}

impl FileAttachment {
    pub fn from_bytes(file_name: impl Into<String>, bytes: &[u8]) -> Self {
        let file_name = file_name.into();
        let mime = detect_mime(&file_name, bytes);
        Self {
            size: bytes.len(),
            data: DataUri::encode(mime, bytes),
            file_name,
        }
    }

    /// 异步读取文件并编码
    pub async fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            CareerFlowError::Attachment(format!("failed to read `{}`: {e}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("attachment")
            .to_string();
        Ok(Self::from_bytes(file_name, &bytes))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn data_uri(&self) -> &DataUri {
        &self.data
    }

    pub fn into_data_uri(self) -> DataUri {
        self.data
    }
}
