use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::instrument;

use crate::client::DataUri;
use crate::error::{CareerFlowError, Result};
use crate::llm::client::LlmClient;
use crate::llm::types::{ApiFormat, LlmRequest, LlmResponse};

const MAX_LOGGED_BODY: usize = 500;

/// 通用 HTTP 模型客户端，支持 OpenAI 兼容接口与 Gemini `generateContent`
#[derive(Clone)]
pub struct GenericHttpClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    format: ApiFormat,
}

impl GenericHttpClient {
    /// 连接池复用连接；整体超时沿用 HTTP 客户端配置，不属于 flow 契约
    fn create_client() -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| CareerFlowError::Config(format!("failed to build HTTP client: {e}")))
    }

    pub fn new<S1, S2, S3>(endpoint: S1, api_key: S2, model: S3, format: ApiFormat) -> Result<Self>
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Ok(Self {
            client: Self::create_client()?,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
            format,
        })
    }

    fn full_endpoint(&self, model: &str) -> String {
        let base = self.endpoint.trim_end_matches('/');
        match self.format {
            ApiFormat::OpenAI if base.ends_with("/chat/completions") => base.to_string(),
            ApiFormat::OpenAI => format!("{base}/chat/completions"),
            ApiFormat::Gemini if base.contains(":generateContent") => base.to_string(),
            ApiFormat::Gemini => format!("{base}/models/{model}:generateContent"),
        }
    }

    fn build_body(&self, request: &LlmRequest, model: &str) -> Result<Value> {
        match self.format {
            ApiFormat::OpenAI => {
                let mut messages = Vec::new();
                if let Some(system) = &request.system {
                    messages.push(json!({ "role": "system", "content": system }));
                }
                messages.push(json!({ "role": "user", "content": openai_user_content(request)? }));

                let mut body = json!({
                    "model": model,
                    "messages": messages,
                });
                if let Some(temperature) = request.temperature {
                    body["temperature"] = json!(temperature);
                }
                if let Some(schema) = &request.response_schema {
                    body["response_format"] = json!({
                        "type": "json_schema",
                        "json_schema": {
                            "name": schema_name(request),
                            "schema": schema,
                        }
                    });
                }
                Ok(body)
            }
            ApiFormat::Gemini => {
                let mut generation = json!({ "responseMimeType": "application/json" });
                if let Some(temperature) = request.temperature {
                    generation["temperature"] = json!(temperature);
                }
                if let Some(schema) = &request.response_schema {
                    generation["responseSchema"] = strip_additional_properties(schema);
                }

                let mut body = json!({
                    "contents": [{ "role": "user", "parts": gemini_parts(request)? }],
                    "generationConfig": generation,
                });
                if let Some(system) = &request.system {
                    body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
                }
                Ok(body)
            }
        }
    }

    fn extract_content<'a>(&self, payload: &'a Value) -> Option<&'a str> {
        match self.format {
            ApiFormat::OpenAI => payload["choices"][0]["message"]["content"].as_str(),
            ApiFormat::Gemini => payload["candidates"][0]["content"]["parts"][0]["text"].as_str(),
        }
    }
}

#[async_trait]
impl LlmClient for GenericHttpClient {
    #[instrument(skip(self, request), fields(format = %self.format))]
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        let model = request.model.as_deref().unwrap_or(&self.model).to_string();
        let endpoint = self.full_endpoint(&model);
        let body = self.build_body(&request, &model)?;

        let builder = self.client.post(&endpoint).json(&body);
        let builder = match self.format {
            ApiFormat::OpenAI => builder.bearer_auth(&self.api_key),
            ApiFormat::Gemini => builder.header("x-goog-api-key", &self.api_key),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| CareerFlowError::transport(format!("HTTP request error: {e}"), true))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| {
                CareerFlowError::transport(format!("failed to read response: {e}"), true)
            })?;

        if !status.is_success() {
            return Err(CareerFlowError::transport(
                format!(
                    "request failed with status {status}: {}\nEndpoint: {endpoint}",
                    truncate(&response_text, MAX_LOGGED_BODY)
                ),
                is_retryable_status(status),
            ));
        }

        let payload: Value = serde_json::from_str(&response_text).map_err(|e| {
            CareerFlowError::OutputParse(format!(
                "response parse error: {e}\nResponse body: {}",
                truncate(&response_text, MAX_LOGGED_BODY)
            ))
        })?;

        let content = self.extract_content(&payload).ok_or_else(|| {
            CareerFlowError::OutputParse(format!(
                "missing content in {} response: {}",
                self.format,
                truncate(&payload.to_string(), MAX_LOGGED_BODY)
            ))
        })?;

        Ok(LlmResponse {
            content: content.to_string(),
            metadata: Some(payload),
        })
    }

    fn describe(&self) -> String {
        format!("{}:{}", self.format, self.model)
    }
}

/// 有附件时改用多段内容：图片走 image_url，其他文档走 file
fn openai_user_content(request: &LlmRequest) -> Result<Value> {
    if request.attachments.is_empty() {
        return Ok(json!(request.user));
    }
    let mut parts = vec![json!({ "type": "text", "text": request.user })];
    for (idx, uri) in request.attachments.iter().enumerate() {
        let data = DataUri::parse(uri)?;
        if data.mime_type().starts_with("image/") {
            parts.push(json!({ "type": "image_url", "image_url": { "url": uri } }));
        } else {
            parts.push(json!({
                "type": "file",
                "file": { "filename": format!("attachment-{}", idx + 1), "file_data": uri }
            }));
        }
    }
    Ok(json!(parts))
}

fn gemini_parts(request: &LlmRequest) -> Result<Value> {
    let mut parts = vec![json!({ "text": request.user })];
    for uri in &request.attachments {
        let data = DataUri::parse(uri)?;
        parts.push(json!({
            "inline_data": { "mime_type": data.mime_type(), "data": data.payload() }
        }));
    }
    Ok(json!(parts))
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn schema_name(request: &LlmRequest) -> String {
    request
        .metadata
        .as_ref()
        .and_then(|meta| meta["flow"].as_str())
        .map(|flow| flow.replace(|c: char| !c.is_ascii_alphanumeric(), "_"))
        .unwrap_or_else(|| "output".to_string())
}

/// Gemini 的 responseSchema 不接受 additionalProperties
fn strip_additional_properties(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| key.as_str() != "additionalProperties")
                .map(|(key, value)| (key.clone(), strip_additional_properties(value)))
                .collect(),
        ),
        Value::Array(items) => {
            Value::Array(items.iter().map(strip_additional_properties).collect())
        }
        other => other.clone(),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{head}...(truncated, {} bytes total)", text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(format: ApiFormat, endpoint: &str) -> GenericHttpClient {
        GenericHttpClient::new(endpoint, "test-key", "test-model", format).unwrap()
    }

    #[test]
    fn endpoints_are_completed_per_format() {
        let openai = client(ApiFormat::OpenAI, "https://api.example.com/v1/");
        assert_eq!(
            openai.full_endpoint("m"),
            "https://api.example.com/v1/chat/completions"
        );
        let gemini = client(
            ApiFormat::Gemini,
            "https://generativelanguage.googleapis.com/v1beta",
        );
        assert_eq!(
            gemini.full_endpoint("gemini-2.0-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn gemini_body_carries_schema_without_additional_properties() {
        let gemini = client(ApiFormat::Gemini, "https://example.com");
        let mut request = LlmRequest::new("hello");
        request.system = Some("be brief".into());
        request.temperature = Some(0.5);
        request.response_schema = Some(json!({
            "type": "object",
            "properties": {"coverLetter": {"type": "string"}},
            "additionalProperties": false
        }));

        let body = gemini.build_body(&request, "m").unwrap();
        let schema = &body["generationConfig"]["responseSchema"];
        assert!(schema.get("additionalProperties").is_none());
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be brief");
    }

    #[test]
    fn openai_body_names_schema_after_flow() {
        let openai = client(ApiFormat::OpenAI, "https://example.com");
        let mut request = LlmRequest::new("hello");
        request.response_schema = Some(json!({"type": "object"}));
        request.metadata = Some(json!({"flow": "cover-letter"}));

        let body = openai.build_body(&request, "m").unwrap();
        assert_eq!(body["response_format"]["json_schema"]["name"], "cover_letter");
        assert_eq!(body["messages"][0]["role"], "user");
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn attachments_become_content_parts() {
        let mut request = LlmRequest::new("review this");
        request.attachments = vec![
            "data:application/pdf;base64,JVBERg==".to_string(),
            "data:image/png;base64,iVBORw==".to_string(),
        ];

        let openai = openai_user_content(&request).unwrap();
        assert_eq!(openai[1]["type"], "file");
        assert_eq!(openai[2]["type"], "image_url");

        let gemini = gemini_parts(&request).unwrap();
        assert_eq!(gemini[1]["inline_data"]["mime_type"], "application/pdf");
        assert_eq!(gemini[1]["inline_data"]["data"], "JVBERg==");
    }

    #[test]
    fn malformed_attachment_fails_the_request_body() {
        let mut request = LlmRequest::new("review this");
        request.attachments = vec!["not a data uri".to_string()];

        for format in [ApiFormat::OpenAI, ApiFormat::Gemini] {
            let err = client(format, "https://example.com")
                .build_body(&request, "m")
                .unwrap_err();
            assert_eq!(err.kind(), "attachment.invalid");
        }
    }

    #[test]
    fn rate_limits_and_server_errors_are_retryable() {
        assert!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable_status(StatusCode::BAD_GATEWAY));
        assert!(!is_retryable_status(StatusCode::UNAUTHORIZED));
    }
}
