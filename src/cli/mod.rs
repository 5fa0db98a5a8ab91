use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::client::{FileAttachment, HistoryEntry, HistoryStore};
use crate::error::{CareerFlowError, Result};
use crate::flow::{FlowRegistry, FlowSpec};

/// 导出给前端或外部工具使用的 flow 描述
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaExportEntry {
    pub name: String,
    pub title: String,
    pub description: String,
    pub input: Value,
    pub output: Value,
}

impl SchemaExportEntry {
    pub fn from_spec(spec: &FlowSpec) -> Self {
        Self {
            name: spec.name().to_string(),
            title: spec.title().to_string(),
            description: spec.description().to_string(),
            input: spec.input().to_json_schema(),
            output: spec.output().to_json_schema(),
        }
    }
}

/// 按名称排序的全部导出项
pub fn schema_exports(registry: &FlowRegistry) -> Vec<SchemaExportEntry> {
    registry
        .list()
        .iter()
        .map(|spec| SchemaExportEntry::from_spec(spec))
        .collect()
}

/// 解析 `--attach field=path`
pub fn parse_attach_arg(arg: &str) -> Result<(String, PathBuf)> {
    match arg.split_once('=') {
        Some((field, path)) if !field.trim().is_empty() && !path.trim().is_empty() => {
            Ok((field.trim().to_string(), PathBuf::from(path.trim())))
        }
        _ => Err(CareerFlowError::Config(format!(
            "invalid attachment `{arg}`, expected field=path"
        ))),
    }
}

/// 读取 JSON 输入文件，并把附件编码为 data URI 写入对应字段
pub async fn load_input(path: &Path, attachments: &[(String, PathBuf)]) -> Result<Value> {
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        CareerFlowError::Config(format!("failed to read `{}`: {e}", path.display()))
    })?;
    let mut value: Value = serde_json::from_str(&text).map_err(|e| {
        CareerFlowError::Config(format!("`{}` is not valid JSON: {e}", path.display()))
    })?;

    let object = value.as_object_mut().ok_or_else(|| {
        CareerFlowError::Config(format!("`{}` must contain a JSON object", path.display()))
    })?;
    for (field, file) in attachments {
        let attachment = FileAttachment::read(file).await?;
        object.insert(field.clone(), Value::String(attachment.data_uri().to_string()));
    }
    Ok(value)
}

/// 记录一次成功的 `run`
///
/// 只有真实的模型结果才写入历史；写入失败只记日志，返回是否已保存。
pub async fn record_run(history: &HistoryStore, entry: HistoryEntry, dry_run: bool) -> bool {
    if dry_run {
        return false;
    }
    let flow = entry.flow.clone();
    match history.append(entry).await {
        Ok(_) => true,
        Err(err) => {
            warn!(flow = %flow, kind = err.kind(), error = %err, "failed to save history entry");
            false
        }
    }
}
