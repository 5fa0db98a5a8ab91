use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::error::{CareerFlowError, Result};
use crate::state::KeyValueStore;

pub const HISTORY_CAPACITY: usize = 50;
pub const HISTORY_KEY: &str = "careerflow.history";

/// 一次成功调用的本地记录
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub flow: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub input: Value,
    pub output: Value,
}

impl HistoryEntry {
    pub fn new(
        flow: impl Into<String>,
        title: impl Into<String>,
        input: Value,
        output: Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            flow: flow.into(),
            title: title.into(),
            created_at: Utc::now(),
            input,
            output,
        }
    }
}

/// 有界历史队列：最新在前，超出容量时淘汰最旧的记录
///
/// 每个操作是一次完整的读-改-写，同一实例内的写操作串行执行。
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
    capacity: usize,
    write_lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key: HISTORY_KEY.to_string(),
            capacity: HISTORY_CAPACITY,
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    async fn load(&self) -> Result<Vec<HistoryEntry>> {
        match self.store.get(&self.key).await? {
            Some(text) if !text.trim().is_empty() => serde_json::from_str(&text)
                .map_err(|e| CareerFlowError::History(format!("corrupted history: {e}"))),
            _ => Ok(Vec::new()),
        }
    }

    async fn save(&self, entries: &[HistoryEntry]) -> Result<()> {
        let text = serde_json::to_string(entries)
            .map_err(|e| CareerFlowError::History(e.to_string()))?;
        self.store.set(&self.key, text).await
    }

    /// 追加到队首，返回被淘汰的记录（如有）
    pub async fn append(&self, entry: HistoryEntry) -> Result<Vec<HistoryEntry>> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(0, entry);
        let evicted = if entries.len() > self.capacity {
            entries.split_off(self.capacity)
        } else {
            Vec::new()
        };
        self.save(&entries).await?;
        if !evicted.is_empty() {
            debug!(evicted = evicted.len(), "history capacity reached");
        }
        Ok(evicted)
    }

    pub async fn list(&self) -> Result<Vec<HistoryEntry>> {
        self.load().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<HistoryEntry>> {
        Ok(self.load().await?.into_iter().find(|entry| entry.id == id))
    }

    pub async fn remove(&self, id: Uuid) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        self.save(&entries).await?;
        Ok(true)
    }

    pub async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.store.delete(&self.key).await
    }

    pub async fn len(&self) -> Result<usize> {
        Ok(self.load().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn corrupted_history_is_reported() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(HISTORY_KEY, "not json".to_string())
            .await
            .unwrap();
        let history = HistoryStore::new(store);
        assert!(matches!(
            history.list().await,
            Err(CareerFlowError::History(_))
        ));
    }

    #[tokio::test]
    async fn entries_serialize_in_camel_case() {
        let entry = HistoryEntry::new("cover-letter", "Cover letter", json!({}), json!({}));
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("createdAt").is_some());
        assert_eq!(value["flow"], "cover-letter");
    }
}
