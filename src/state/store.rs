use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{CareerFlowError, Result};

/// 本地键值存储 trait，承载客户端持久化的文本数据
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: String) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
}

/// 内存存储实现
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.inner.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.inner.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.inner.write().remove(key);
        Ok(())
    }
}

/// 文件存储实现：每个键对应目录下的一个 `.json` 文件
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CareerFlowError::Storage(e.to_string())),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| CareerFlowError::Storage(e.to_string()))?;
        tokio::fs::write(self.path_for(key), value)
            .await
            .map_err(|e| CareerFlowError::Storage(e.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CareerFlowError::Storage(e.to_string())),
        }
    }
}

#[cfg(feature = "redis-store")]
pub mod redis_backend {
    use super::*;
    use ::redis::AsyncCommands;

    pub struct RedisStore {
        client: ::redis::Client,
    }

    impl RedisStore {
        pub fn new(client: ::redis::Client) -> Self {
            Self { client }
        }

        async fn connection(&self) -> Result<::redis::aio::MultiplexedConnection> {
            self.client
                .get_multiplexed_async_connection()
                .await
                .map_err(|e| CareerFlowError::Storage(e.to_string()))
        }
    }

    #[async_trait]
    impl KeyValueStore for RedisStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            let mut conn = self.connection().await?;
            let value: Option<String> = conn
                .get(key)
                .await
                .map_err(|e| CareerFlowError::Storage(e.to_string()))?;
            Ok(value)
        }

        async fn set(&self, key: &str, value: String) -> Result<()> {
            let mut conn = self.connection().await?;
            conn.set::<_, _, ()>(key, value)
                .await
                .map_err(|e| CareerFlowError::Storage(e.to_string()))
        }

        async fn delete(&self, key: &str) -> Result<()> {
            let mut conn = self.connection().await?;
            conn.del::<_, ()>(key)
                .await
                .map_err(|e| CareerFlowError::Storage(e.to_string()))
        }
    }
}
