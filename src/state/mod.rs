// 客户端本地存储

mod store;

#[cfg(feature = "redis-store")]
pub use store::redis_backend::RedisStore;
pub use store::{FileStore, KeyValueStore, MemoryStore};
