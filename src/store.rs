use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("stored value under {key} is not valid JSON: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone)]
pub struct RedisClient {
    pub conn: MultiplexedConnection,
}

impl RedisClient {
    pub async fn new(redis_url: &str) -> redis::RedisResult<Self> {
        let client = Client::open(redis_url)?;
        let conn = client.get_multiplexed_tokio_connection().await?;
        Ok(RedisClient { conn })
    }
}

/// Строковое key-value хранилище: в памяти процесса или в Redis.
#[derive(Clone)]
pub enum Store {
    Memory(Arc<RwLock<HashMap<String, String>>>),
    Redis(RedisClient),
}

impl Store {
    pub fn memory() -> Self {
        Store::Memory(Arc::new(RwLock::new(HashMap::new())))
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Store::Memory(_) => "memory",
            Store::Redis(_) => "redis",
        }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            Store::Memory(map) => Ok(map.read().await.get(key).cloned()),
            Store::Redis(redis) => {
                let mut conn = redis.conn.clone();
                let value: Option<String> = conn.get(key).await?;
                Ok(value)
            }
        }
    }

    pub async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        match self {
            Store::Memory(map) => {
                map.write().await.insert(key.to_string(), value);
                Ok(())
            }
            Store::Redis(redis) => {
                let mut conn = redis.conn.clone();
                let _: () = conn.set(key, value).await?;
                Ok(())
            }
        }
    }

    /// Читает JSON-массив по ключу; отсутствующий ключ - пустой список.
    pub async fn get_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        match self.get(key).await? {
            Some(data) => serde_json::from_str(&data).map_err(|source| StoreError::Serialization {
                key: key.to_string(),
                source,
            }),
            None => Ok(Vec::new()),
        }
    }

    pub async fn set_list<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
        let data = serde_json::to_string(items).map_err(|source| StoreError::Serialization {
            key: key.to_string(),
            source,
        })?;
        self.set(key, data).await
    }
}
