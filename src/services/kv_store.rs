// src/services/kv_store.rs
use crate::errors::VisionRankError;
use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use std::collections::HashMap;
use tokio::sync::Mutex;

pub const PROFILES_KEY: &str = "vision_rank_profiles_v3";
pub const ADMIN_STATUS_KEY: &str = "vision_rank_admin_status";

/// Persistent string key-value storage backing the profile collection and the
/// curator flag.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, VisionRankError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), VisionRankError>;
}

pub struct RedisStore {
    client: Client,
}

impl RedisStore {
    pub async fn new(redis_url: &str) -> Result<Self, VisionRankError> {
        let client = Client::open(redis_url)?;

        // Test connection
        let mut conn = client.get_async_connection().await?;
        redis::cmd("PING").query_async::<_, String>(&mut conn).await?;

        Ok(Self { client })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, VisionRankError> {
        let mut conn = self.client.get_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), VisionRankError> {
        let mut conn = self.client.get_async_connection().await?;
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }
}

/// Process-local store. State lives as long as the value does.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, VisionRankError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), VisionRankError> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
