//! Redis key-value backend

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use serde_json::Value;

use super::KeyValueBackend;
use crate::error::StoreError;

pub struct RedisBackend {
    conn: ConnectionManager,
}

impl RedisBackend {
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl KeyValueBackend for RedisBackend {
    async fn get_values(&self, keys: &[String]) -> Result<Vec<Option<Value>>, StoreError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.conn.clone();
        let mut cmd = redis::cmd("MGET");
        for key in keys {
            cmd.arg(key);
        }
        let raw: Vec<Option<String>> = cmd.query_async(&mut conn).await?;

        raw.into_iter()
            .zip(keys)
            .map(|(value, key)| {
                value
                    .map(|text| {
                        serde_json::from_str(&text).map_err(|e| StoreError::Corrupt {
                            key: key.clone(),
                            reason: e.to_string(),
                        })
                    })
                    .transpose()
            })
            .collect()
    }

    async fn set_values(&self, entries: Vec<(String, Value)>) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let mut pipe = redis::pipe();
        pipe.atomic();
        for (key, value) in entries {
            pipe.set(key, value.to_string()).ignore();
        }
        pipe.query_async::<()>(&mut conn).await?;
        Ok(())
    }
}
