//! In-memory key-value backend, for tests and ephemeral runs

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::KeyValueBackend;
use crate::error::StoreError;

#[derive(Default)]
pub struct MemoryBackend {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored value, for inspecting the persisted layout
    pub async fn raw(&self, key: &str) -> Option<Value> {
        self.values.read().await.get(key).cloned()
    }
}

#[async_trait]
impl KeyValueBackend for MemoryBackend {
    async fn get_values(&self, keys: &[String]) -> Result<Vec<Option<Value>>, StoreError> {
        let values = self.values.read().await;
        Ok(keys.iter().map(|k| values.get(k).cloned()).collect())
    }

    async fn set_values(&self, entries: Vec<(String, Value)>) -> Result<(), StoreError> {
        let mut values = self.values.write().await;
        values.extend(entries);
        Ok(())
    }
}
