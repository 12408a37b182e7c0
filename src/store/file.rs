//! JSON-file key-value backend
//!
//! All series share one flat JSON object, so writes for any series go through
//! a single file lock. Files are replaced atomically via a temporary sibling.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use super::KeyValueBackend;
use crate::error::StoreError;

pub struct FileBackend {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_map(&self) -> Result<Map<String, Value>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Map::new());
        }
        match serde_json::from_slice::<Value>(&bytes)? {
            Value::Object(map) => Ok(map),
            other => Err(StoreError::Corrupt {
                key: self.path.display().to_string(),
                reason: format!("expected a JSON object, got {}", other),
            }),
        }
    }
}

#[async_trait]
impl KeyValueBackend for FileBackend {
    async fn get_values(&self, keys: &[String]) -> Result<Vec<Option<Value>>, StoreError> {
        let map = self.read_map().await?;
        Ok(keys.iter().map(|k| map.get(k).cloned()).collect())
    }

    async fn set_values(&self, entries: Vec<(String, Value)>) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut map = self.read_map().await?;
        for (key, value) in entries {
            map.insert(key, value);
        }

        let body = serde_json::to_vec_pretty(&Value::Object(map))?;
        let tmp = self.path.with_extension("json.tmp");
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
