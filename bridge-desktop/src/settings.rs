//! Settings Store Implementation backed by a JSON file

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    settings::SettingsStore,
};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// File-backed key-value settings store.
///
/// Values are kept in memory and flushed to a single JSON document after
/// each mutation. Reads never touch the disk after the initial load.
pub struct JsonSettingsStore {
    path: Option<PathBuf>,
    values: Mutex<HashMap<String, Value>>,
}

impl JsonSettingsStore {
    /// Open (or create) a settings file at `path`.
    pub async fn open(path: PathBuf) -> Result<Self> {
        let values = match tokio::fs::read(&path).await {
            Ok(data) => serde_json::from_slice(&data).unwrap_or_else(|e| {
                warn!(path = ?path, error = %e, "Settings file unreadable, starting empty");
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };

        Ok(Self {
            path: Some(path),
            values: Mutex::new(values),
        })
    }

    /// Create a store that never persists. Intended for tests and tools.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: Mutex::new(HashMap::new()),
        }
    }

    async fn flush(&self, values: &HashMap<String, Value>) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(BridgeError::Io)?;
        }

        let data = serde_json::to_vec_pretty(values)
            .map_err(|e| BridgeError::OperationFailed(e.to_string()))?;
        tokio::fs::write(path, data).await.map_err(BridgeError::Io)?;
        debug!(path = ?path, count = values.len(), "Flushed settings");
        Ok(())
    }

    async fn set_value(&self, key: &str, value: Value) -> Result<()> {
        let mut values = self.values.lock().await;
        values.insert(key.to_string(), value);
        self.flush(&values).await
    }

    async fn get_value(&self, key: &str) -> Option<Value> {
        self.values.lock().await.get(key).cloned()
    }
}

#[async_trait]
impl SettingsStore for JsonSettingsStore {
    async fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, Value::String(value.to_string())).await
    }

    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .get_value(key)
            .await
            .and_then(|v| v.as_str().map(str::to_string)))
    }

    async fn set_bool(&self, key: &str, value: bool) -> Result<()> {
        self.set_value(key, Value::Bool(value)).await
    }

    async fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        Ok(self.get_value(key).await.and_then(|v| v.as_bool()))
    }

    async fn set_u64(&self, key: &str, value: u64) -> Result<()> {
        self.set_value(key, Value::from(value)).await
    }

    async fn get_u64(&self, key: &str) -> Result<Option<u64>> {
        Ok(self.get_value(key).await.and_then(|v| v.as_u64()))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut values = self.values.lock().await;
        values.remove(key);
        self.flush(&values).await
    }

    async fn has_key(&self, key: &str) -> Result<bool> {
        Ok(self.values.lock().await.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_round_trip() {
        let store = JsonSettingsStore::in_memory();

        store.set_bool("artwork.wifi_only", true).await.unwrap();
        store.set_u64("artwork.disk_limit_mb", 64).await.unwrap();
        store.set_string("theme", "dark").await.unwrap();

        assert_eq!(store.get_bool("artwork.wifi_only").await.unwrap(), Some(true));
        assert_eq!(store.get_u64("artwork.disk_limit_mb").await.unwrap(), Some(64));
        assert_eq!(
            store.get_string("theme").await.unwrap(),
            Some("dark".to_string())
        );
        assert!(store.has_key("theme").await.unwrap());

        store.delete("theme").await.unwrap();
        assert!(!store.has_key("theme").await.unwrap());
    }

    #[tokio::test]
    async fn test_defaults_for_missing_keys() {
        let store = JsonSettingsStore::in_memory();
        assert!(store.bool_or("artwork.download_missing", true).await);
        assert_eq!(store.u64_or("artwork.disk_limit_mb", 128).await, 128);
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let path = std::env::temp_dir().join("renderer-settings-test.json");
        let _ = tokio::fs::remove_file(&path).await;

        {
            let store = JsonSettingsStore::open(path.clone()).await.unwrap();
            store.set_bool("artwork.prefer_download", true).await.unwrap();
        }

        let store = JsonSettingsStore::open(path.clone()).await.unwrap();
        assert_eq!(
            store.get_bool("artwork.prefer_download").await.unwrap(),
            Some(true)
        );

        let _ = tokio::fs::remove_file(&path).await;
    }
}
