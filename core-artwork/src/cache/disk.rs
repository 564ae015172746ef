//! Encoded-bytes disk cache with a JSON index.
//!
//! Entries are one file per key under the host cache directory; the index
//! tracks size and last access for LRU eviction. The cache is strictly an
//! accelerator: any I/O failure degrades to a miss.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use bridge_traits::fs::FileSystemAccess;

use crate::cache::CacheStats;
use crate::error::Result;

const INDEX_FILE: &str = "index.json";
const SUBDIR: &str = "artwork";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    file: String,
    size: u64,
    last_access: i64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Index {
    entries: HashMap<String, IndexEntry>,
}

impl Index {
    fn total_bytes(&self) -> u64 {
        self.entries.values().map(|e| e.size).sum()
    }
}

/// LRU disk cache of encoded artwork bytes.
pub struct DiskCache {
    fs: Arc<dyn FileSystemAccess>,
    limit_bytes: AtomicU64,
    state: Mutex<Option<DiskState>>,
}

struct DiskState {
    dir: PathBuf,
    index: Index,
}

impl DiskCache {
    pub fn new(fs: Arc<dyn FileSystemAccess>, limit_bytes: u64) -> Self {
        Self {
            fs,
            limit_bytes: AtomicU64::new(limit_bytes),
            state: Mutex::new(None),
        }
    }

    /// Replace the byte budget. Takes effect on the next store; already
    /// cached entries are evicted as new ones arrive.
    pub fn set_limit(&self, limit_bytes: u64) {
        self.limit_bytes.store(limit_bytes, Ordering::Relaxed);
    }

    fn limit_bytes(&self) -> u64 {
        self.limit_bytes.load(Ordering::Relaxed)
    }

    /// Lazily create the cache directory and load the index.
    async fn load(&self) -> Result<DiskState> {
        let dir = self.fs.cache_directory().await?.join(SUBDIR);
        self.fs.create_dir_all(&dir).await?;

        let index_path = dir.join(INDEX_FILE);
        let index = if self.fs.exists(&index_path).await.unwrap_or(false) {
            match self.fs.read_file(&index_path).await {
                Ok(data) => serde_json::from_slice(&data).unwrap_or_else(|e| {
                    warn!(error = %e, "Artwork index unreadable, starting empty");
                    Index::default()
                }),
                Err(e) => {
                    warn!(error = %e, "Failed to read artwork index, starting empty");
                    Index::default()
                }
            }
        } else {
            Index::default()
        };

        Ok(DiskState { dir, index })
    }

    async fn persist_index(&self, state: &DiskState) {
        let path = state.dir.join(INDEX_FILE);
        match serde_json::to_vec(&state.index) {
            Ok(data) => {
                if let Err(e) = self.fs.write_file(&path, Bytes::from(data)).await {
                    warn!(error = %e, "Failed to persist artwork index");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize artwork index"),
        }
    }

    /// Look up encoded bytes, refreshing the entry's access time.
    ///
    /// Never fails; any problem is a miss.
    pub async fn get(&self, key: &str) -> Option<Bytes> {
        let mut guard = self.state.lock().await;
        let state = match self.ensure_loaded(&mut guard).await {
            Some(state) => state,
            None => return None,
        };

        let path = match state.index.entries.get(key) {
            Some(entry) => state.dir.join(&entry.file),
            None => return None,
        };

        match self.fs.read_file(&path).await {
            Ok(data) => {
                if let Some(entry) = state.index.entries.get_mut(key) {
                    entry.last_access = chrono::Utc::now().timestamp();
                }
                self.persist_index(state).await;
                debug!(key = %key, size = data.len(), "Disk cache hit");
                Some(data)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Cached artwork unreadable, dropping entry");
                state.index.entries.remove(key);
                self.persist_index(state).await;
                None
            }
        }
    }

    /// Store encoded bytes, evicting least-recently-accessed entries
    /// until the budget holds. Failures are logged and swallowed.
    pub async fn put(&self, key: &str, data: Bytes) {
        if data.len() as u64 > self.limit_bytes() {
            debug!(key = %key, size = data.len(), "Artwork larger than disk budget, not caching");
            return;
        }

        let mut guard = self.state.lock().await;
        let state = match self.ensure_loaded(&mut guard).await {
            Some(state) => state,
            None => return,
        };

        let size = data.len() as u64;
        // A replaced key's old size must not count against the budget.
        state.index.entries.remove(key);
        while state.index.total_bytes() + size > self.limit_bytes() {
            let oldest = state
                .index
                .entries
                .iter()
                .min_by_key(|(_, e)| e.last_access)
                .map(|(k, e)| (k.clone(), e.file.clone()));

            match oldest {
                Some((old_key, file)) => {
                    state.index.entries.remove(&old_key);
                    let path = state.dir.join(&file);
                    if let Err(e) = self.fs.delete_file(&path).await {
                        warn!(error = %e, "Failed to delete evicted artwork file");
                    }
                    debug!(key = %old_key, "Evicted artwork from disk cache");
                }
                None => break,
            }
        }

        let file = format!("{key}.img");
        let path = state.dir.join(&file);
        if let Err(e) = self.fs.write_file(&path, data).await {
            warn!(key = %key, error = %e, "Failed to write artwork to disk cache");
            return;
        }

        state.index.entries.insert(
            key.to_string(),
            IndexEntry {
                file,
                size,
                last_access: chrono::Utc::now().timestamp(),
            },
        );
        self.persist_index(state).await;
    }

    pub async fn stats(&self) -> CacheStats {
        let mut guard = self.state.lock().await;
        match self.ensure_loaded(&mut guard).await {
            Some(state) => CacheStats {
                entries: state.index.entries.len(),
                bytes: state.index.total_bytes(),
            },
            None => CacheStats::default(),
        }
    }

    /// Delete every cached file and reset the index.
    pub async fn clear(&self) {
        let mut guard = self.state.lock().await;
        let state = match self.ensure_loaded(&mut guard).await {
            Some(state) => state,
            None => return,
        };

        for entry in state.index.entries.values() {
            let path = state.dir.join(&entry.file);
            if let Err(e) = self.fs.delete_file(&path).await {
                warn!(error = %e, "Failed to delete cached artwork file");
            }
        }
        state.index.entries.clear();
        self.persist_index(state).await;
    }

    async fn ensure_loaded<'a>(
        &self,
        guard: &'a mut Option<DiskState>,
    ) -> Option<&'a mut DiskState> {
        if guard.is_none() {
            match self.load().await {
                Ok(state) => *guard = Some(state),
                Err(e) => {
                    warn!(error = %e, "Disk artwork cache unavailable");
                    return None;
                }
            }
        }
        guard.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::fs::FileMetadata;
    use std::path::Path;
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct MemFs {
        files: StdMutex<HashMap<PathBuf, Bytes>>,
    }

    #[async_trait]
    impl FileSystemAccess for MemFs {
        async fn cache_directory(&self) -> BridgeResult<PathBuf> {
            Ok(PathBuf::from("/cache"))
        }

        async fn exists(&self, path: &Path) -> BridgeResult<bool> {
            Ok(self.files.lock().unwrap().contains_key(path))
        }

        async fn metadata(&self, path: &Path) -> BridgeResult<FileMetadata> {
            let files = self.files.lock().unwrap();
            let bytes = files
                .get(path)
                .ok_or_else(|| BridgeError::NotFound(path.display().to_string()))?;
            Ok(FileMetadata {
                size: bytes.len() as u64,
                modified_at: None,
                is_directory: false,
            })
        }

        async fn create_dir_all(&self, _path: &Path) -> BridgeResult<()> {
            Ok(())
        }

        async fn read_file(&self, path: &Path) -> BridgeResult<Bytes> {
            self.files
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| BridgeError::NotFound(path.display().to_string()))
        }

        async fn write_file(&self, path: &Path, data: Bytes) -> BridgeResult<()> {
            self.files.lock().unwrap().insert(path.to_path_buf(), data);
            Ok(())
        }

        async fn delete_file(&self, path: &Path) -> BridgeResult<()> {
            self.files.lock().unwrap().remove(path);
            Ok(())
        }

        async fn list_directory(&self, _path: &Path) -> BridgeResult<Vec<PathBuf>> {
            Ok(Vec::new())
        }
    }

    fn cache(limit: u64) -> DiskCache {
        DiskCache::new(Arc::new(MemFs::default()), limit)
    }

    fn payload(bytes: usize) -> Bytes {
        Bytes::from(vec![7u8; bytes])
    }

    #[tokio::test]
    async fn replacing_a_key_does_not_count_the_old_entry() {
        let cache = cache(1000);
        cache.put("a", payload(400)).await;
        cache.put("b", payload(400)).await;

        // 400 + 500 fits once the old "a" stops counting, so "b" stays.
        cache.put("a", payload(500)).await;

        let stats = cache.stats().await;
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.bytes, 900);
        assert!(cache.get("b").await.is_some());
        assert_eq!(cache.get("a").await.unwrap().len(), 500);
    }

    #[tokio::test]
    async fn over_budget_store_evicts_an_older_entry() {
        let cache = cache(1000);
        cache.put("a", payload(600)).await;
        cache.put("b", payload(600)).await;

        assert!(cache.get("a").await.is_none());
        assert_eq!(cache.get("b").await.unwrap().len(), 600);
        assert_eq!(cache.stats().await.entries, 1);
    }

    #[tokio::test]
    async fn lowered_limit_applies_to_new_stores() {
        let cache = cache(1000);
        cache.set_limit(100);
        cache.put("a", payload(400)).await;
        assert_eq!(cache.stats().await.entries, 0);
    }
}
