//! In-memory LRU of decoded bitmaps, accounted in bytes rather than
//! entries so one oversized cover cannot silently dominate the budget.

use lru::LruCache;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::CacheStats;
use crate::decode::Artwork;

struct MemoryState {
    cache: LruCache<String, Arc<Artwork>>,
    bytes: usize,
}

/// Byte-bounded LRU cache of decoded artwork.
pub struct MemoryCache {
    state: RwLock<MemoryState>,
    max_bytes: usize,
}

impl MemoryCache {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            // Entry count is unbounded; bytes are the real limit.
            state: RwLock::new(MemoryState {
                cache: LruCache::unbounded(),
                bytes: 0,
            }),
            max_bytes,
        }
    }

    /// Look up a decoded bitmap, refreshing its recency.
    pub async fn get(&self, key: &str) -> Option<Arc<Artwork>> {
        let mut state = self.state.write().await;
        state.cache.get(key).cloned()
    }

    /// Insert a decoded bitmap, evicting least-recently-used entries
    /// until the byte budget holds.
    pub async fn put(&self, key: String, artwork: Arc<Artwork>) {
        let size = artwork.byte_size();
        if size > self.max_bytes {
            debug!(key = %key, size, "Artwork larger than memory budget, not caching");
            return;
        }

        let mut state = self.state.write().await;

        if let Some(old) = state.cache.pop(&key) {
            state.bytes -= old.byte_size();
        }

        while state.bytes + size > self.max_bytes {
            match state.cache.pop_lru() {
                Some((_, evicted)) => {
                    state.bytes -= evicted.byte_size();
                    debug!(size = evicted.byte_size(), "Evicted artwork from memory cache");
                }
                None => break,
            }
        }

        state.bytes += size;
        state.cache.put(key, artwork);
    }

    pub async fn stats(&self) -> CacheStats {
        let state = self.state.read().await;
        CacheStats {
            entries: state.cache.len(),
            bytes: state.bytes as u64,
        }
    }

    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.cache.clear();
        state.bytes = 0;
    }
}
