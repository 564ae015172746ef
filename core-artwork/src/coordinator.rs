//! # Artwork Coordinator
//!
//! Front door of the artwork pipeline. Callers request artwork by
//! identity and size class and get back a handle they can await or
//! cancel. The coordinator keeps the decoded in-memory cache, coalesces
//! concurrent requests for the same key into a single fetch, and bounds
//! fetch concurrency with a semaphore so a scroll burst cannot flood the
//! providers.
//!
//! ## Request coalescing
//!
//! Each in-flight key carries a listener list. The first request spawns
//! the fetch task; later requests for the same key attach a listener and
//! share the result. Cancelling a handle detaches its listener, and the
//! fetch task itself is aborted only when the last listener leaves.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{oneshot, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::{CacheStats, MemoryCache};
use crate::config::ArtworkConfig;
use crate::decode::{decode_scaled, Artwork};
use crate::error::ArtworkError;
use crate::fetcher::ArtworkFetcher;
use crate::key::{ArtInfo, ArtworkSize};

/// Shared outcome of a coalesced fetch.
pub type FetchResult = std::result::Result<Arc<Artwork>, Arc<ArtworkError>>;

struct InFlight {
    listeners: Vec<(u64, oneshot::Sender<FetchResult>)>,
    task: Option<JoinHandle<()>>,
}

struct Inner {
    memory: MemoryCache,
    fetcher: ArtworkFetcher,
    semaphore: Arc<Semaphore>,
    inflight: Mutex<HashMap<String, InFlight>>,
    next_listener_id: AtomicU64,
}

/// Coalescing, cache-backed artwork pipeline.
#[derive(Clone)]
pub struct ArtworkCoordinator {
    inner: Arc<Inner>,
}

impl ArtworkCoordinator {
    pub fn new(fetcher: ArtworkFetcher, config: &ArtworkConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                memory: MemoryCache::new(config.memory_cache_bytes()),
                fetcher,
                semaphore: Arc::new(Semaphore::new(config.max_concurrent_fetches)),
                inflight: Mutex::new(HashMap::new()),
                next_listener_id: AtomicU64::new(1),
            }),
        }
    }

    /// Request artwork for `info` at `size`.
    ///
    /// A memory hit resolves the handle immediately. Otherwise the
    /// request joins the in-flight fetch for its cache key, spawning one
    /// if none exists.
    pub async fn request(&self, info: &ArtInfo, size: ArtworkSize) -> ArtworkHandle {
        let key = info.cache_key(size);
        let listener_id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();

        if let Some(artwork) = self.inner.memory.get(&key).await {
            debug!(key = %key, "Artwork memory hit");
            let _ = tx.send(Ok(artwork));
            return ArtworkHandle {
                key,
                listener_id,
                rx,
                inner: Arc::clone(&self.inner),
            };
        }

        let spawn_fetch = {
            let mut inflight = self.inner.inflight.lock().unwrap_or_else(|e| e.into_inner());
            match inflight.get_mut(&key) {
                Some(entry) => {
                    entry.listeners.push((listener_id, tx));
                    false
                }
                None => {
                    inflight.insert(
                        key.clone(),
                        InFlight {
                            listeners: vec![(listener_id, tx)],
                            task: None,
                        },
                    );
                    true
                }
            }
        };

        if spawn_fetch {
            let inner = Arc::clone(&self.inner);
            let info = info.clone();
            let task_key = key.clone();
            let task = tokio::spawn(async move {
                let result = Inner::fetch_and_decode(&inner, &info, size, &task_key).await;
                inner.fulfill(&task_key, result);
            });

            let mut inflight = self.inner.inflight.lock().unwrap_or_else(|e| e.into_inner());
            // The task may already have fulfilled and removed the entry.
            if let Some(entry) = inflight.get_mut(&key) {
                entry.task = Some(task);
            }
        }

        ArtworkHandle {
            key,
            listener_id,
            rx,
            inner: Arc::clone(&self.inner),
        }
    }

    /// Fetch and decode synchronously, bypassing handle bookkeeping.
    /// Convenience for callers without a cancellation story.
    pub async fn fetch(&self, info: &ArtInfo, size: ArtworkSize) -> FetchResult {
        self.request(info, size).await.wait().await
    }

    pub async fn memory_stats(&self) -> CacheStats {
        self.inner.memory.stats().await
    }

    pub async fn disk_stats(&self) -> CacheStats {
        self.inner.fetcher.disk_stats().await
    }

    /// Drop both cache tiers. In-flight fetches are unaffected.
    pub async fn clear_caches(&self) {
        self.inner.memory.clear().await;
        self.inner.fetcher.clear_disk().await;
    }
}

impl Inner {
    async fn fetch_and_decode(
        inner: &Arc<Inner>,
        info: &ArtInfo,
        size: ArtworkSize,
        key: &str,
    ) -> FetchResult {
        let _permit = inner
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| Arc::new(ArtworkError::Cancelled))?;

        let bytes = inner.fetcher.fetch(info, size).await.map_err(Arc::new)?;

        let target = size.dimension();
        let artwork = tokio::task::spawn_blocking(move || decode_scaled(&bytes, target))
            .await
            .map_err(|_| Arc::new(ArtworkError::Cancelled))?
            .map_err(Arc::new)?;

        let artwork = Arc::new(artwork);
        inner
            .memory
            .put(key.to_string(), Arc::clone(&artwork))
            .await;
        Ok(artwork)
    }

    /// Remove the in-flight entry and deliver the result to every
    /// attached listener.
    fn fulfill(&self, key: &str, result: FetchResult) {
        let entry = {
            let mut inflight = self.inflight.lock().unwrap_or_else(|e| e.into_inner());
            inflight.remove(key)
        };

        let Some(entry) = entry else {
            warn!(key = %key, "Fetch finished for a request nobody is waiting on");
            return;
        };

        for (_, tx) in entry.listeners {
            let _ = tx.send(result.clone());
        }
    }
}

/// A pending artwork request. Await it with [`ArtworkHandle::wait`] or
/// drop out early with [`ArtworkHandle::cancel`].
pub struct ArtworkHandle {
    key: String,
    listener_id: u64,
    rx: oneshot::Receiver<FetchResult>,
    inner: Arc<Inner>,
}

impl ArtworkHandle {
    /// Wait for the fetch to resolve.
    pub async fn wait(self) -> FetchResult {
        self.rx
            .await
            .unwrap_or_else(|_| Err(Arc::new(ArtworkError::Cancelled)))
    }

    /// Detach from the fetch. The underlying task is aborted only when
    /// no other listener remains.
    pub fn cancel(self) {
        let mut inflight = self.inner.inflight.lock().unwrap_or_else(|e| e.into_inner());
        let Some(entry) = inflight.get_mut(&self.key) else {
            return;
        };

        entry.listeners.retain(|(id, _)| *id != self.listener_id);
        if entry.listeners.is_empty() {
            debug!(key = %self.key, "Last listener left, aborting artwork fetch");
            if let Some(removed) = inflight.remove(&self.key) {
                if let Some(task) = removed.task {
                    task.abort();
                }
            }
        }
    }
}
