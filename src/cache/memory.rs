// ABOUTME: In-memory cache store with LRU eviction and TTL-based expiry sweep
// ABOUTME: Optional background cleanup task with shutdown signalling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

use super::{CacheStore, CachedEntry};
use crate::config::CacheConfig;
use crate::errors::AppResult;
use async_trait::async_trait;
use chrono::Utc;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// In-memory store with LRU eviction and background cleanup
///
/// Uses `Arc<RwLock<LruCache>>` for shared state between store operations and
/// the background cleanup task. `LruCache` provides O(1) eviction of the
/// least-recently-used entry once `max_entries` is reached.
pub struct InMemoryStore {
    entries: Arc<RwLock<LruCache<String, CachedEntry>>>,
    shutdown_tx: Option<tokio::sync::mpsc::Sender<()>>,
}

impl InMemoryStore {
    /// Fallback capacity when config specifies zero entries
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(10_000) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// Create a new store, spawning the cleanup task when enabled
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_entries).unwrap_or(Self::DEFAULT_CAPACITY);
        let entries = Arc::new(RwLock::new(LruCache::new(capacity)));

        let shutdown_tx = if config.enable_background_cleanup {
            let (shutdown_tx, mut shutdown_rx) = tokio::sync::mpsc::channel::<()>(1);
            let entries_clone = Arc::clone(&entries);
            let cleanup_interval = Duration::from_secs(config.cleanup_interval_secs.max(1));

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(cleanup_interval);
                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            Self::sweep_expired(&entries_clone).await;
                        }
                        _ = shutdown_rx.recv() => {
                            tracing::debug!("cache cleanup task received shutdown signal");
                            break;
                        }
                    }
                }
            });

            Some(shutdown_tx)
        } else {
            None
        };

        Self {
            entries,
            shutdown_tx,
        }
    }

    /// Remove all expired entries from the store
    async fn sweep_expired(entries: &Arc<RwLock<LruCache<String, CachedEntry>>>) -> u64 {
        let now = Utc::now();
        let mut guard = entries.write().await;

        // Collect first: the cache cannot be mutated while iterating
        let expired_keys: Vec<String> = guard
            .iter()
            .filter_map(|(k, v)| v.is_expired(now).then(|| k.clone()))
            .collect();

        for key in &expired_keys {
            guard.pop(key);
        }

        let removed = expired_keys.len() as u64;
        drop(guard);
        if removed > 0 {
            tracing::debug!(removed, "swept expired cache entries");
        }
        removed
    }
}

#[async_trait]
impl CacheStore for InMemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<CachedEntry>> {
        // LruCache::get is mutable (updates access order), so take a write lock
        let mut entries = self.entries.write().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, entry: CachedEntry) -> AppResult<()> {
        self.entries.write().await.push(key.to_owned(), entry);
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.write().await.pop(key);
        Ok(())
    }

    async fn increment_hits(&self, key: &str) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get_mut(key) {
            entry.hit_count = entry.hit_count.saturating_add(1);
        }
        Ok(())
    }

    async fn purge_expired(&self) -> AppResult<u64> {
        Ok(Self::sweep_expired(&self.entries).await)
    }

    async fn len(&self) -> AppResult<usize> {
        Ok(self.entries.read().await.len())
    }
}

impl Drop for InMemoryStore {
    fn drop(&mut self) {
        // The store is not Clone; sharing goes through Arc<dyn CacheStore>,
        // so dropping the single owner is the moment to stop the sweep.
        if let Some(tx) = &self.shutdown_tx {
            if let Err(e) = tx.try_send(()) {
                tracing::debug!(error = ?e, "cache shutdown signal send failed (channel likely closed)");
            }
        }
    }
}
