// ABOUTME: Resolution cache facade over a pluggable key-value store
// ABOUTME: Key normalization, source-dependent TTLs, detached hit counting, batched variants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

//! # Resolution Cache
//!
//! Keyed store of previously resolved nutrient vectors. The cache is never on
//! the critical path for correctness: every read or write error is logged and
//! degraded to a miss or a no-op, and the hit-count increment runs as a
//! detached task that cannot affect the read path's result.
//!
//! Keys are the normalized food name, suffixed with the rounded serving mass
//! when that mass differs from 100 g by more than 10 g, so "chicken breast"
//! at 100 g and at 250 g are distinct entries.

/// In-memory key-value store implementation
pub mod memory;

use crate::config::CacheConfig;
use crate::errors::AppResult;
use crate::models::resolution::ResolutionResult;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A cached resolution with its lifecycle bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedEntry {
    /// The resolved nutrition this entry stores
    pub result: ResolutionResult,
    /// Original query string the entry was resolved from
    pub query: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Expiry time; an entry read past this is treated as absent and purged
    pub expires_at: DateTime<Utc>,
    /// Best-effort hit counter
    pub hit_count: u64,
}

impl CachedEntry {
    /// Whether the entry has expired at `now`
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Persistent key-value store interface the cache is implemented over
///
/// The engine ships an in-memory implementation; the embedding service can
/// substitute a durable one. Per-key operations are independent: there are no
/// cross-key transactions and no ordering guarantee between a hit-count
/// increment and a subsequent read.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch an entry; expiry is the caller's concern
    async fn get(&self, key: &str) -> AppResult<Option<CachedEntry>>;

    /// Store an entry, replacing any previous value
    async fn set(&self, key: &str, entry: CachedEntry) -> AppResult<()>;

    /// Remove an entry if present
    async fn remove(&self, key: &str) -> AppResult<()>;

    /// Increment an entry's hit counter (best-effort, eventually consistent)
    async fn increment_hits(&self, key: &str) -> AppResult<()>;

    /// Remove all expired entries, returning how many were dropped
    async fn purge_expired(&self) -> AppResult<u64>;

    /// Current number of stored entries
    async fn len(&self) -> AppResult<usize>;
}

/// Normalize a food name into its cache-key form: lower-cased, punctuation
/// stripped, whitespace collapsed.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the full cache key for a name/mass pair
#[must_use]
pub fn cache_key(name: &str, serving_mass_g: f64) -> String {
    let normalized = normalize_name(name);
    if (serving_mass_g - 100.0).abs() > 10.0 {
        format!("{normalized}::{}g", serving_mass_g.round() as i64)
    } else {
        normalized
    }
}

/// Cache of resolved nutrient vectors with source-dependent TTLs
#[derive(Clone)]
pub struct ResolutionCache {
    store: Arc<dyn CacheStore>,
    config: CacheConfig,
}

impl ResolutionCache {
    /// Create a cache over the given store
    pub fn new(store: Arc<dyn CacheStore>, config: CacheConfig) -> Self {
        Self { store, config }
    }

    /// TTL for a result, chosen by source reliability
    fn ttl_for(&self, result: &ResolutionResult) -> ChronoDuration {
        let secs = if result.source.is_database_backed() {
            self.config.database_ttl_secs
        } else {
            self.config.fallback_ttl_secs
        };
        ChronoDuration::seconds(secs as i64)
    }

    /// Look up a previously resolved food.
    ///
    /// Returns `None` on a miss, on an expired entry (which is scheduled for
    /// deletion), or on a store error (logged, treated as a miss). On a hit
    /// the hit counter is incremented in a detached task; the increment never
    /// blocks or fails the read.
    pub async fn get(&self, name: &str, serving_mass_g: f64) -> Option<CachedEntry> {
        let key = cache_key(name, serving_mass_g);
        let entry = match self.store.get(&key).await {
            Ok(entry) => entry?,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cache read failed, treating as miss");
                return None;
            }
        };

        if entry.is_expired(Utc::now()) {
            let store = Arc::clone(&self.store);
            tokio::spawn(async move {
                if let Err(e) = store.remove(&key).await {
                    tracing::warn!(key = %key, error = %e, "expired entry purge failed");
                }
            });
            return None;
        }

        let store = Arc::clone(&self.store);
        let hit_key = key.clone();
        tokio::spawn(async move {
            if let Err(e) = store.increment_hits(&hit_key).await {
                tracing::debug!(key = %hit_key, error = %e, "hit-count increment failed");
            }
        });

        Some(entry)
    }

    /// Store a resolved result under its normalized key.
    ///
    /// Results below the cacheable-confidence floor are skipped. Write errors
    /// are logged and swallowed; caching is never required for correctness.
    pub async fn set(&self, name: &str, result: &ResolutionResult) {
        if !result.is_cacheable() {
            tracing::debug!(
                food = %name,
                confidence = result.confidence,
                "skipping cache write below confidence floor"
            );
            return;
        }

        let key = cache_key(name, result.serving_mass_g);
        let now = Utc::now();
        let entry = CachedEntry {
            result: result.clone(),
            query: name.to_owned(),
            created_at: now,
            expires_at: now + self.ttl_for(result),
            hit_count: 0,
        };

        if let Err(e) = self.store.set(&key, entry).await {
            tracing::warn!(key = %key, error = %e, "cache write failed, continuing without");
        }
    }

    /// Batched lookup; the returned vector is aligned with `requests`.
    ///
    /// One key erroring never fails the batch: that slot is simply a miss.
    pub async fn get_batch(&self, requests: &[(String, f64)]) -> Vec<Option<CachedEntry>> {
        let mut results = Vec::with_capacity(requests.len());
        for (name, mass) in requests {
            results.push(self.get(name, *mass).await);
        }
        results
    }

    /// Batched write of newly resolved results (errors logged per key)
    pub async fn set_batch(&self, items: &[(String, ResolutionResult)]) {
        for (name, result) in items {
            self.set(name, result).await;
        }
    }

    /// Number of entries currently stored (0 when the store errors)
    pub async fn len(&self) -> usize {
        self.store.len().await.unwrap_or(0)
    }
}
