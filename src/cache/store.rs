//! Key-Value Store Module
//!
//! The store contract used by the cache gate, plus the in-process backend.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::cache::{CacheEntry, CacheTtl};
use crate::error::StoreError;

// == Store Trait ==
/// Single-tier, TTL-only key-value store.
///
/// A normal miss is `Ok(None)`; only an unreachable backend is an error.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns the stored bytes if present and unexpired.
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError>;

    /// Stores `value` for `ttl`, overwriting any existing entry.
    async fn set(
        &self,
        key: &str,
        value: Bytes,
        ttl: CacheTtl,
        tags: &[String],
    ) -> Result<(), StoreError>;

    /// Removes every entry carrying any of `tags`. Returns the number removed.
    async fn invalidate_tags(&self, tags: &[String]) -> Result<usize, StoreError>;
}

// == Memory Store ==
/// In-process backend used for local runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryStore {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries.
    ///
    /// # Returns
    /// The number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    // == Length ==
    /// Returns the number of entries, expired or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        let entries = self.entries.read().await;
        // Expired entries are left for the sweeper
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone()))
    }

    async fn set(
        &self,
        key: &str,
        value: Bytes,
        ttl: CacheTtl,
        tags: &[String],
    ) -> Result<(), StoreError> {
        let entry = CacheEntry::new(value, ttl.as_secs(), tags.to_vec());
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    /// Drops every entry carrying one of `tags`.
    ///
    /// # Returns
    /// The number of live entries removed. Expired entries that match are
    /// dropped as well but not counted, since reads already miss them.
    async fn invalidate_tags(&self, tags: &[String]) -> Result<usize, StoreError> {
        let mut entries = self.entries.write().await;
        let mut purged = 0;
        entries.retain(|_, entry| {
            if !entry.has_any_tag(tags) {
                return true;
            }
            if !entry.is_expired() {
                purged += 1;
            }
            false
        });
        Ok(purged)
    }
}
