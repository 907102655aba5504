//! Cache Entry Module
//!
//! Defines the structure for entries held by the in-process store.

use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;

// == Cache Entry ==
/// Stored payload bytes with absolute expiry and purge tags.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored payload
    pub value: Bytes,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
    /// Tags this entry can be purged by
    pub tags: Vec<String>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry.
    ///
    /// # Arguments
    /// * `value` - Payload bytes to store
    /// * `ttl_seconds` - Lifetime in seconds; the expiry saturates at `u64::MAX`
    /// * `tags` - Tags the entry can be purged by
    pub fn new(value: Bytes, ttl_seconds: u64, tags: Vec<String>) -> Self {
        Self {
            value,
            expires_at: current_timestamp_ms().saturating_add(ttl_seconds.saturating_mul(1000)),
            tags,
        }
    }

    // == Is Expired ==
    /// An entry is expired once the current time reaches `expires_at`.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.expires_at
    }

    /// Returns true if any of `tags` is attached to this entry.
    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        self.tags.iter().any(|t| tags.contains(t))
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
