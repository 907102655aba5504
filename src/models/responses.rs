//! Response DTOs for the proxy API
//!
//! Operational endpoints only; resource payloads are passed through as the
//! normalized upstream JSON.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Lookups served from the store
    pub hits: u64,
    /// Lookups that fell through to an upstream
    pub misses: u64,
    /// Successful store writes
    pub writes: u64,
    /// Degraded store reads and writes
    pub store_errors: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            writes: stats.writes,
            store_errors: stats.store_errors,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response body for the purge endpoint (POST /admin/purge)
#[derive(Debug, Clone, Serialize)]
pub struct PurgeResponse {
    /// Number of stored entries removed
    pub purged: usize,
    /// Tags that were purged
    pub tags: Vec<String>,
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
