//! Cache Gate Module
//!
//! The read-through protocol every route goes through: look the key up,
//! serve the stored bytes on a hit, otherwise let the caller fetch and hand
//! the payload back for storage.
//!
//! There is no single-flight lock. Two concurrent misses for one key both
//! fetch and both write; the last write wins.

use std::future::Future;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{CacheKey, CacheStats, CacheTtl, GateCounters, KvStore};
use crate::error::ApiError;

/// Header carrying the literal cache key, for downstream purge tooling.
pub const CACHE_TAG_HEADER: HeaderName = HeaderName::from_static("cache-tag");

// == Response Init ==
/// Status and headers the caller wants on the outgoing response.
///
/// Applied verbatim on both hit and miss.
#[derive(Debug, Clone)]
pub struct ResponseInit {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

impl ResponseInit {
    /// `200 OK` JSON with the standard cache headers for `key` and `ttl`.
    ///
    /// # Arguments
    /// * `key` - Sent back verbatim in the `cache-tag` header
    /// * `ttl` - Rendered into `Cache-Control`
    ///
    /// # Returns
    /// The init, or `ApiError::Internal` if the key cannot travel as a
    /// header value. Keys escape control characters, so this only fails
    /// for a hand-built prefix.
    pub fn cacheable(key: &CacheKey, ttl: CacheTtl) -> Result<Self, ApiError> {
        let tag = HeaderValue::from_str(key.as_str()).map_err(|_| {
            ApiError::Internal(format!("cache key {:?} is not a header value", key.as_str()))
        })?;
        let cache_control = HeaderValue::from_str(&ttl.cache_control())
            .map_err(|_| ApiError::Internal("invalid Cache-Control value".into()))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::CACHE_CONTROL, cache_control);
        headers.insert(CACHE_TAG_HEADER, tag);

        Ok(Self {
            status: StatusCode::OK,
            headers,
        })
    }
}

// == Response Envelope ==
/// Status, headers and body of a gate response.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ResponseEnvelope {
    fn new(init: &ResponseInit, body: Bytes) -> Self {
        Self {
            status: init.status,
            headers: init.headers.clone(),
            body,
        }
    }

    /// Header value as a string, if present and visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

// == Cache Gate ==
/// Check-then-fetch-then-store over a shared [`KvStore`].
#[derive(Clone)]
pub struct CacheGate {
    store: Arc<dyn KvStore>,
    counters: Arc<GateCounters>,
}

impl CacheGate {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            counters: Arc::new(GateCounters::new()),
        }
    }

    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }

    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot()
    }

    // == Check Key ==
    /// Looks `key` up in the store.
    ///
    /// # Arguments
    /// * `key` - Derived cache key
    /// * `init` - Status and headers applied to a hit
    ///
    /// # Returns
    /// The stored payload wrapped with `init`, or `None` on a miss. A store
    /// failure is logged, counted and read as a miss.
    pub async fn check_key(&self, key: &CacheKey, init: &ResponseInit) -> Option<ResponseEnvelope> {
        match self.store.get(key.as_str()).await {
            Ok(Some(bytes)) => {
                debug!(key = %key, "cache hit");
                self.counters.record_hit();
                Some(ResponseEnvelope::new(init, bytes))
            }
            Ok(None) => {
                debug!(key = %key, "cache miss");
                self.counters.record_miss();
                None
            }
            Err(err) => {
                warn!(key = %key, error = %err, "store read failed, treating as miss");
                self.counters.record_store_error();
                self.counters.record_miss();
                None
            }
        }
    }

    // == Set Key ==
    /// Stores `payload` for `ttl` and returns it wrapped with `init`.
    ///
    /// # Arguments
    /// * `key` - Derived cache key; the entry is tagged with it and its prefix
    /// * `payload` - Serialized JSON body
    /// * `ttl` - Lifetime of the stored entry
    /// * `init` - Status and headers of the outgoing response
    ///
    /// # Returns
    /// The fresh response. The write is best-effort: a store failure is
    /// logged and does not change what the caller gets back.
    pub async fn set_key(
        &self,
        key: &CacheKey,
        payload: impl Into<Bytes>,
        ttl: CacheTtl,
        init: &ResponseInit,
    ) -> ResponseEnvelope {
        let payload = payload.into();

        match self
            .store
            .set(key.as_str(), payload.clone(), ttl, &key.tags())
            .await
        {
            Ok(()) => {
                debug!(key = %key, ttl = ttl.as_secs(), "cache write");
                self.counters.record_write();
            }
            Err(err) => {
                warn!(key = %key, error = %err, "store write failed, serving uncached");
                self.counters.record_store_error();
            }
        }

        ResponseEnvelope::new(init, payload)
    }

    // == Read Through ==
    /// Serves `key` from the store, or runs `fetch`, stores its JSON and
    /// serves that. Fetch errors are returned untouched and never cached.
    pub async fn read_through<T, E, F, Fut>(
        &self,
        key: &CacheKey,
        ttl: CacheTtl,
        fetch: F,
    ) -> Result<ResponseEnvelope, ApiError>
    where
        T: Serialize,
        E: Into<ApiError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let init = ResponseInit::cacheable(key, ttl)?;
        if let Some(hit) = self.check_key(key, &init).await {
            return Ok(hit);
        }

        let payload = fetch().await.map_err(Into::into)?;
        let body = serde_json::to_vec(&payload)?;
        Ok(self.set_key(key, body, ttl, &init).await)
    }
}
