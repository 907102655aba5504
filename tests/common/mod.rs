//! Shared test doubles: a scriptable store and a recording upstream.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use bytes::Bytes;
use serde_json::{json, Value};
use tower::ServiceExt;

use social_proxy::api::{BearerTokens, Providers};
use social_proxy::cache::{CacheTtl, KvStore};
use social_proxy::error::{StoreError, UpstreamError};
use social_proxy::upstream::{
    IdentityDirectory, NameResolver, ProfileLookup, SearchKind, SocialGraph, TokenMarket,
    UpstreamResult,
};
use social_proxy::{create_router, AppState};

pub const TOKEN: &str = "t0ken";

// == Fake Store ==
/// In-memory store with call counters, failure switches and manual expiry.
#[derive(Default)]
pub struct FakeStore {
    entries: Mutex<HashMap<String, (Bytes, Vec<String>)>>,
    writes: Mutex<Vec<(String, Bytes, u64)>>,
    pub gets: AtomicUsize,
    pub sets: AtomicUsize,
    pub fail_get: AtomicBool,
    pub fail_set: AtomicBool,
}

impl FakeStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Drops every entry, as if all TTLs had elapsed.
    pub fn expire_all(&self) {
        self.entries.lock().unwrap().clear();
    }

    pub fn writes(&self) -> Vec<(String, Bytes, u64)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    pub fn get_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn set_calls(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KvStore for FakeStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("get refused".into()));
        }
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(key)
            .map(|(value, _)| value.clone()))
    }

    async fn set(
        &self,
        key: &str,
        value: Bytes,
        ttl: CacheTtl,
        tags: &[String],
    ) -> Result<(), StoreError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        if self.fail_set.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("set refused".into()));
        }
        self.writes
            .lock()
            .unwrap()
            .push((key.to_string(), value.clone(), ttl.as_secs()));
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value, tags.to_vec()));
        Ok(())
    }

    async fn invalidate_tags(&self, tags: &[String]) -> Result<usize, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|_, (_, entry_tags)| !entry_tags.iter().any(|t| tags.contains(t)));
        Ok(before - entries.len())
    }
}

// == Fake Upstream ==
/// Implements every provider trait, recording each call as `op:args`.
#[derive(Default)]
pub struct FakeUpstream {
    calls: Mutex<Vec<String>>,
    pub fail: AtomicBool,
    trending: Mutex<Option<Value>>,
}

impl FakeUpstream {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn set_trending(&self, payload: Value) {
        *self.trending.lock().unwrap() = Some(payload);
    }

    fn answer(&self, call: String, payload: Value) -> UpstreamResult {
        self.calls.lock().unwrap().push(call);
        if self.fail.load(Ordering::SeqCst) {
            return Err(UpstreamError::Status {
                status: 502,
                message: "provider exploded with internal detail".into(),
            });
        }
        Ok(payload)
    }
}

#[async_trait]
impl SocialGraph for FakeUpstream {
    async fn user_by_address(&self, address: &str) -> UpstreamResult {
        self.answer(
            format!("user_by_address:{}", address),
            json!({"users": [{"fid": 1, "custody_address": address}]}),
        )
    }

    async fn users_by_fids(&self, fids: &[u64]) -> UpstreamResult {
        let users: Vec<Value> = fids.iter().map(|fid| json!({"fid": fid})).collect();
        self.answer(format!("users_by_fids:{:?}", fids), json!({"users": users}))
    }

    async fn search(&self, kind: SearchKind, query: &str, page: u32) -> UpstreamResult {
        self.answer(
            format!("search:{}:{}:{}", kind.as_str(), query, page),
            json!({"type": kind.as_str(), "page": page, "results": [query]}),
        )
    }

    async fn trending(&self, cursor: Option<&str>, limit: u32) -> UpstreamResult {
        let payload = self
            .trending
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| json!({"casts": [], "next": null}));
        self.answer(format!("trending:{:?}:{}", cursor, limit), payload)
    }

    async fn cast(&self, hash: &str) -> UpstreamResult {
        self.answer(format!("cast:{}", hash), json!({"hash": hash, "text": "gm"}))
    }

    async fn app(&self, identifier: &str) -> UpstreamResult {
        self.answer(format!("app:{}", identifier), json!({"id": identifier}))
    }
}

#[async_trait]
impl TokenMarket for FakeUpstream {
    async fn balances(&self, wallet_address: &str, page: u32) -> UpstreamResult {
        self.answer(
            format!("balances:{}:{}", wallet_address, page),
            json!({"walletAddress": wallet_address, "page": page, "balances": [{"symbol": "DEGEN", "amount": "42"}]}),
        )
    }

    async fn token(&self, address: &str) -> UpstreamResult {
        self.answer(format!("token:{}", address), json!({"address": address, "symbol": "ETH"}))
    }
}

#[async_trait]
impl NameResolver for FakeUpstream {
    async fn resolve(&self, ens_name: &str) -> UpstreamResult {
        self.answer(
            format!("resolve:{}", ens_name),
            json!({"ensName": ens_name, "address": "0xd8da"}),
        )
    }
}

#[async_trait]
impl IdentityDirectory for FakeUpstream {
    async fn profile(&self, lookup: &ProfileLookup) -> UpstreamResult {
        self.answer(format!("profile:{}", lookup), json!({"profiles": [lookup.value()]}))
    }

    async fn credential_holders(
        &self,
        credential_name: &str,
        limit: u32,
        offset: u32,
    ) -> UpstreamResult {
        self.answer(
            format!("credentials:{}:{}:{}", credential_name, limit, offset),
            json!({"credentialName": credential_name, "profiles": []}),
        )
    }
}

// == Harness ==
pub struct Harness {
    pub app: Router,
    pub store: Arc<FakeStore>,
    pub upstream: Arc<FakeUpstream>,
    pub state: AppState,
}

impl Harness {
    pub fn new() -> Self {
        let store = FakeStore::new();
        let upstream = FakeUpstream::new();
        let providers = Providers {
            social: upstream.clone(),
            tokens: upstream.clone(),
            names: upstream.clone(),
            identity: upstream.clone(),
        };
        let state = AppState::new(
            store.clone(),
            providers,
            Arc::new(BearerTokens::new([TOKEN])),
        );
        Self {
            app: create_router(state.clone()),
            store,
            upstream,
            state,
        }
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_authed(&self, uri: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .uri(uri)
                .header("authorization", format!("Bearer {}", TOKEN))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn header<'a>(response: &'a Response<Body>, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}
