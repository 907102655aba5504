//! Upstream Module
//!
//! Provider traits consumed by the route handlers, and their HTTP clients.
//!
//! Every call returns a normalized JSON payload or an [`UpstreamError`].
//! Nothing here retries; the handler sees the first failure.

mod client;
mod identity;
mod names;
mod social;
mod tokens;

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::UpstreamError;

pub use client::{take_field, UpstreamClient, API_KEY_HEADER};
pub use identity::HttpIdentityDirectory;
pub use names::HttpNameResolver;
pub use social::HttpSocialGraph;
pub use tokens::HttpTokenMarket;

/// Result of a provider call.
pub type UpstreamResult = Result<Value, UpstreamError>;

// == Search Kind ==
/// What a social search looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Users,
    Channels,
    Casts,
}

impl SearchKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "users" => Some(SearchKind::Users),
            "channels" => Some(SearchKind::Channels),
            "casts" => Some(SearchKind::Casts),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SearchKind::Users => "users",
            SearchKind::Channels => "channels",
            SearchKind::Casts => "casts",
        }
    }
}

// == Profile Lookup ==
/// The single identifier an identity profile is looked up by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileLookup {
    Fname(String),
    Fid(u64),
    Wallet(String),
    Ens(String),
}

impl ProfileLookup {
    /// Short tag naming the identifier kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ProfileLookup::Fname(_) => "fname",
            ProfileLookup::Fid(_) => "fid",
            ProfileLookup::Wallet(_) => "eth",
            ProfileLookup::Ens(_) => "ens",
        }
    }

    pub fn value(&self) -> String {
        match self {
            ProfileLookup::Fname(v) | ProfileLookup::Wallet(v) | ProfileLookup::Ens(v) => {
                v.clone()
            }
            ProfileLookup::Fid(fid) => fid.to_string(),
        }
    }
}

impl fmt::Display for ProfileLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.value())
    }
}

// == Provider Traits ==
/// Social graph provider: users, casts, feeds and app metadata.
#[async_trait]
pub trait SocialGraph: Send + Sync {
    async fn user_by_address(&self, address: &str) -> UpstreamResult;
    async fn users_by_fids(&self, fids: &[u64]) -> UpstreamResult;
    async fn search(&self, kind: SearchKind, query: &str, page: u32) -> UpstreamResult;
    /// Returns `{"casts": [...], "next": <cursor or null>}`.
    async fn trending(&self, cursor: Option<&str>, limit: u32) -> UpstreamResult;
    async fn cast(&self, hash: &str) -> UpstreamResult;
    async fn app(&self, identifier: &str) -> UpstreamResult;
}

/// Token market data provider.
#[async_trait]
pub trait TokenMarket: Send + Sync {
    async fn balances(&self, wallet_address: &str, page: u32) -> UpstreamResult;
    async fn token(&self, address: &str) -> UpstreamResult;
}

/// ENS name resolver.
#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn resolve(&self, ens_name: &str) -> UpstreamResult;
}

/// Identity and credential provider.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    async fn profile(&self, lookup: &ProfileLookup) -> UpstreamResult;
    async fn credential_holders(&self, credential_name: &str, limit: u32, offset: u32)
        -> UpstreamResult;
}
