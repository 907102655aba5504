//! Application state shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::api::auth::{AccessControl, BearerTokens};
use crate::cache::{CacheGate, KvStore};
use crate::config::{Config, ProviderConfig};
use crate::error::UpstreamError;
use crate::upstream::{
    HttpIdentityDirectory, HttpNameResolver, HttpSocialGraph, HttpTokenMarket, IdentityDirectory,
    NameResolver, SocialGraph, TokenMarket, UpstreamClient,
};

// == Providers ==
/// One client per upstream provider, built once at startup.
#[derive(Clone)]
pub struct Providers {
    pub social: Arc<dyn SocialGraph>,
    pub tokens: Arc<dyn TokenMarket>,
    pub names: Arc<dyn NameResolver>,
    pub identity: Arc<dyn IdentityDirectory>,
}

impl Providers {
    /// Builds the HTTP clients for every provider in `config`.
    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        let timeout = Duration::from_secs(config.upstream_timeout);
        let client = |provider: &ProviderConfig| {
            UpstreamClient::new(&provider.base_url, provider.api_key.as_deref(), timeout)
        };

        Ok(Self {
            social: Arc::new(HttpSocialGraph::new(client(&config.social)?)),
            tokens: Arc::new(HttpTokenMarket::new(client(&config.tokens)?)),
            names: Arc::new(HttpNameResolver::new(client(&config.ens)?)),
            identity: Arc::new(HttpIdentityDirectory::new(client(&config.identity)?)),
        })
    }
}

// == App State ==
/// Cache gate, providers and access policy; cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub gate: CacheGate,
    pub providers: Providers,
    pub access: Arc<dyn AccessControl>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn KvStore>,
        providers: Providers,
        access: Arc<dyn AccessControl>,
    ) -> Self {
        Self {
            gate: CacheGate::new(store),
            providers,
            access,
        }
    }

    /// Wires providers and bearer-token access from configuration.
    pub fn from_config(config: &Config, store: Arc<dyn KvStore>) -> Result<Self, UpstreamError> {
        let providers = Providers::from_config(config)?;
        let access = Arc::new(BearerTokens::new(config.access_tokens.iter().cloned()));
        Ok(Self::new(store, providers, access))
    }
}
