//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Base URL and credential for one upstream provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Remote store URL; the in-process store is used when unset
    pub kv_url: Option<String>,
    /// Namespace prepended to every remote store key
    pub kv_key_prefix: String,
    /// In-process store sweep interval in seconds
    pub cleanup_interval: u64,
    /// Per-call upstream timeout in seconds
    pub upstream_timeout: u64,
    pub social: ProviderConfig,
    pub tokens: ProviderConfig,
    pub ens: ProviderConfig,
    pub identity: ProviderConfig,
    /// Bearer tokens accepted on access-controlled routes
    pub access_tokens: Vec<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `KV_URL` - Redis URL (default: unset, in-process store)
    /// - `KV_KEY_PREFIX` - Remote key namespace (default: "proxy:")
    /// - `CLEANUP_INTERVAL` - In-process sweep frequency in seconds (default: 60)
    /// - `UPSTREAM_TIMEOUT` - Upstream call timeout in seconds (default: 10)
    /// - `SOCIAL_API_URL` / `SOCIAL_API_KEY`
    /// - `TOKEN_API_URL` / `TOKEN_API_KEY`
    /// - `ENS_API_URL`
    /// - `IDENTITY_API_URL` / `IDENTITY_API_KEY`
    /// - `ACCESS_TOKENS` - Comma-separated bearer tokens (default: none, open)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            kv_url: non_empty_var("KV_URL"),
            kv_key_prefix: non_empty_var("KV_KEY_PREFIX").unwrap_or(defaults.kv_key_prefix),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            upstream_timeout: parse_var("UPSTREAM_TIMEOUT").unwrap_or(defaults.upstream_timeout),
            social: provider("SOCIAL_API_URL", Some("SOCIAL_API_KEY"), defaults.social),
            tokens: provider("TOKEN_API_URL", Some("TOKEN_API_KEY"), defaults.tokens),
            ens: provider("ENS_API_URL", None, defaults.ens),
            identity: provider("IDENTITY_API_URL", Some("IDENTITY_API_KEY"), defaults.identity),
            access_tokens: non_empty_var("ACCESS_TOKENS")
                .map(|raw| split_tokens(&raw))
                .unwrap_or_default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            kv_url: None,
            kv_key_prefix: "proxy:".to_string(),
            cleanup_interval: 60,
            upstream_timeout: 10,
            social: ProviderConfig {
                base_url: "https://api.neynar.com".to_string(),
                api_key: None,
            },
            tokens: ProviderConfig {
                base_url: "http://localhost:8081".to_string(),
                api_key: None,
            },
            ens: ProviderConfig {
                base_url: "https://api.ensdata.net".to_string(),
                api_key: None,
            },
            identity: ProviderConfig {
                base_url: "https://app.icebreaker.xyz/api".to_string(),
                api_key: None,
            },
            access_tokens: Vec::new(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    non_empty_var(name).and_then(|v| v.parse().ok())
}

fn provider(url_var: &str, key_var: Option<&str>, default: ProviderConfig) -> ProviderConfig {
    ProviderConfig {
        base_url: non_empty_var(url_var).unwrap_or(default.base_url),
        api_key: key_var.and_then(non_empty_var),
    }
}

fn split_tokens(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
