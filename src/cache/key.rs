//! Cache Key Module
//!
//! Deterministic cache keys and the fixed per-resource TTL policy.
//!
//! Prefixes and parameter order are part of the storage contract: changing
//! either orphans every entry already written for that resource.

use std::fmt;

// == Cache TTL ==
/// Time-to-live in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CacheTtl(u64);

impl CacheTtl {
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub const fn as_secs(self) -> u64 {
        self.0
    }

    /// Header value advertised to downstream HTTP caches.
    ///
    /// `stale-while-revalidate` equals the TTL, so a CDN may serve a stale
    /// copy for one more window while it refetches.
    pub fn cache_control(self) -> String {
        format!(
            "public, s-maxage={}, stale-while-revalidate={}",
            self.0, self.0
        )
    }
}

// == Resource ==
/// Every cacheable resource served by the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    SocialUserByAddress,
    SocialUsers,
    SocialSearch,
    SocialTrending,
    SocialCast,
    App,
    TokenBalances,
    Token,
    Ens,
    IdentityProfile,
    IdentityCredentials,
}

impl Resource {
    pub const ALL: [Resource; 11] = [
        Resource::SocialUserByAddress,
        Resource::SocialUsers,
        Resource::SocialSearch,
        Resource::SocialTrending,
        Resource::SocialCast,
        Resource::App,
        Resource::TokenBalances,
        Resource::Token,
        Resource::Ens,
        Resource::IdentityProfile,
        Resource::IdentityCredentials,
    ];

    /// Namespace prefix of every key for this resource.
    pub const fn prefix(self) -> &'static str {
        match self {
            Resource::SocialUserByAddress => "social-user-address",
            Resource::SocialUsers => "social-users",
            Resource::SocialSearch => "social-search",
            Resource::SocialTrending => "social-trending",
            Resource::SocialCast => "social-cast",
            Resource::App => "app",
            Resource::TokenBalances => "token-balances",
            Resource::Token => "token",
            Resource::Ens => "ens",
            Resource::IdentityProfile => "identity-profile",
            Resource::IdentityCredentials => "identity-credentials",
        }
    }

    /// Fixed TTL: short for volatile feeds, long for near-static metadata.
    pub const fn ttl(self) -> CacheTtl {
        match self {
            Resource::SocialSearch | Resource::SocialTrending | Resource::TokenBalances => {
                CacheTtl::from_secs(1800)
            }
            Resource::SocialUserByAddress | Resource::SocialUsers | Resource::Token => {
                CacheTtl::from_secs(3600)
            }
            Resource::IdentityProfile | Resource::IdentityCredentials => {
                CacheTtl::from_secs(21_600)
            }
            Resource::SocialCast | Resource::Ens => CacheTtl::from_secs(86_400),
            Resource::App => CacheTtl::from_secs(604_800),
        }
    }

    /// Builds the key for one request against this resource.
    pub fn key<S: AsRef<str>>(self, params: &[S]) -> CacheKey {
        CacheKey::build(self.prefix(), params)
    }
}

// == Cache Key ==
/// Opaque, namespaced key: `<prefix>:<param1>:<param2>:...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Joins `prefix` and the escaped parameter values with `:`.
    pub fn build<S: AsRef<str>>(prefix: &str, params: &[S]) -> Self {
        let mut key = String::from(prefix);
        for param in params {
            key.push(':');
            push_escaped(&mut key, param.as_ref());
        }
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefix segment, used as the resource-wide purge tag.
    pub fn prefix(&self) -> &str {
        self.0.split(':').next().unwrap_or(&self.0)
    }

    /// Tags attached to the stored entry.
    pub fn tags(&self) -> Vec<String> {
        vec![self.0.clone(), self.prefix().to_string()]
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// The separator, the escape character and ASCII control characters are
// rewritten; everything else lands in the key unchanged. Control characters
// cannot travel in the `cache-tag` header.
fn push_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '%' => out.push_str("%25"),
            ':' => out.push_str("%3A"),
            '\u{0}'..='\u{1f}' | '\u{7f}' => out.push_str(&format!("%{:02X}", ch as u32)),
            _ => out.push(ch),
        }
    }
}
