//! Request DTOs for the proxy API
//!
//! Query strings are deserialized loosely (every field optional) and then
//! validated here, so a missing parameter becomes our own `400` body rather
//! than an extractor rejection.

use serde::Deserialize;

use crate::error::{ApiError, Result};
use crate::upstream::{ProfileLookup, SearchKind};

pub const DEFAULT_LIMIT: u32 = 25;
pub const MAX_LIMIT: u32 = 100;
pub const MAX_FIDS: usize = 100;

// == Validation Helpers ==
/// Returns the trimmed value, rejecting absent or blank input.
pub fn required(value: Option<&str>, name: &str) -> Result<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ApiError::Validation(format!(
            "Missing required parameter: {}",
            name
        ))),
    }
}

fn optional(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Page number, 1-based, defaulting to 1.
pub fn parse_page(value: Option<&str>) -> Result<u32> {
    match optional(value) {
        None => Ok(1),
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|p| *p >= 1)
            .ok_or_else(|| ApiError::Validation(format!("Invalid page: {}", raw))),
    }
}

/// Page size within `1..=MAX_LIMIT`, defaulting to `DEFAULT_LIMIT`.
pub fn parse_limit(value: Option<&str>) -> Result<u32> {
    match optional(value) {
        None => Ok(DEFAULT_LIMIT),
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|l| (1..=MAX_LIMIT).contains(l))
            .ok_or_else(|| {
                ApiError::Validation(format!(
                    "Invalid limit: {} (expected 1..={})",
                    raw, MAX_LIMIT
                ))
            }),
    }
}

/// Zero-based offset, defaulting to 0.
pub fn parse_offset(value: Option<&str>) -> Result<u32> {
    match optional(value) {
        None => Ok(0),
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| ApiError::Validation(format!("Invalid offset: {}", raw))),
    }
}

/// Comma-separated list of fids, order preserved.
pub fn parse_fids(value: Option<&str>) -> Result<Vec<u64>> {
    let raw = required(value, "fids")?;
    let fids = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>()
                .map_err(|_| ApiError::Validation(format!("Invalid fid: {}", s)))
        })
        .collect::<Result<Vec<_>>>()?;

    if fids.is_empty() {
        return Err(ApiError::Validation("Missing required parameter: fids".into()));
    }
    if fids.len() > MAX_FIDS {
        return Err(ApiError::Validation(format!(
            "Too many fids: {} (max {})",
            fids.len(),
            MAX_FIDS
        )));
    }
    Ok(fids)
}

// == Social ==
/// Query for `GET /social/search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub page: Option<String>,
}

impl SearchQuery {
    pub fn validate(&self) -> Result<(SearchKind, String, u32)> {
        let q = required(self.q.as_deref(), "q")?;
        let kind = match optional(self.kind.as_deref()) {
            None => SearchKind::Users,
            Some(raw) => SearchKind::parse(raw).ok_or_else(|| {
                ApiError::Validation(format!(
                    "Invalid type: {} (expected users, channels or casts)",
                    raw
                ))
            })?,
        };
        let page = parse_page(self.page.as_deref())?;
        Ok((kind, q, page))
    }
}

/// Query for `GET /social/users`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsersQuery {
    pub fids: Option<String>,
}

/// Query for `GET /social/trending`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrendingQuery {
    pub cursor: Option<String>,
    pub limit: Option<String>,
}

impl TrendingQuery {
    pub fn validate(&self) -> Result<(Option<String>, u32)> {
        let cursor = optional(self.cursor.as_deref()).map(str::to_string);
        let limit = parse_limit(self.limit.as_deref())?;
        Ok((cursor, limit))
    }
}

// == Tokens ==
/// Query for `GET /tokens/balances`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancesQuery {
    pub wallet_address: Option<String>,
    pub page: Option<String>,
}

impl BalancesQuery {
    pub fn validate(&self) -> Result<(String, u32)> {
        let wallet = required(self.wallet_address.as_deref(), "walletAddress")?;
        let page = parse_page(self.page.as_deref())?;
        Ok((wallet, page))
    }
}

// == Identity ==
/// Query for `GET /identity/profile`; exactly one identifier is allowed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileQuery {
    pub fname: Option<String>,
    pub fid: Option<String>,
    pub wallet_address: Option<String>,
    pub ens_name: Option<String>,
}

impl ProfileQuery {
    pub fn validate(&self) -> Result<ProfileLookup> {
        let mut given = Vec::new();
        if let Some(v) = optional(self.fname.as_deref()) {
            given.push(ProfileLookup::Fname(v.to_string()));
        }
        if let Some(v) = optional(self.fid.as_deref()) {
            let fid = v
                .parse::<u64>()
                .map_err(|_| ApiError::Validation(format!("Invalid fid: {}", v)))?;
            given.push(ProfileLookup::Fid(fid));
        }
        if let Some(v) = optional(self.wallet_address.as_deref()) {
            given.push(ProfileLookup::Wallet(v.to_string()));
        }
        if let Some(v) = optional(self.ens_name.as_deref()) {
            given.push(ProfileLookup::Ens(v.to_string()));
        }

        match given.len() {
            1 => Ok(given.remove(0)),
            0 => Err(ApiError::Validation(
                "Missing required parameter: one of fname, fid, walletAddress, ensName".into(),
            )),
            _ => Err(ApiError::Validation(
                "Only one of fname, fid, walletAddress, ensName may be given".into(),
            )),
        }
    }
}

/// Query for `GET /identity/credentials`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsQuery {
    pub credential_name: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl CredentialsQuery {
    pub fn validate(&self) -> Result<(String, u32, u32)> {
        let name = required(self.credential_name.as_deref(), "credentialName")?;
        let limit = parse_limit(self.limit.as_deref())?;
        let offset = parse_offset(self.offset.as_deref())?;
        Ok((name, limit, offset))
    }
}

// == Admin ==
/// Request body for `POST /admin/purge`.
#[derive(Debug, Clone, Deserialize)]
pub struct PurgeRequest {
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PurgeRequest {
    /// Returns the trimmed, non-blank tags.
    pub fn validate(&self) -> Result<Vec<String>> {
        let tags: Vec<String> = self
            .tags
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if tags.is_empty() {
            return Err(ApiError::Validation("At least one tag is required".into()));
        }
        Ok(tags)
    }
}
