//! Social graph routes.

use std::cmp::Reverse;

use axum::extract::{Path, Query, State};
use serde_json::Value;

use crate::api::AppState;
use crate::cache::{ResponseEnvelope, ResponseInit, Resource};
use crate::error::Result;
use crate::models::requests::{parse_fids, required};
use crate::models::{SearchQuery, TrendingQuery, UsersQuery};

/// Handler for GET /social/users/by-address/:address
pub async fn user_by_address_handler(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<ResponseEnvelope> {
    let address = required(Some(address.as_str()), "address")?;
    let resource = Resource::SocialUserByAddress;
    let key = resource.key(&[&address]);

    state
        .gate
        .read_through(&key, resource.ttl(), || {
            state.providers.social.user_by_address(&address)
        })
        .await
}

/// Handler for GET /social/users?fids=
pub async fn users_handler(
    State(state): State<AppState>,
    Query(query): Query<UsersQuery>,
) -> Result<ResponseEnvelope> {
    let fids = parse_fids(query.fids.as_deref())?;
    let joined = fids
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",");
    let resource = Resource::SocialUsers;
    let key = resource.key(&[&joined]);

    state
        .gate
        .read_through(&key, resource.ttl(), || {
            state.providers.social.users_by_fids(&fids)
        })
        .await
}

/// Handler for GET /social/search?q=&type=&page=
pub async fn search_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<ResponseEnvelope> {
    let (kind, q, page) = query.validate()?;
    let resource = Resource::SocialSearch;
    let page_part = page.to_string();
    let key = resource.key(&[kind.as_str(), q.as_str(), page_part.as_str()]);

    state
        .gate
        .read_through(&key, resource.ttl(), || {
            state.providers.social.search(kind, &q, page)
        })
        .await
}

/// Handler for GET /social/trending?cursor=&limit=
///
/// The feed is re-ranked before it is stored, so hits serve the ranked list.
pub async fn trending_handler(
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> Result<ResponseEnvelope> {
    let (cursor, limit) = query.validate()?;
    let resource = Resource::SocialTrending;
    let ttl = resource.ttl();
    let limit_part = limit.to_string();
    let key = resource.key(&[cursor.as_deref().unwrap_or(""), limit_part.as_str()]);
    let init = ResponseInit::cacheable(&key, ttl)?;

    if let Some(hit) = state.gate.check_key(&key, &init).await {
        return Ok(hit);
    }

    let mut payload = state
        .providers
        .social
        .trending(cursor.as_deref(), limit)
        .await?;
    rank_by_engagement(&mut payload);

    let body = serde_json::to_vec(&payload)?;
    Ok(state.gate.set_key(&key, body, ttl, &init).await)
}

/// Handler for GET /social/casts/:hash
pub async fn cast_handler(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<ResponseEnvelope> {
    let hash = required(Some(hash.as_str()), "hash")?;
    let resource = Resource::SocialCast;
    let key = resource.key(&[&hash]);

    state
        .gate
        .read_through(&key, resource.ttl(), || state.providers.social.cast(&hash))
        .await
}

/// Handler for GET /apps/:identifier
pub async fn app_handler(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<ResponseEnvelope> {
    let identifier = required(Some(identifier.as_str()), "identifier")?;
    let resource = Resource::App;
    let key = resource.key(&[&identifier]);

    state
        .gate
        .read_through(&key, resource.ttl(), || {
            state.providers.social.app(&identifier)
        })
        .await
}

// == Ranking ==
/// likes + 2 * recasts + replies
pub fn engagement_score(cast: &Value) -> u64 {
    let count = |pointer: &str| cast.pointer(pointer).and_then(Value::as_u64).unwrap_or(0);
    count("/reactions/likes_count")
        + 2 * count("/reactions/recasts_count")
        + count("/replies/count")
}

/// Sorts `payload["casts"]` by engagement, highest first. Ties keep feed order.
pub fn rank_by_engagement(payload: &mut Value) {
    if let Some(casts) = payload.get_mut("casts").and_then(Value::as_array_mut) {
        casts.sort_by_key(|cast| Reverse(engagement_score(cast)));
    }
}
