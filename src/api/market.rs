//! Token market and ENS routes.

use axum::extract::{Path, Query, State};

use crate::api::AppState;
use crate::cache::{ResponseEnvelope, Resource};
use crate::error::Result;
use crate::models::requests::required;
use crate::models::BalancesQuery;

/// Handler for GET /tokens/balances?walletAddress=&page=
pub async fn balances_handler(
    State(state): State<AppState>,
    Query(query): Query<BalancesQuery>,
) -> Result<ResponseEnvelope> {
    let (wallet, page) = query.validate()?;
    let resource = Resource::TokenBalances;
    let page_part = page.to_string();
    let key = resource.key(&[wallet.as_str(), page_part.as_str()]);

    state
        .gate
        .read_through(&key, resource.ttl(), || {
            state.providers.tokens.balances(&wallet, page)
        })
        .await
}

/// Handler for GET /tokens/:address
pub async fn token_handler(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<ResponseEnvelope> {
    let address = required(Some(address.as_str()), "address")?;
    let resource = Resource::Token;
    let key = resource.key(&[&address]);

    state
        .gate
        .read_through(&key, resource.ttl(), || {
            state.providers.tokens.token(&address)
        })
        .await
}

/// Handler for GET /ens/:ens_name
pub async fn ens_handler(
    State(state): State<AppState>,
    Path(ens_name): Path<String>,
) -> Result<ResponseEnvelope> {
    let ens_name = required(Some(ens_name.as_str()), "ensName")?;
    let resource = Resource::Ens;
    let key = resource.key(&[&ens_name]);

    state
        .gate
        .read_through(&key, resource.ttl(), || {
            state.providers.names.resolve(&ens_name)
        })
        .await
}
