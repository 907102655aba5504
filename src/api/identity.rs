//! Identity routes.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};

use crate::api::AppState;
use crate::cache::{ResponseEnvelope, Resource};
use crate::error::Result;
use crate::models::{CredentialsQuery, ProfileQuery};

/// Handler for GET /identity/profile?fname=|fid=|walletAddress=|ensName=
pub async fn profile_handler(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> Result<ResponseEnvelope> {
    let lookup = query.validate()?;
    let resource = Resource::IdentityProfile;
    let key = resource.key(&[lookup.kind().to_string(), lookup.value()]);

    state
        .gate
        .read_through(&key, resource.ttl(), || {
            state.providers.identity.profile(&lookup)
        })
        .await
}

/// Handler for GET /identity/credentials?credentialName=&limit=&offset=
///
/// Access controlled. A rejection is returned as the policy built it.
pub async fn credentials_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CredentialsQuery>,
) -> Result<Response> {
    let (name, limit, offset) = query.validate()?;

    if let Err(rejection) = state.access.authorize(&headers) {
        return Ok(rejection);
    }

    let resource = Resource::IdentityCredentials;
    let key = resource.key(&[name.clone(), limit.to_string(), offset.to_string()]);

    let envelope = state
        .gate
        .read_through(&key, resource.ttl(), || {
            state
                .providers
                .identity
                .credential_holders(&name, limit, offset)
        })
        .await?;

    Ok(envelope.into_response())
}
