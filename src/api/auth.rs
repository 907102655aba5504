//! Access control for protected routes.
//!
//! A policy either lets the request through or hands back the exact response
//! to send. Handlers return that response unchanged and never cache it.

use std::collections::HashSet;

use axum::http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::debug;

use crate::models::ErrorResponse;

// == Access Control Trait ==
pub trait AccessControl: Send + Sync {
    /// `Err` carries the rejection response to return verbatim.
    fn authorize(&self, headers: &HeaderMap) -> Result<(), Response>;
}

// == Allow All ==
/// Policy that admits every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AccessControl for AllowAll {
    fn authorize(&self, _headers: &HeaderMap) -> Result<(), Response> {
        Ok(())
    }
}

// == Bearer Tokens ==
/// Requires `Authorization: Bearer <token>` with a configured token.
///
/// With no tokens configured every request is admitted.
#[derive(Debug, Clone, Default)]
pub struct BearerTokens {
    tokens: HashSet<String>,
}

impl BearerTokens {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.tokens.is_empty()
    }

    fn reject() -> Response {
        let mut response = (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("unauthorized")),
        )
            .into_response();
        response
            .headers_mut()
            .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        response
    }
}

impl AccessControl for BearerTokens {
    fn authorize(&self, headers: &HeaderMap) -> Result<(), Response> {
        if self.is_open() {
            return Ok(());
        }

        let token = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "));

        match token {
            Some(token) if self.tokens.contains(token.trim()) => Ok(()),
            Some(_) => {
                debug!("invalid access token");
                Err(Self::reject())
            }
            None => {
                debug!("missing or malformed authorization header");
                Err(Self::reject())
            }
        }
    }
}
