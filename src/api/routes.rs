//! API Routes
//!
//! Configures the Axum router with all proxy endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{health_handler, purge_handler, stats_handler};
use super::identity::{credentials_handler, profile_handler};
use super::market::{balances_handler, ens_handler, token_handler};
use super::social::{
    app_handler, cast_handler, search_handler, trending_handler, user_by_address_handler,
    users_handler,
};
use super::AppState;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /social/users/by-address/:address`
/// - `GET /social/users?fids=`
/// - `GET /social/search?q=&type=&page=`
/// - `GET /social/trending?cursor=&limit=`
/// - `GET /social/casts/:hash`
/// - `GET /apps/:identifier`
/// - `GET /tokens/balances?walletAddress=&page=`
/// - `GET /tokens/:address`
/// - `GET /ens/:ens_name`
/// - `GET /identity/profile?fname=|fid=|walletAddress=|ensName=`
/// - `GET /identity/credentials?credentialName=&limit=&offset=` (access controlled)
/// - `POST /admin/purge` (access controlled)
/// - `GET /stats`, `GET /health`
///
/// # Middleware
/// - CORS: Allows any origin, GET-heavy public API
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/social/users/by-address/:address", get(user_by_address_handler))
        .route("/social/users", get(users_handler))
        .route("/social/search", get(search_handler))
        .route("/social/trending", get(trending_handler))
        .route("/social/casts/:hash", get(cast_handler))
        .route("/apps/:identifier", get(app_handler))
        .route("/tokens/balances", get(balances_handler))
        .route("/tokens/:address", get(token_handler))
        .route("/ens/:ens_name", get(ens_handler))
        .route("/identity/profile", get(profile_handler))
        .route("/identity/credentials", get(credentials_handler))
        .route("/admin/purge", post(purge_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
