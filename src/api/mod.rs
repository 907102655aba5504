//! API Module
//!
//! HTTP handlers and routing for the proxy.
//!
//! Every resource handler validates its parameters, builds the cache key for
//! its resource and goes through the cache gate. Errors are never cached.

pub mod auth;
pub mod handlers;
pub mod identity;
pub mod market;
pub mod routes;
pub mod social;
pub mod state;

pub use auth::{AccessControl, AllowAll, BearerTokens};
pub use routes::create_router;
pub use state::{AppState, Providers};
