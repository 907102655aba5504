//! Social Proxy - read-through caching proxy for third-party data APIs
//!
//! Serves social graph, token, ENS and identity lookups through a shared
//! TTL key-value store with CDN-friendly cache headers.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;
pub mod upstream;

pub use api::{create_router, AppState, Providers};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
