//! Social Proxy - read-through caching proxy for third-party data APIs

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use social_proxy::cache::{KvStore, MemoryStore, RedisStore};
use social_proxy::{create_router, spawn_cleanup_task, AppState, Config};

/// Main entry point for the proxy server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect the remote store, or start the in-process store and its sweeper
/// 4. Build upstream clients and the Axum router
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "social_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Social Proxy");

    let config = Config::from_env();
    info!(
        port = config.server_port,
        remote_store = config.kv_url.is_some(),
        upstream_timeout = config.upstream_timeout,
        access_tokens = config.access_tokens.len(),
        "configuration loaded"
    );

    let (store, cleanup_handle): (Arc<dyn KvStore>, Option<JoinHandle<()>>) = match &config.kv_url
    {
        Some(url) => {
            let store = RedisStore::connect(url, config.kv_key_prefix.clone())
                .await
                .context("failed to connect to key-value store")?;
            (Arc::new(store) as Arc<dyn KvStore>, None)
        }
        None => {
            warn!("KV_URL not set, using in-process store");
            let store = Arc::new(MemoryStore::new());
            let handle = spawn_cleanup_task(store.clone(), config.cleanup_interval);
            (store as Arc<dyn KvStore>, Some(handle))
        }
    };

    if config.access_tokens.is_empty() {
        warn!("ACCESS_TOKENS not set, protected routes are open");
    }

    let state =
        AppState::from_config(&config, store).context("failed to build upstream clients")?;
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the cleanup task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
}
