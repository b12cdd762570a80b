//! Result Cache - shared TTL cache for expensive analytics calls
//!
//! Runs the cache's composition root: the cache itself, its expiry sweeper,
//! and the operations endpoint.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use result_cache::api::create_router;
use result_cache::{spawn_sweeper, AppState, Config, JsonCache};

/// Main entry point for the result cache service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the TTL policy and the cache
/// 4. Start the background expiry sweeper
/// 5. Serve the operations endpoint
/// 6. On SIGINT/SIGTERM, stop the server and then the sweeper
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "result_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting result cache");

    let config = Config::from_env();
    let policy = config
        .ttl_policy()
        .context("Failed to build TTL policy")?;
    info!(
        "Configuration loaded: categories={}, error_ttl={}s, sweep_interval={}s, port={}",
        policy.categories().count(),
        config.error_ttl,
        config.sweep_interval,
        config.server_port
    );

    let cache = Arc::new(JsonCache::new(policy));
    let sweeper = spawn_sweeper(cache.clone(), config.sweep_interval());
    info!("Background sweeper started");

    let app = create_router(AppState::new(cache));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    sweeper.stop().await;
    info!("Shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
}
