//! ring_lru - interactive and HTTP front-ends for the LRU cache
//!
//! `CACHE_FRONTEND=repl` (default) runs the prompt on stdin/stdout;
//! `CACHE_FRONTEND=http` serves the REST API.

use std::io;
use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ring_lru::api::{create_router, AppState};
use ring_lru::repl::{self, Session};
use ring_lru::{Config, Frontend, LruCache};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber (stderr, so stdout stays with the prompt)
/// 2. Load configuration from environment variables
/// 3. Run the selected front-end until it exits
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ring_lru=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: frontend={:?}, capacity={:?}, port={}",
        config.frontend, config.capacity, config.server_port
    );

    match config.frontend {
        Frontend::Repl => run_repl(&config).await,
        Frontend::Http => serve_http(&config).await,
    }
}

/// Runs the prompt on a blocking thread; stdin reads would otherwise stall
/// the runtime.
async fn run_repl(config: &Config) -> anyhow::Result<()> {
    let session = match config.capacity {
        Some(capacity) => Session::with_cache(LruCache::new(capacity)?),
        None => Session::new(),
    };

    tokio::task::spawn_blocking(move || {
        let stdin = io::stdin();
        repl::run(session, stdin.lock(), io::stdout())
    })
    .await
    .context("interactive session panicked")?
}

async fn serve_http(config: &Config) -> anyhow::Result<()> {
    let state = AppState::from_config(config)?;
    info!(capacity = state.cache.capacity(), "Cache initialized");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
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
