//! SiteCrew Server: crew scheduling for construction sites.
//!
//! Main entry point that wires all crates together and starts the server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use sitecrew_api::{AppState, build_app};
use sitecrew_auth::{PasswordHasher, SessionManager};
use sitecrew_core::config::AppConfig;
use sitecrew_core::traits::PasswordHashing;
use sitecrew_store::Stores;

/// How often expired sessions are dropped from memory.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(600);

#[tokio::main]
async fn main() {
    let env = std::env::var("SITECREW_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e:#}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting SiteCrew v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Load collections from their mirrors ──────────────
    let hasher: Arc<dyn PasswordHashing> = Arc::new(PasswordHasher::new());
    let stores = Stores::open(&config.storage, Arc::clone(&hasher))
        .await
        .context("Failed to load storage")?;

    // ── Step 2: Wire auth and services ───────────────────────────
    let bootstrap = config.auth.bootstrap_admin.clone();
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, stores, hasher).context("Failed to initialize auth")?;

    // ── Step 3: Bootstrap admin on an empty user store ───────────
    state
        .user_admin
        .bootstrap_admin(bootstrap.as_ref())
        .await
        .context("Failed to create bootstrap admin")?;

    // ── Step 4: Background session sweep ─────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = tokio::spawn(sweep_sessions(Arc::clone(&state.sessions), shutdown_rx));

    // ── Step 5: Serve ────────────────────────────────────────────
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("SiteCrew server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    })
    .await
    .context("Server error")?;

    let _ = sweeper.await;
    tracing::info!("SiteCrew server stopped");
    Ok(())
}

async fn sweep_sessions(sessions: Arc<SessionManager>, mut shutdown: watch::Receiver<bool>) {
    let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let removed = sessions.sweep_expired_at(chrono::Utc::now()).await;
                if removed > 0 {
                    tracing::debug!(removed, "Swept expired sessions");
                }
            }
            _ = shutdown.changed() => break,
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
