//! # LoanLead API Server
//!
//! Serves the public loan application endpoint and the session-protected
//! admin API backed by PostgreSQL.
//!
//! ## Startup
//!
//! 1. Load configuration from the environment (and `.env`)
//! 2. Connect to PostgreSQL and apply migrations
//! 3. Ensure the default admin account exists
//! 4. Start the session pruner and serve HTTP until Ctrl-C
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/loanlead \
//! SESSION_SECRET=$(openssl rand -hex 32) \
//! cargo run -p loanlead-api
//! ```

use loanlead_api::{
    app::{build_router, AppState},
    config::Config,
};
use loanlead_shared::{
    auth::MemorySessionStore,
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    storage::{bootstrap::ensure_default_admin, PgStorage, Storage},
};
use std::{sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "loanlead_api=debug,loanlead_shared=info,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before reading LOG_FORMAT
    dotenvy::dotenv().ok();
    init_tracing();

    tracing::info!(
        "LoanLead API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    let storage: Arc<dyn Storage> = Arc::new(PgStorage::new(pool.clone()));
    ensure_default_admin(
        storage.as_ref(),
        &config.admin.username,
        &config.admin.password,
    )
    .await?;

    let shutdown = CancellationToken::new();
    let sessions = MemorySessionStore::new();
    let pruner = sessions.spawn_pruner(
        Duration::from_secs(config.session.prune_interval_secs),
        shutdown.clone(),
    );

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(storage, sessions, config));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    shutdown.cancel();
    if let Err(e) = pruner.await {
        tracing::warn!("Session pruner task failed: {}", e);
    }
    close_pool(pool).await;

    tracing::info!("Server stopped");
    Ok(())
}

/// Installs the global subscriber; `LOG_FORMAT=json` switches to JSON lines
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Resolves on Ctrl-C, or when `shutdown` is cancelled elsewhere
async fn shutdown_signal(shutdown: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutdown signal received, draining connections...");
        }
        _ = shutdown.cancelled() => {}
    }
    shutdown.cancel();
}
