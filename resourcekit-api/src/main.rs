//! # ResourceKit API Server
//!
//! Owner-scoped resource CRUD over HTTP, backed by PostgreSQL.
//!
//! ## Startup
//!
//! 1. Initialize tracing (`RUST_LOG`, `LOG_FORMAT=json`)
//! 2. Load configuration from the environment
//! 3. Connect the pool and apply migrations (unless `RUN_MIGRATIONS=false`)
//! 4. Serve until Ctrl+C / SIGTERM
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p resourcekit-api
//! ```

use anyhow::Context;
use resourcekit_api::{
    app::{build_router, AppState},
    config::Config,
};
use resourcekit_shared::{
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool, get_pool_stats, DatabaseConfig},
    },
    store::PgResourceStore,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str =
    "resourcekit_api=debug,resourcekit_shared=debug,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!(
        "ResourceKit API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await
    .context("Failed to connect to database")?;

    let stats = get_pool_stats(&pool);
    tracing::info!(
        total = stats.total_connections,
        idle = stats.idle_connections,
        "Database pool ready"
    );

    if config.database.run_migrations {
        run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;
    } else {
        tracing::info!("RUN_MIGRATIONS=false, skipping migrations");
    }

    let bind_address = config.bind_address();
    let state = AppState::new(Arc::new(PgResourceStore::new(pool.clone())), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    tracing::info!("Shutdown complete");

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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

    tracing::info!("Shutdown signal received, draining connections...");
}
