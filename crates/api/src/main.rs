use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;

use sponnect_api::app::build_router;
use sponnect_api::config::ServerConfig;
use sponnect_api::state::AppState;
use sponnect_api::telemetry;
use sponnect_db::DbPool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init("sponnect_api=debug,sponnect_db=info,tower_http=debug");

    let config = ServerConfig::from_env().context("Invalid configuration")?;
    let addr = SocketAddr::new(config.host, config.port);
    let drain_timeout = Duration::from_secs(config.shutdown_timeout_secs);

    let pool = sponnect_db::create_pool(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to connect to database")?;
    sponnect_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let app = build_router(AppState {
        pool: pool.clone(),
        config: Arc::new(config),
    });

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, version = env!("CARGO_PKG_VERSION"), "Sponnect API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    close_pool(pool, drain_timeout).await;
    Ok(())
}

/// Resolve on SIGINT, or SIGTERM on Unix. A signal that cannot be
/// installed is logged and never fires.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Cannot listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        () = interrupt => "SIGINT",
        () = terminate => "SIGTERM",
    };
    tracing::info!(signal, "Shutting down, no longer accepting connections");
}

/// Wait for in-flight queries, giving up after `timeout`.
async fn close_pool(pool: DbPool, timeout: Duration) {
    match tokio::time::timeout(timeout, pool.close()).await {
        Ok(()) => tracing::info!("Database pool closed"),
        Err(_) => tracing::warn!(
            timeout_secs = timeout.as_secs(),
            "Database pool did not close in time"
        ),
    }
}
