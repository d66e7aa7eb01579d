//! # UserDesk API Server
//!
//! REST service for user records, served under `/api/users`.
//!
//! ## Architecture
//!
//! Three layers composed by hand at start-up:
//! - Repository (`PgUserRepository` or `InMemoryUserRepository`)
//! - `UserService`, owning the repository
//! - The Axum router, whose state owns the service
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/userdesk cargo run -p userdesk-api
//! USER_STORE=memory cargo run -p userdesk-api
//! ```

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use userdesk_api::{
    app::{build_router, AppState},
    config::{Config, LogFormat, StoreConfig},
};
use userdesk_shared::{
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    repository::{InMemoryUserRepository, PgUserRepository, UserRepository},
    service::UserService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    tracing::info!(
        "UserDesk API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let pool = match &config.store {
        StoreConfig::Postgres(db) => {
            let pool = create_pool(DatabaseConfig {
                url: db.url.clone(),
                max_connections: db.max_connections,
                ..Default::default()
            })
            .await?;
            run_migrations(&pool).await?;
            Some(pool)
        }
        StoreConfig::Memory => {
            tracing::warn!("Using in-memory user store; data is lost on shutdown");
            None
        }
    };

    let repo: Arc<dyn UserRepository> = match &pool {
        Some(pool) => Arc::new(PgUserRepository::new(pool.clone())),
        None => Arc::new(InMemoryUserRepository::new()),
    };

    let users = UserService::new(repo);
    let bind_address = config.bind_address();
    let app = build_router(AppState::new(users, config));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        close_pool(pool).await;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "userdesk_api=debug,userdesk_shared=info,tower_http=debug".into()
    });
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
