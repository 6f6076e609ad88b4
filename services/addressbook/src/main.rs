use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{info, warn};

use addressbook::{
    config::{AppConfig, StorageBackend},
    create_router, database,
    jwt::JwtService,
    state::AppState,
};
use common::{database::init_pool, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing()?;

    info!("Starting address book service");

    let config = AppConfig::from_env()?;
    let jwt_service = JwtService::new(config.jwt.clone());

    let app_state = match config.storage {
        StorageBackend::Postgres => {
            let pool = init_pool(&config.database).await?;

            // Check database connectivity
            if common::database::health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            database::run_migrations(&pool).await?;
            AppState::postgres(pool, jwt_service)
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data will be lost on shutdown");
            AppState::in_memory(jwt_service)
        }
    };

    let app = create_router(app_state);

    let listener = TcpListener::bind(config.bind_address).await?;
    info!("Address book service listening on {}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Address book service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
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
                warn!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received");
}
