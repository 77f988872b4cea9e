use anyhow::Context as _;
use sea_orm::Database;
use tracing::info;

use rapido_api::config::ApiConfig;
use rapido_api::router::build_router;
use rapido_api::state::AppState;
use rapido_api_migration::{Migrator, MigratorTrait};
use rapido_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real deployments inject the environment.
    let _ = dotenvy::dotenv();

    let config = ApiConfig::from_env()?;
    init_tracing(config.log_format, "info,sea_orm=warn,sqlx=warn");

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .context("failed to run migrations")?;
        info!("database migrations applied");
    }

    let router = build_router(AppState::new(db, &config));
    let http_addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("failed to bind {http_addr}"))?;

    info!("api service listening on {http_addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
