//! Taskrelay HTTP server entry point.
//!
//! Loads configuration from the environment (after sourcing `.env`),
//! runs pending database migrations, wires the `PostgreSQL` repository
//! and the Redis event publisher into one task lifecycle service, and
//! serves the REST surface until a shutdown signal arrives.

use std::sync::Arc;

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use mockable::DefaultClock;
use tracing_subscriber::EnvFilter;

use taskrelay::config::AppConfig;
use taskrelay::http::{AppState, AuthSecret, router, server};
use taskrelay::task::adapters::postgres::{PostgresTaskRepository, TaskPgPool};
use taskrelay::task::adapters::redis::RedisEventPublisher;
use taskrelay::task::services::TaskLifecycleService;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Embedded schema migrations, applied at startup.
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_pool(database_url: &str) -> Result<TaskPgPool, BoxError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Ok(Pool::builder().build(manager)?)
}

fn run_migrations(pool: &TaskPgPool) -> Result<(), BoxError> {
    let mut connection = pool.get()?;
    connection.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    let pool = build_pool(&config.database_url)?;
    run_migrations(&pool)?;

    let repository = Arc::new(PostgresTaskRepository::new(pool));
    let publisher = Arc::new(RedisEventPublisher::from_url(
        &config.redis_url,
        &config.events_topic,
        &config.events_subscription,
    )?);
    let service = Arc::new(TaskLifecycleService::new(
        repository,
        publisher,
        Arc::new(DefaultClock),
    ));

    let state = AppState::new(service, config.update_id_mismatch);
    let app = router(state, AuthSecret::new(config.api_key.clone()));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "taskrelay listening");
    server::serve(listener, app).await?;

    tracing::info!("shutting down");
    Ok(())
}
