use std::process::ExitCode;
use std::time::Duration;

use admin_bootstrap::bootstrap::{self, BootstrapOutcome};
use admin_bootstrap::config::{Config, LoggingConfig};
use admin_bootstrap::store::PgIdentityStore;
use admin_bootstrap::{migrate, AppError};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    // A malformed logging variable is reported again by Config::load
    init_tracing(&LoggingConfig::load().unwrap_or_default());

    let result = run().await;
    if let Err(e) = &result {
        error!(code = e.error_code(), "Bootstrap failed: {}", e);
    }

    let (line, status) = bootstrap::report(&result);
    if let Some(line) = line {
        println!("{}", line);
    }
    ExitCode::from(status)
}

async fn run() -> Result<BootstrapOutcome, AppError> {
    info!("Starting admin bootstrap v{}...", admin_bootstrap::VERSION);

    let config = Config::load()?;

    // Initialize database connection pool
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.connect_timeout))
        .connect(&config.database.connection_string())
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {}", e);
            e
        })?;

    info!("Database connection established");

    let outcome = provision(&db_pool, &config).await;

    db_pool.close().await;
    outcome
}

async fn provision(db_pool: &PgPool, config: &Config) -> Result<BootstrapOutcome, AppError> {
    if config.database.run_migrations {
        migrate::run_migrations(db_pool).await?;
    }

    let store = PgIdentityStore::new(db_pool.clone(), config.security.password_hash_cost);
    bootstrap::ensure_admin_account(&store, &config.bootstrap).await
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("admin_bootstrap={}", logging.level)));

    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries only the outcome line
    if logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}
