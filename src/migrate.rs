//! Database migration management

use sqlx::PgPool;
use tracing::{error, info};

use crate::error::AppError;

/// Run all database migrations
pub async fn run_migrations(db_pool: &PgPool) -> Result<(), AppError> {
    info!("Running database migrations...");

    // Create migration tracking table if it doesn't exist
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version VARCHAR(255) PRIMARY KEY,
            applied_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
        );
        "#
    )
    .execute(db_pool)
    .await
    .map_err(AppError::Database)?;

    for migration in MIGRATIONS {
        // Check if migration was already applied
        let applied = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM schema_migrations WHERE version = $1)"
        )
        .bind(migration.version)
        .fetch_one(db_pool)
        .await
        .map_err(AppError::Database)?;

        if applied {
            info!("Migration {} already applied", migration.version);
            continue;
        }

        info!("Applying migration: {}", migration.version);
        apply(db_pool, migration).await?;
        info!("Migration {} applied successfully", migration.version);
    }

    info!("All migrations completed successfully");
    Ok(())
}

/// Apply one migration and record it in a single transaction
async fn apply(db_pool: &PgPool, migration: &Migration) -> Result<(), AppError> {
    let failed = |e: sqlx::Error| {
        error!("Failed to apply migration {}: {}", migration.version, e);
        AppError::Migration {
            version: migration.version,
            source: e,
        }
    };

    let mut tx = db_pool.begin().await.map_err(AppError::Database)?;

    // Simple (unprepared) execution so DO blocks and multi-statement files work
    sqlx::raw_sql(migration.sql)
        .execute(&mut *tx)
        .await
        .map_err(failed)?;

    sqlx::query("INSERT INTO schema_migrations (version) VALUES ($1)")
        .bind(migration.version)
        .execute(&mut *tx)
        .await
        .map_err(failed)?;

    tx.commit().await.map_err(failed)
}

struct Migration {
    version: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: "001_create_users",
    sql: include_str!("../migrations/001_create_users.sql"),
}];
