//! PostgreSQL-backed identity store

use sqlx::PgPool;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::models::{CreateSuperuser, User};
use crate::store::IdentityStore;

/// Identity store over the `users` table
#[derive(Debug, Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
    hash_cost: u32,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool, hash_cost: u32) -> Self {
        Self { pool, hash_cost }
    }
}

impl IdentityStore for PgIdentityStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE username = $1
            "#
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(user)
    }

    async fn create_superuser(&self, request: CreateSuperuser) -> Result<User> {
        let user = User::new_superuser(request, self.hash_cost)?;
        debug!("Inserting superuser '{}'", user.username);

        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash, is_superuser, is_staff, is_active, date_joined)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_superuser)
        .bind(user.is_staff)
        .bind(user.is_active)
        .bind(user.date_joined)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(format!("username '{}' is already taken", user.username))
            }
            other => AppError::Database(other),
        })?;

        Ok(created)
    }
}
