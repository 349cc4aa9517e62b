//! Admin bootstrap - idempotent superuser provisioning
//!
//! This crate ensures that an administrative account exists in a web
//! application's user database, including:
//! - Environment-driven credentials with defaults for blank values
//! - An `IdentityStore` trait with PostgreSQL and in-memory implementations
//! - Schema bootstrap for the `users` table
//!
//! # Example
//!
//! ```rust,no_run
//! use admin_bootstrap::{bootstrap, config::Config, store::PgIdentityStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load()?;
//!     let pool = sqlx::PgPool::connect(&config.database.connection_string()).await?;
//!     let store = PgIdentityStore::new(pool, config.security.password_hash_cost);
//!
//!     let outcome = bootstrap::ensure_admin_account(&store, &config.bootstrap).await?;
//!     println!("{}", outcome.message());
//!
//!     Ok(())
//! }
//! ```

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod migrate;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use error::{AppError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
