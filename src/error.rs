//! Error types and handling for the admin bootstrapper

use thiserror::Error;

/// Custom error types for the application
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Superuser username or password is empty
    #[error("Configuration error: username or password environment variables not set")]
    MissingCredentials,

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration errors
    #[error("Migration {version} failed: {source}")]
    Migration {
        version: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// Bcrypt errors
    #[error("Bcrypt error: {0}")]
    Bcrypt(String),

    /// Conflict errors (e.g., duplicate usernames)
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl AppError {
    /// Get error code for log output
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) | AppError::MissingCredentials => "CONFIGURATION_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Migration { .. } => "MIGRATION_ERROR",
            AppError::Bcrypt(_) => "BCRYPT_ERROR",
            AppError::Conflict(_) => "CONFLICT",
        }
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// Convert bcrypt errors to AppError
impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::Bcrypt(err.to_string())
    }
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;
