//! Superuser bootstrap on startup

use tracing::{error, info, warn};

use crate::config::BootstrapConfig;
use crate::error::{AppError, Result};
use crate::models::{CreateSuperuser, User};
use crate::store::IdentityStore;

pub const CREATED_MESSAGE: &str = "✅ Superuser created successfully.";
pub const EXISTS_MESSAGE: &str = "ℹ️ Superuser already exists.";
pub const MISSING_CONFIG_MESSAGE: &str = "❌ Username or password environment variables not set.";

/// What a bootstrap run did to the store
#[derive(Debug, Clone)]
pub enum BootstrapOutcome {
    Created(User),
    AlreadyExists,
}

impl BootstrapOutcome {
    /// Line printed to stdout for this outcome
    pub fn message(&self) -> &'static str {
        match self {
            BootstrapOutcome::Created(_) => CREATED_MESSAGE,
            BootstrapOutcome::AlreadyExists => EXISTS_MESSAGE,
        }
    }

    pub fn created(&self) -> bool {
        matches!(self, BootstrapOutcome::Created(_))
    }
}

/// Stdout line and exit status for a finished run.
///
/// Store failures print nothing; they are reported through the log.
pub fn report(result: &Result<BootstrapOutcome>) -> (Option<String>, u8) {
    match result {
        Ok(outcome) => (Some(outcome.message().to_string()), 0),
        Err(AppError::MissingCredentials) => (Some(MISSING_CONFIG_MESSAGE.to_string()), 1),
        Err(AppError::Config(reason)) => (Some(format!("❌ {}", reason)), 1),
        Err(e) => (None, e.exit_code()),
    }
}

/// Ensure that a superuser with the configured username exists.
///
/// An existing account is left untouched, whatever its email or password.
/// The lookup and the insert are not atomic; a concurrent duplicate insert is
/// rejected by the store as a conflict.
pub async fn ensure_admin_account<S>(store: &S, config: &BootstrapConfig) -> Result<BootstrapOutcome>
where
    S: IdentityStore,
{
    config.validate()?;

    match store.find_by_username(&config.username).await? {
        Some(_) => {
            info!("Superuser '{}' already exists", config.username);
            Ok(BootstrapOutcome::AlreadyExists)
        }
        None => {
            info!("Superuser '{}' not found, creating", config.username);

            let request = CreateSuperuser {
                username: config.username.clone(),
                email: config.email.clone(),
                password: config.password.clone(),
            };

            match store.create_superuser(request).await {
                Ok(user) => {
                    info!("Created superuser '{}' with ID: {}", user.username, user.id);
                    if config.uses_default_password() {
                        warn!("SECURITY WARNING: Superuser '{}' created with the default password. Change it immediately.", user.username);
                    }
                    Ok(BootstrapOutcome::Created(user))
                }
                Err(e) => {
                    error!("Failed to create superuser: {}", e);
                    Err(e)
                }
            }
        }
    }
}
