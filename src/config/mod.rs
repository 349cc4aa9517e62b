//! Configuration management for the admin bootstrapper

use std::collections::HashMap;
use std::env::{self, VarError};
use std::fmt;
use std::str::FromStr;

use tracing::info;

use crate::error::{AppError, Result};

pub const USERNAME_VAR: &str = "DJANGO_SUPERUSER_USERNAME";
pub const EMAIL_VAR: &str = "DJANGO_SUPERUSER_EMAIL";
pub const PASSWORD_VAR: &str = "DJANGO_SUPERUSER_PASSWORD";
pub const PROJECT_NAME_VAR: &str = "DJANGO_PROJECT_NAME";

pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "admin";

/// Column widths of `users.username` and `users.email`
pub const MAX_USERNAME_LENGTH: usize = 150;
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub bootstrap: BootstrapConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Does not read `.env`; the entry point loads it before anything else.
    pub fn load() -> Result<Self> {
        let config = Config {
            bootstrap: BootstrapConfig::load()?,
            database: DatabaseConfig::load()?,
            security: SecurityConfig::load()?,
            logging: LoggingConfig::load()?,
        };

        info!("Configuration loaded successfully");
        Ok(config)
    }
}

/// Superuser credentials resolved from the environment.
///
/// Blank values are replaced by defaults at resolution time, so a loaded
/// config always carries a non-empty username and password. Callers that
/// build the struct by hand are still checked by [`BootstrapConfig::validate`].
#[derive(Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    pub username: String,
    pub email: String,
    pub password: String,
    pub project_name: String,
}

impl BootstrapConfig {
    fn load() -> Result<Self> {
        let mut vars = HashMap::new();
        for key in [USERNAME_VAR, EMAIL_VAR, PASSWORD_VAR, PROJECT_NAME_VAR] {
            if let Some(value) = env_var(key)? {
                vars.insert(key, value);
            }
        }

        Ok(Self::resolve(|key| vars.get(key).cloned()))
    }

    /// Resolve the superuser settings through `lookup`, treating unset and
    /// empty values alike.
    pub fn resolve<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).unwrap_or_default();

        let project_name = read(PROJECT_NAME_VAR);

        let mut username = read(USERNAME_VAR);
        if username.is_empty() {
            username = DEFAULT_USERNAME.to_string();
        }

        let mut email = read(EMAIL_VAR);
        if email.is_empty() {
            email = default_email(&project_name);
        }

        let mut password = read(PASSWORD_VAR);
        if password.is_empty() {
            password = DEFAULT_PASSWORD.to_string();
        }

        BootstrapConfig {
            username,
            email,
            password,
            project_name,
        }
    }

    /// Reject an empty username or password, and values wider than the
    /// `users` columns.
    pub fn validate(&self) -> Result<()> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(AppError::MissingCredentials);
        }

        if self.username.chars().count() > MAX_USERNAME_LENGTH {
            return Err(AppError::Config(format!(
                "{} must be at most {} characters",
                USERNAME_VAR, MAX_USERNAME_LENGTH
            )));
        }

        if self.email.chars().count() > MAX_EMAIL_LENGTH {
            return Err(AppError::Config(format!(
                "{} must be at most {} characters",
                EMAIL_VAR, MAX_EMAIL_LENGTH
            )));
        }

        Ok(())
    }

    pub fn uses_default_password(&self) -> bool {
        self.password == DEFAULT_PASSWORD
    }
}

impl fmt::Debug for BootstrapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapConfig")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .field("project_name", &self.project_name)
            .finish()
    }
}

/// Email synthesized when none is configured.
pub fn default_email(project_name: &str) -> String {
    format!("admin@{}.com", project_name)
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub max_connections: u32,
    pub connect_timeout: u64,
    pub run_migrations: bool,
}

impl DatabaseConfig {
    fn load() -> Result<Self> {
        Ok(DatabaseConfig {
            url: env_var("DATABASE_URL")?.filter(|url| !url.is_empty()),
            host: env_var("DATABASE_HOST")?.unwrap_or_else(|| "localhost".to_string()),
            port: parse_var("DATABASE_PORT", "5432")?,
            database: env_var("DATABASE_NAME")?.unwrap_or_else(|| "postgres".to_string()),
            username: env_var("DATABASE_USER")?.unwrap_or_else(|| "postgres".to_string()),
            password: env_var("DATABASE_PASSWORD")?.unwrap_or_default(),
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", "2")?,
            connect_timeout: parse_var("DATABASE_CONNECT_TIMEOUT", "30")?,
            run_migrations: parse_var("DATABASE_RUN_MIGRATIONS", "true")?,
        })
    }

    /// Connection string, preferring an explicit `DATABASE_URL`
    pub fn connection_string(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!(
                "postgresql://{}:{}@{}:{}/{}",
                self.username, self.password, self.host, self.port, self.database
            ),
        }
    }
}

/// Password hashing configuration
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub password_hash_cost: u32,
}

impl SecurityConfig {
    fn load() -> Result<Self> {
        let cost = env_var("PASSWORD_HASH_COST")?
            .unwrap_or_else(|| bcrypt::DEFAULT_COST.to_string());
        Self::with_cost(&cost)
    }

    fn with_cost(raw: &str) -> Result<Self> {
        let password_hash_cost: u32 = parse_value("PASSWORD_HASH_COST", raw)?;

        if !(4..=31).contains(&password_hash_cost) {
            return Err(AppError::Config(format!(
                "PASSWORD_HASH_COST must be between 4 and 31, got {}",
                password_hash_cost
            )));
        }

        Ok(SecurityConfig { password_hash_cost })
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "compact"
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn load() -> Result<Self> {
        let defaults = LoggingConfig::default();

        Ok(LoggingConfig {
            level: env_var("LOG_LEVEL")?.unwrap_or(defaults.level),
            format: env_var("LOG_FORMAT")?.unwrap_or(defaults.format),
        })
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

/// Read `key`, treating unset as `None` and non-UTF-8 values as an error
fn env_var(key: &str) -> Result<Option<String>> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => {
            Err(AppError::Config(format!("{} is not valid UTF-8", key)))
        }
    }
}

fn parse_var<T: FromStr>(key: &str, default: &str) -> Result<T> {
    let raw = env_var(key)?.unwrap_or_else(|| default.to_string());
    parse_value(key, &raw)
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{} has an invalid value: {:?}", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = BootstrapConfig::resolve(|_| None);

        assert_eq!(config.username, "admin");
        assert_eq!(config.email, "admin@.com");
        assert_eq!(config.password, "admin");
        assert!(config.validate().is_ok());
        assert!(config.uses_default_password());
    }

    #[test]
    fn test_default_email_uses_project_name() {
        let config = BootstrapConfig::resolve(lookup_from(&[(PROJECT_NAME_VAR, "shop")]));

        assert_eq!(config.email, "admin@shop.com");
        assert_eq!(config.project_name, "shop");
    }

    #[test]
    fn test_empty_values_fall_back_to_defaults() {
        let config = BootstrapConfig::resolve(lookup_from(&[
            (USERNAME_VAR, ""),
            (EMAIL_VAR, ""),
            (PASSWORD_VAR, ""),
            (PROJECT_NAME_VAR, "blog"),
        ]));

        assert_eq!(config.username, "admin");
        assert_eq!(config.email, "admin@blog.com");
        assert_eq!(config.password, "admin");
    }

    #[test]
    fn test_explicit_values_are_kept() {
        let config = BootstrapConfig::resolve(lookup_from(&[
            (USERNAME_VAR, "alice"),
            (EMAIL_VAR, "a@b.com"),
            (PASSWORD_VAR, "secret"),
            (PROJECT_NAME_VAR, "blog"),
        ]));

        assert_eq!(config.username, "alice");
        assert_eq!(config.email, "a@b.com");
        assert_eq!(config.password, "secret");
        assert!(!config.uses_default_password());
    }

    #[test]
    fn test_validate_rejects_hand_built_blank_credentials() {
        let config = BootstrapConfig {
            username: String::new(),
            email: "a@b.com".to_string(),
            password: "secret".to_string(),
            project_name: String::new(),
        };
        assert!(matches!(config.validate(), Err(AppError::MissingCredentials)));

        let config = BootstrapConfig {
            username: "alice".to_string(),
            password: String::new(),
            ..config
        };
        assert!(matches!(config.validate(), Err(AppError::MissingCredentials)));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = BootstrapConfig::resolve(lookup_from(&[(PASSWORD_VAR, "hunter2")]));
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[redacted]"));
    }

    #[test]
    fn test_hash_cost_bounds() {
        assert_eq!(SecurityConfig::with_cost("4").unwrap().password_hash_cost, 4);
        assert!(SecurityConfig::with_cost("3").is_err());
        assert!(SecurityConfig::with_cost("32").is_err());
        assert!(SecurityConfig::with_cost("cheap").is_err());
    }

    #[test]
    fn test_connection_string_prefers_url() {
        let mut database = DatabaseConfig {
            url: None,
            host: "db".to_string(),
            port: 5433,
            database: "app".to_string(),
            username: "app".to_string(),
            password: "pw".to_string(),
            max_connections: 2,
            connect_timeout: 30,
            run_migrations: true,
        };
        assert_eq!(database.connection_string(), "postgresql://app:pw@db:5433/app");

        database.url = Some("postgres://elsewhere/app".to_string());
        assert_eq!(database.connection_string(), "postgres://elsewhere/app");
    }

    #[test]
    fn test_logging_format() {
        let logging = LoggingConfig {
            level: "debug".to_string(),
            format: "JSON".to_string(),
        };
        assert!(logging.is_json());
    }

    #[test]
    fn test_validate_rejects_values_wider_than_columns() {
        let config = BootstrapConfig::resolve(lookup_from(&[(PASSWORD_VAR, "secret")]));

        let long_username = BootstrapConfig {
            username: "a".repeat(MAX_USERNAME_LENGTH + 1),
            ..config.clone()
        };
        let err = long_username.validate().unwrap_err();
        assert!(matches!(err, AppError::Config(ref reason) if reason.contains(USERNAME_VAR)));

        let long_email = BootstrapConfig {
            email: format!("{}@example.com", "a".repeat(MAX_EMAIL_LENGTH)),
            ..config.clone()
        };
        let err = long_email.validate().unwrap_err();
        assert!(matches!(err, AppError::Config(ref reason) if reason.contains(EMAIL_VAR)));

        let widest = BootstrapConfig {
            username: "é".repeat(MAX_USERNAME_LENGTH),
            ..config
        };
        assert!(widest.validate().is_ok());
    }

    #[test]
    fn test_unset_variable_reads_as_none() {
        assert!(env_var("ADMIN_BOOTSTRAP_TEST_UNSET_VARIABLE").unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_password_is_rejected_not_defaulted() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        env::set_var(PASSWORD_VAR, OsString::from_vec(b"s3cr\xffet".to_vec()));
        let result = BootstrapConfig::load();
        env::remove_var(PASSWORD_VAR);

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::Config(ref reason) if reason.contains(PASSWORD_VAR)));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_database_variable_is_rejected() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let key = "ADMIN_BOOTSTRAP_TEST_NON_UTF8_VALUE";
        env::set_var(key, OsString::from_vec(b"db\xfehost".to_vec()));
        let result = env_var(key);
        env::remove_var(key);

        assert!(matches!(result, Err(AppError::Config(ref reason)) if reason.contains("not valid UTF-8")));
    }
}
