//! User-related models and types

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::Result;

/// User account as stored by the identity store
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_superuser: bool,
    pub is_staff: bool,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Superuser creation request
#[derive(Clone)]
pub struct CreateSuperuser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for CreateSuperuser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateSuperuser")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl User {
    /// Build a superuser record, hashing the password at `cost`
    pub fn new_superuser(request: CreateSuperuser, cost: u32) -> Result<Self> {
        let password_hash = bcrypt::hash(&request.password, cost)?;

        Ok(Self {
            id: Uuid::new_v4(),
            username: request.username,
            email: request.email,
            password_hash,
            is_superuser: true,
            is_staff: true,
            is_active: true,
            date_joined: Utc::now(),
            last_login: None,
        })
    }

    /// Verify user password
    pub fn verify_password(&self, password: &str) -> bool {
        bcrypt::verify(password, &self.password_hash).unwrap_or(false)
    }
}
